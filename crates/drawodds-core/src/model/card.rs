use crate::model::category::{Category, CategorySet};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Catalog description of one distinct card and how many copies the deck runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub count: u32,
    pub categories: CategorySet,
    #[serde(default)]
    pub mana_value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
}

impl CatalogEntry {
    pub const fn new(count: u32, categories: CategorySet, mana_value: u32) -> Self {
        Self {
            count,
            categories,
            mana_value,
            power: None,
        }
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.power = Some(power);
        self
    }
}

/// One physical copy of a card in the library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardToken {
    pub name: Arc<str>,
    pub categories: CategorySet,
    pub mana_value: u32,
    pub power: Option<i32>,
}

impl CardToken {
    pub fn new(name: Arc<str>, entry: &CatalogEntry) -> Self {
        Self {
            name,
            categories: entry.categories,
            mana_value: entry.mana_value,
            power: entry.power,
        }
    }

    pub const fn is(&self, category: Category) -> bool {
        self.categories.contains(category)
    }

    pub const fn is_any(&self, categories: CategorySet) -> bool {
        self.categories.intersects(categories)
    }
}

impl fmt::Display for CardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{CardToken, CatalogEntry};
    use crate::model::category::{Category, CategorySet};

    #[test]
    fn dryad_arbor_is_both_land_and_creature() {
        let entry = CatalogEntry::new(
            1,
            CategorySet::single(Category::Land).with(Category::Creature),
            0,
        )
        .with_power(1);
        let token = CardToken::new("Dryad Arbor".into(), &entry);
        assert!(token.is(Category::Land));
        assert!(token.is(Category::Creature));
        assert!(!token.is(Category::Instant));
        assert_eq!(token.power, Some(1));
        assert_eq!(token.to_string(), "Dryad Arbor");
    }

    #[test]
    fn entry_deserializes_with_defaults() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"count": 4, "categories": ["instant"]}"#).unwrap();
        assert_eq!(entry.count, 4);
        assert_eq!(entry.mana_value, 0);
        assert_eq!(entry.power, None);
        assert!(entry.categories.contains(Category::Instant));
    }
}
