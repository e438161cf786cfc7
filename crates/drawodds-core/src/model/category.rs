use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Category {
    Land = 0,
    Creature = 1,
    Instant = 2,
    Sorcery = 3,
    Artifact = 4,
    Enchantment = 5,
    Planeswalker = 6,
    Battle = 7,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Land,
        Category::Creature,
        Category::Instant,
        Category::Sorcery,
        Category::Artifact,
        Category::Enchantment,
        Category::Planeswalker,
        Category::Battle,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Category::Land),
            1 => Some(Category::Creature),
            2 => Some(Category::Instant),
            3 => Some(Category::Sorcery),
            4 => Some(Category::Artifact),
            5 => Some(Category::Enchantment),
            6 => Some(Category::Planeswalker),
            7 => Some(Category::Battle),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Land => "land",
            Category::Creature => "creature",
            Category::Instant => "instant",
            Category::Sorcery => "sorcery",
            Category::Artifact => "artifact",
            Category::Enchantment => "enchantment",
            Category::Planeswalker => "planeswalker",
            Category::Battle => "battle",
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u8
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown card category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Bit-set of the categories a card belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CategorySet(u16);

impl CategorySet {
    pub const EMPTY: Self = Self(0);

    pub const fn single(category: Category) -> Self {
        Self(category.bit())
    }

    pub const fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub const fn with(self, category: Category) -> Self {
        Self(self.0 | category.bit())
    }

    pub const fn intersects(self, other: CategorySet) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = Category> {
        Category::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }

    /// Resolves the card types named in a type line such as
    /// `"Legendary Artifact Creature — Golem"`. Supertypes and everything
    /// after the dash are ignored.
    pub fn from_type_line(type_line: &str) -> Self {
        let types = type_line
            .split(['—', '-'])
            .next()
            .unwrap_or_default();
        types
            .split_whitespace()
            .filter_map(|word| word.parse::<Category>().ok())
            .collect()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        iter.into_iter().fold(CategorySet::EMPTY, CategorySet::with)
    }
}

impl fmt::Display for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for category in self.iter() {
            if !first {
                f.write_str("+")?;
            }
            write!(f, "{category}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for CategorySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CategorySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let categories = Vec::<Category>::deserialize(deserializer)?;
        Ok(categories.into_iter().collect())
    }
}
