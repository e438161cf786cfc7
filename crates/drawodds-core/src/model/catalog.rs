//! Ordered card catalog: the counted input a deck is expanded from.

use crate::model::card::CatalogEntry;
use crate::model::category::{Category, CategorySet};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest mana value or absolute power a catalog entry may carry. Totals of
/// these index a dense histogram, so they stay small.
pub const MAX_CARD_STAT: u32 = 1_000;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog entry name must not be empty")]
    EmptyName,
    #[error("'{name}' must have a positive count")]
    ZeroCount { name: String },
    #[error("'{name}' must belong to at least one category")]
    NoCategories { name: String },
    #[error("'{name}' has {stat} {value}, above the limit of {max}")]
    StatOutOfRange {
        name: String,
        stat: &'static str,
        value: i64,
        max: u32,
    },
    #[error("failed to read catalog {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One record of the on-disk catalog format. Categories may be given
/// directly or resolved from a type line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub categories: Option<CategorySet>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub mana_value: u32,
    #[serde(default)]
    pub power: Option<i32>,
}

impl CatalogRecord {
    fn resolve_categories(&self) -> CategorySet {
        match (self.categories, self.type_line.as_deref()) {
            (Some(set), _) if !set.is_empty() => set,
            (_, Some(line)) => CategorySet::from_type_line(line),
            _ => CategorySet::EMPTY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(String, CatalogEntry)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any entry of the same name in place.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entry: CatalogEntry,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if entry.count == 0 {
            return Err(CatalogError::ZeroCount { name });
        }
        if entry.categories.is_empty() {
            return Err(CatalogError::NoCategories { name });
        }
        if entry.mana_value > MAX_CARD_STAT {
            return Err(CatalogError::StatOutOfRange {
                name,
                stat: "mana value",
                value: i64::from(entry.mana_value),
                max: MAX_CARD_STAT,
            });
        }
        if let Some(power) = entry.power.filter(|p| p.unsigned_abs() > MAX_CARD_STAT) {
            return Err(CatalogError::StatOutOfRange {
                name,
                stat: "power",
                value: i64::from(power),
                max: MAX_CARD_STAT,
            });
        }

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((name, entry)),
        }
        Ok(())
    }

    pub fn with(
        mut self,
        name: impl Into<String>,
        entry: CatalogEntry,
    ) -> Result<Self, CatalogError> {
        self.insert(name, entry)?;
        Ok(self)
    }

    pub fn from_records(records: Vec<CatalogRecord>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for record in records {
            let categories = record.resolve_categories();
            let entry = CatalogEntry {
                count: record.count,
                categories,
                mana_value: record.mana_value,
                power: record.power,
            };
            catalog.insert(record.name, entry)?;
        }
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        Self::from_json_str(&raw)
    }

    pub fn to_records(&self) -> Vec<CatalogRecord> {
        self.entries
            .iter()
            .map(|(name, entry)| CatalogRecord {
                name: name.clone(),
                count: entry.count,
                categories: Some(entry.categories),
                type_line: None,
                mana_value: entry.mana_value,
                power: entry.power,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of physical cards.
    pub fn deck_size(&self) -> usize {
        self.entries.iter().map(|(_, entry)| entry.count as usize).sum()
    }

    /// Copies tagged with `category`, counting multi-tag cards once per tag.
    pub fn population(&self, category: Category) -> usize {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.categories.contains(category))
            .map(|(_, entry)| entry.count as usize)
            .sum()
    }

    pub fn populations(&self) -> [usize; 8] {
        let mut counts = [0usize; 8];
        for category in Category::ALL {
            counts[category as usize] = self.population(category);
        }
        counts
    }

    /// Content hash in iteration order.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.entries.len().hash(&mut hasher);
        for (name, entry) in &self.entries {
            name.hash(&mut hasher);
            entry.hash(&mut hasher);
        }
        hasher.finish()
    }
}
