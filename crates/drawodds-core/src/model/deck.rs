use crate::model::card::CardToken;
use crate::model::catalog::Catalog;
use crate::model::category::{Category, CategorySet};
use core::fmt;
use std::sync::Arc;

/// Identity of a deck, derived from the catalog it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeckId(u64);

impl DeckId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Flat library of physical cards in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    tokens: Vec<CardToken>,
}

impl Deck {
    /// Expands each catalog entry `count` times, in catalog order.
    pub fn build(catalog: &Catalog) -> Self {
        let mut tokens = Vec::with_capacity(catalog.deck_size());
        for (name, entry) in catalog.iter() {
            let shared: Arc<str> = Arc::from(name);
            for _ in 0..entry.count {
                tokens.push(CardToken::new(Arc::clone(&shared), entry));
            }
        }
        debug_assert_eq!(tokens.len(), catalog.deck_size());
        Self {
            id: DeckId(catalog.fingerprint()),
            tokens,
        }
    }

    pub fn empty() -> Self {
        Self::build(&Catalog::new())
    }

    pub fn id(&self) -> DeckId {
        self.id
    }

    pub fn tokens(&self) -> &[CardToken] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&CardToken> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn count(&self, category: Category) -> usize {
        self.tokens.iter().filter(|token| token.is(category)).count()
    }

    pub fn count_any(&self, categories: CategorySet) -> usize {
        self.tokens
            .iter()
            .filter(|token| token.is_any(categories))
            .count()
    }

    /// Tokens carrying both tags. Non-zero means exact joint probabilities
    /// over `a` and `b` assume a partition the deck does not satisfy.
    pub fn overlap(&self, a: Category, b: Category) -> usize {
        if a == b {
            return 0;
        }
        self.tokens
            .iter()
            .filter(|token| token.is(a) && token.is(b))
            .count()
    }

    /// True when no token carries more than one of `categories`.
    pub fn is_partitioned_by(&self, categories: &[Category]) -> bool {
        categories.iter().enumerate().all(|(idx, a)| {
            categories[idx + 1..]
                .iter()
                .all(|b| self.overlap(*a, *b) == 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::CatalogEntry;
    use crate::model::catalog::Catalog;
    use crate::model::category::{Category, CategorySet};

    fn sample_catalog() -> Catalog {
        Catalog::new()
            .with("Forest", CatalogEntry::new(3, CategorySet::single(Category::Land), 0))
            .and_then(|c| {
                c.with(
                    "Dryad Arbor",
                    CatalogEntry::new(
                        1,
                        CategorySet::single(Category::Land).with(Category::Creature),
                        0,
                    ),
                )
            })
            .and_then(|c| {
                c.with(
                    "Giant Growth",
                    CatalogEntry::new(2, CategorySet::single(Category::Instant), 1),
                )
            })
            .unwrap()
    }

    #[test]
    fn expansion_matches_catalog_counts_and_order() {
        let catalog = sample_catalog();
        let deck = Deck::build(&catalog);
        assert_eq!(deck.len(), catalog.deck_size());
        let names: Vec<&str> = deck.tokens().iter().map(|t| &*t.name).collect();
        assert_eq!(
            names,
            ["Forest", "Forest", "Forest", "Dryad Arbor", "Giant Growth", "Giant Growth"]
        );
    }

    #[test]
    fn build_is_deterministic() {
        let a = Deck::build(&sample_catalog());
        let b = Deck::build(&sample_catalog());
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn multi_tag_cards_count_toward_each_tag() {
        let deck = Deck::build(&sample_catalog());
        assert_eq!(deck.count(Category::Land), 4);
        assert_eq!(deck.count(Category::Creature), 1);
        assert_eq!(
            deck.count_any(CategorySet::single(Category::Land).with(Category::Creature)),
            4
        );
        assert_eq!(deck.overlap(Category::Land, Category::Creature), 1);
        assert!(!deck.is_partitioned_by(&[Category::Land, Category::Creature]));
        assert!(deck.is_partitioned_by(&[Category::Land, Category::Instant]));
    }

    #[test]
    fn empty_catalog_builds_empty_deck() {
        let deck = Deck::empty();
        assert!(deck.is_empty());
        assert_eq!(deck.count(Category::Land), 0);
    }
}
