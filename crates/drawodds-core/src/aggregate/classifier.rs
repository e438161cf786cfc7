use crate::model::category::{Category, CategorySet};
use crate::model::deck::Deck;
use crate::sampling::Sample;
use core::fmt;

/// Maps one sample to an integer outcome.
pub trait Classifier {
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize;
}

impl<F> Classifier for F
where
    F: Fn(&Deck, &Sample) -> usize,
{
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize {
        self(deck, sample)
    }
}

/// Cards tagged `category` among the first `depth` cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagCount {
    pub category: Category,
    pub depth: usize,
}

impl Classifier for TagCount {
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize {
        sample
            .top(deck, self.depth)
            .filter(|token| token.is(self.category))
            .count()
    }
}

impl fmt::Display for TagCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag:{}@{}", self.category, self.depth)
    }
}

/// Cards carrying any of `categories` among the first `depth` cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnyTagCount {
    pub categories: CategorySet,
    pub depth: usize,
}

impl Classifier for AnyTagCount {
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize {
        sample
            .top(deck, self.depth)
            .filter(|token| token.is_any(self.categories))
            .count()
    }
}

impl fmt::Display for AnyTagCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "any:{}@{}", self.categories, self.depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManaValueTotal {
    pub depth: usize,
}

impl Classifier for ManaValueTotal {
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize {
        sample
            .top(deck, self.depth)
            .map(|token| token.mana_value as usize)
            .sum()
    }
}

impl fmt::Display for ManaValueTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mana@{}", self.depth)
    }
}

/// Sum of power over the first `depth` cards; negative totals floor at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerTotal {
    pub depth: usize,
}

impl Classifier for PowerTotal {
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize {
        let total: i64 = sample
            .top(deck, self.depth)
            .filter_map(|token| token.power)
            .map(i64::from)
            .sum();
        total.max(0) as usize
    }
}

impl fmt::Display for PowerTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "power@{}", self.depth)
    }
}

/// 1-based position of the first card tagged `category`, or `len + 1` if absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstMatchPosition {
    pub category: Category,
}

impl Classifier for FirstMatchPosition {
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize {
        sample
            .tokens(deck)
            .position(|token| token.is(self.category))
            .map(|idx| idx + 1)
            .unwrap_or(sample.len() + 1)
    }
}

impl fmt::Display for FirstMatchPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "first:{}", self.category)
    }
}

/// 1 when every `(category, threshold)` pair is met in the first `depth` cards.
///
/// A card with several tags counts toward each of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetsRequirements {
    pub requirements: Vec<(Category, usize)>,
    pub depth: usize,
}

impl Classifier for MeetsRequirements {
    fn classify(&self, deck: &Deck, sample: &Sample) -> usize {
        let mut seen = [0usize; Category::ALL.len()];
        for token in sample.top(deck, self.depth) {
            for category in token.categories.iter() {
                seen[category as usize] += 1;
            }
        }
        let met = self
            .requirements
            .iter()
            .all(|(category, threshold)| seen[*category as usize] >= *threshold);
        usize::from(met)
    }
}

impl fmt::Display for MeetsRequirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("meets:")?;
        for (idx, (category, threshold)) in self.requirements.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{category}>={threshold}")?;
        }
        write!(f, "@{}", self.depth)
    }
}
