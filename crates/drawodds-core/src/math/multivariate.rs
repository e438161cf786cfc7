//! Joint "at least" probabilities over disjoint categories.
//!
//! Each category here is a partition of the library: a card is counted in at
//! most one category, and everything else is "other". Decks whose tokens
//! carry several tags violate that assumption; see `Deck::overlap`.

use super::binomial::choose;
use super::hypergeometric::clamp_probability;
use serde::{Deserialize, Serialize};

/// A category population paired with its minimum hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub population: i64,
    pub at_least: i64,
}

impl Requirement {
    pub const fn new(population: i64, at_least: i64) -> Self {
        Self {
            population,
            at_least,
        }
    }

    /// First index of the summation; a requirement of zero or less is vacuous.
    const fn lower_bound(self) -> i64 {
        if self.at_least > 0 { self.at_least } else { 0 }
    }
}

/// Probability of drawing at least `first.at_least` of the first category
/// and at least `second.at_least` of the second in `draws` cards.
pub fn at_least_two(population: i64, first: Requirement, second: Requirement, draws: i64) -> f64 {
    let other = population - first.population - second.population;
    if other < 0 || draws < 0 {
        return 0.0;
    }
    let total = choose(population, draws);
    if total == 0.0 {
        return 0.0;
    }

    let mut mass = 0.0;
    for i in first.lower_bound()..=draws.min(first.population) {
        let ways_first = choose(first.population, i);
        for j in second.lower_bound()..=(draws - i).min(second.population) {
            let rest = draws - i - j;
            if rest < 0 || rest > other {
                continue;
            }
            mass += ways_first * choose(second.population, j) * choose(other, rest);
        }
    }
    clamp_probability(mass / total)
}

/// Three-category analogue of [`at_least_two`].
pub fn at_least_three(
    population: i64,
    first: Requirement,
    second: Requirement,
    third: Requirement,
    draws: i64,
) -> f64 {
    let other = population - first.population - second.population - third.population;
    if other < 0 || draws < 0 {
        return 0.0;
    }
    let total = choose(population, draws);
    if total == 0.0 {
        return 0.0;
    }

    let mut mass = 0.0;
    for i in first.lower_bound()..=draws.min(first.population) {
        let ways_first = choose(first.population, i);
        for j in second.lower_bound()..=(draws - i).min(second.population) {
            let ways_second = ways_first * choose(second.population, j);
            for l in third.lower_bound()..=(draws - i - j).min(third.population) {
                let rest = draws - i - j - l;
                if rest < 0 || rest > other {
                    continue;
                }
                mass += ways_second * choose(third.population, l) * choose(other, rest);
            }
        }
    }
    clamp_probability(mass / total)
}
