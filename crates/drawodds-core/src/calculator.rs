//! Per-calculator context: one catalog, its deck, one sampler and the
//! memoization caches that sit in front of the exact and simulated paths.

use crate::aggregate::{
    Classifier, MeetsRequirements, SampleDetail, SimulatedDistribution, TagCount, aggregate,
    detail_slice,
};
use crate::cache::LruCache;
use crate::math::{
    ExactDistribution, Requirement, at_least_k, at_least_three, at_least_two, expected_value,
};
use crate::model::catalog::Catalog;
use crate::model::category::Category;
use crate::model::deck::Deck;
use crate::sampling::{GrowthPolicy, Sampler};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;
use tracing::{Level, event};

const DEFAULT_CACHE_CAPACITY: usize = 50;
const MAX_JOINT_REQUIREMENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorOptions {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub growth: GrowthPolicy,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            seed: None,
            growth: GrowthPolicy::default(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("the deck is empty")]
    EmptyDeck,
    #[error("{given} category requirements given; at most {max} are supported")]
    TooManyRequirements { given: usize, max: usize },
}

/// Exact and simulated means for the same single-category draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrossCheck {
    pub exact_mean: f64,
    pub simulated_mean: f64,
    pub relative_error: f64,
    pub samples: usize,
}

#[derive(Debug)]
pub struct Calculator {
    catalog: Catalog,
    deck: Deck,
    sampler: Sampler,
    exact: LruCache<String, ExactDistribution>,
    joint: LruCache<String, f64>,
    simulated: LruCache<String, SimulatedDistribution>,
}

impl Calculator {
    pub fn new(catalog: Catalog, options: CalculatorOptions) -> Self {
        let sampler = match options.seed {
            Some(seed) => Sampler::new(seed, options.growth),
            None => Sampler::from_entropy(options.growth),
        };
        let deck = Deck::build(&catalog);
        Self {
            catalog,
            deck,
            sampler,
            exact: LruCache::new(options.cache_capacity),
            joint: LruCache::new(options.cache_capacity),
            simulated: LruCache::new(options.cache_capacity),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Swaps in a new catalog, rebuilding the deck and dropping every cached result.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.deck = Deck::build(&catalog);
        self.catalog = catalog;
        self.sampler.clear();
        self.invalidate();
        event!(
            Level::DEBUG,
            deck = %self.deck.id(),
            cards = self.deck.len(),
            "catalog replaced"
        );
    }

    pub fn invalidate(&mut self) {
        self.exact.clear();
        self.joint.clear();
        self.simulated.clear();
    }

    /// Exact distribution of `category` hits among the top `draws` cards.
    pub fn exact_draw(
        &mut self,
        category: Category,
        draws: usize,
    ) -> Result<ExactDistribution, QueryError> {
        self.ensure_cards()?;
        let population = self.deck.len();
        let successes = self.deck.count(category);
        let key = format!("exact|{population}|{successes}|{draws}");
        if let Some(hit) = self.exact.get(&key) {
            event!(Level::TRACE, %key, "exact cache hit");
            return Ok(hit.clone());
        }
        let dist = ExactDistribution::hypergeometric(population, successes, draws);
        self.exact.set(key, dist.clone());
        Ok(dist)
    }

    /// Exact probability that every `(category, at_least)` pair is met in
    /// the top `draws` cards, treating the categories as disjoint. Drawing
    /// past the end of the deck draws the whole deck.
    pub fn exact_at_least(
        &mut self,
        requirements: &[(Category, usize)],
        draws: usize,
    ) -> Result<f64, QueryError> {
        self.ensure_cards()?;
        // Zero thresholds are vacuous and must not reach the disjoint sums.
        let merged: Vec<(Category, usize)> = merge_requirements(requirements)
            .into_iter()
            .filter(|(_, at_least)| *at_least > 0)
            .collect();
        if merged.len() > MAX_JOINT_REQUIREMENTS {
            return Err(QueryError::TooManyRequirements {
                given: merged.len(),
                max: MAX_JOINT_REQUIREMENTS,
            });
        }
        self.warn_on_overlap(&merged);

        let population = self.deck.len() as i64;
        let n = (draws as i64).min(population);
        let reqs: Vec<Requirement> = merged
            .iter()
            .map(|(category, at_least)| {
                Requirement::new(self.deck.count(*category) as i64, *at_least as i64)
            })
            .collect();

        let mut key = format!("joint|{population}|{n}");
        for req in &reqs {
            key.push_str(&format!("|{}:{}", req.population, req.at_least));
        }
        if let Some(hit) = self.joint.get(&key) {
            event!(Level::TRACE, %key, "joint cache hit");
            return Ok(*hit);
        }

        let probability = match reqs.as_slice() {
            [] => 1.0,
            [a] => at_least_k(population, a.population, n, a.at_least),
            [a, b] => at_least_two(population, *a, *b, n),
            [a, b, c] => at_least_three(population, *a, *b, *c, n),
            _ => unreachable!("requirement count checked above"),
        };
        self.joint.set(key, probability);
        Ok(probability)
    }

    /// Simulated distribution for a classifier identified by its `Display` key.
    pub fn simulate<C>(
        &mut self,
        classifier: &C,
        samples: usize,
    ) -> Result<SimulatedDistribution, QueryError>
    where
        C: Classifier + fmt::Display,
    {
        let label = classifier.to_string();
        self.simulate_with(&label, classifier, samples)
    }

    /// Simulated distribution for an arbitrary classifier; `label` must
    /// uniquely describe it for the cache.
    pub fn simulate_with<C: Classifier + ?Sized>(
        &mut self,
        label: &str,
        classifier: &C,
        samples: usize,
    ) -> Result<SimulatedDistribution, QueryError> {
        self.ensure_cards()?;
        let key = format!("sim|{}|{label}|{samples}", self.deck.id());
        if let Some(hit) = self.simulated.get(&key) {
            event!(Level::TRACE, %key, "simulation cache hit");
            return Ok(hit.clone());
        }
        let batch = self.sampler.build(&self.deck, samples);
        let dist = aggregate(&self.deck, batch.first(samples), classifier);
        self.simulated.set(key, dist.clone());
        Ok(dist)
    }

    pub fn simulate_draw(
        &mut self,
        category: Category,
        draws: usize,
        samples: usize,
    ) -> Result<SimulatedDistribution, QueryError> {
        self.simulate(
            &TagCount {
                category,
                depth: draws,
            },
            samples,
        )
    }

    /// Empirical counterpart of [`Calculator::exact_at_least`]. Cards with
    /// several tags count toward each of them.
    pub fn simulate_at_least(
        &mut self,
        requirements: &[(Category, usize)],
        draws: usize,
        samples: usize,
    ) -> Result<f64, QueryError> {
        let classifier = MeetsRequirements {
            requirements: merge_requirements(requirements),
            depth: draws,
        };
        Ok(self.simulate(&classifier, samples)?.at_least(1))
    }

    /// Detail records for `range` of the current batch. Empty when no batch
    /// has been generated for the current deck.
    pub fn sample_details<C: Classifier + ?Sized>(
        &self,
        classifier: &C,
        depth: usize,
        range: Range<usize>,
    ) -> Vec<SampleDetail> {
        match self.sampler.batch() {
            Some(batch) if batch.deck_id() == self.deck.id() => {
                detail_slice(&self.deck, batch, classifier, depth, range)
            }
            _ => Vec::new(),
        }
    }

    pub fn cross_check(
        &mut self,
        category: Category,
        draws: usize,
        samples: usize,
    ) -> Result<CrossCheck, QueryError> {
        self.ensure_cards()?;
        let population = self.deck.len() as i64;
        let drawn = (draws as i64).min(population);
        let exact_mean = expected_value(population, self.deck.count(category) as i64, drawn);
        let simulated_mean = self.simulate_draw(category, draws, samples)?.average();
        let relative_error = if exact_mean == 0.0 {
            simulated_mean.abs()
        } else {
            (simulated_mean - exact_mean).abs() / exact_mean
        };
        Ok(CrossCheck {
            exact_mean,
            simulated_mean,
            relative_error,
            samples,
        })
    }

    fn ensure_cards(&self) -> Result<(), QueryError> {
        if self.deck.is_empty() {
            Err(QueryError::EmptyDeck)
        } else {
            Ok(())
        }
    }

    fn warn_on_overlap(&self, requirements: &[(Category, usize)]) {
        for (idx, (a, _)) in requirements.iter().enumerate() {
            for (b, _) in &requirements[idx + 1..] {
                let shared = self.deck.overlap(*a, *b);
                if shared > 0 {
                    event!(
                        Level::WARN,
                        first = %a,
                        second = %b,
                        shared,
                        "categories overlap; exact joint probability treats them as disjoint"
                    );
                }
            }
        }
    }
}

/// Collapses repeated categories to their strictest threshold, keeping first-seen order.
fn merge_requirements(requirements: &[(Category, usize)]) -> Vec<(Category, usize)> {
    let mut merged: Vec<(Category, usize)> = Vec::with_capacity(requirements.len());
    for &(category, at_least) in requirements {
        match merged.iter_mut().find(|(existing, _)| *existing == category) {
            Some((_, threshold)) => *threshold = (*threshold).max(at_least),
            None => merged.push((category, at_least)),
        }
    }
    merged
}
