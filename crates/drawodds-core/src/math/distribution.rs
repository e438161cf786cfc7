use super::hypergeometric::{at_least_k, expected_value, pmf};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeProbability {
    pub outcome: usize,
    pub probability: f64,
}

/// Exact outcome distribution for a single-category draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExactDistribution {
    pub outcomes: Vec<OutcomeProbability>,
    pub expected_value: f64,
    /// `at_least[k]` holds `P(X >= k)` for every outcome in the support.
    pub at_least: Vec<f64>,
}

impl ExactDistribution {
    /// Distribution of hits among `draws` cards. Drawing more cards than the
    /// library holds is treated as drawing the whole library.
    pub fn hypergeometric(population: usize, successes: usize, draws: usize) -> Self {
        let population = population as i64;
        let successes = successes as i64;
        let draws = (draws as i64).min(population);

        let outcomes = pmf(population, successes, draws)
            .into_iter()
            .enumerate()
            .map(|(outcome, probability)| OutcomeProbability {
                outcome,
                probability,
            })
            .collect::<Vec<_>>();
        let at_least = (0..outcomes.len() as i64)
            .map(|k| at_least_k(population, successes, draws, k))
            .collect();

        Self {
            outcomes,
            expected_value: expected_value(population, successes, draws),
            at_least,
        }
    }

    pub fn probability(&self, outcome: usize) -> f64 {
        self.outcomes
            .get(outcome)
            .map(|point| point.probability)
            .unwrap_or(0.0)
    }

    pub fn max_outcome(&self) -> usize {
        self.outcomes.len().saturating_sub(1)
    }

    pub fn total_probability(&self) -> f64 {
        self.outcomes.iter().map(|point| point.probability).sum()
    }
}
