use super::classifier::Classifier;
use crate::model::deck::Deck;
use crate::sampling::Sample;
use serde::Serialize;

/// Empirical outcome frequencies over a batch of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulatedDistribution {
    /// `frequencies[k]` counts the samples whose outcome was `k`.
    pub frequencies: Vec<u64>,
    pub samples: usize,
    pub total: u64,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl SimulatedDistribution {
    pub fn record(&mut self, outcome: usize) {
        if self.frequencies.len() <= outcome {
            self.frequencies.resize(outcome + 1, 0);
        }
        self.frequencies[outcome] += 1;
        self.samples += 1;
        self.total += outcome as u64;
        self.min = Some(self.min.map_or(outcome, |min| min.min(outcome)));
        self.max = Some(self.max.map_or(outcome, |max| max.max(outcome)));
    }

    pub fn average(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.total as f64 / self.samples as f64
        }
    }

    pub fn frequency(&self, outcome: usize) -> u64 {
        self.frequencies.get(outcome).copied().unwrap_or(0)
    }

    pub fn probability(&self, outcome: usize) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.frequency(outcome) as f64 / self.samples as f64
    }

    /// Fraction of samples with an outcome of at least `k`.
    pub fn at_least(&self, k: usize) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        let hits: u64 = self.frequencies.iter().skip(k).sum();
        hits as f64 / self.samples as f64
    }
}

/// Classifies every sample once and folds the outcomes into a histogram.
pub fn aggregate<C: Classifier + ?Sized>(
    deck: &Deck,
    samples: &[Sample],
    classifier: &C,
) -> SimulatedDistribution {
    let mut distribution = SimulatedDistribution::default();
    for sample in samples {
        distribution.record(classifier.classify(deck, sample));
    }
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::TagCount;
    use crate::math::{ExactDistribution, expected_value};
    use crate::model::card::CatalogEntry;
    use crate::model::catalog::Catalog;
    use crate::model::category::{Category, CategorySet};
    use crate::sampling::Sampler;

    fn half_lands() -> Deck {
        let catalog = Catalog::new()
            .with("Island", CatalogEntry::new(50, CategorySet::single(Category::Land), 0))
            .and_then(|c| {
                c.with(
                    "Brainstorm",
                    CatalogEntry::new(50, CategorySet::single(Category::Instant), 1),
                )
            })
            .unwrap();
        Deck::build(&catalog)
    }

    #[test]
    fn record_tracks_extremes_and_mean() {
        let mut dist = SimulatedDistribution::default();
        for outcome in [2, 0, 5, 2] {
            dist.record(outcome);
        }
        assert_eq!(dist.frequencies, vec![1, 0, 2, 0, 0, 1]);
        assert_eq!(dist.samples, 4);
        assert_eq!(dist.min, Some(0));
        assert_eq!(dist.max, Some(5));
        assert_eq!(dist.average(), 2.25);
        assert_eq!(dist.at_least(2), 0.75);
        assert_eq!(dist.probability(9), 0.0);
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let dist = SimulatedDistribution::default();
        assert_eq!(dist.average(), 0.0);
        assert_eq!(dist.at_least(0), 0.0);
        assert_eq!(dist.min, None);
    }

    #[test]
    fn frequencies_sum_to_sample_count() {
        let deck = half_lands();
        let mut sampler = Sampler::with_seed(8);
        let batch = sampler.build(&deck, 500);
        let classifier = TagCount {
            category: Category::Land,
            depth: 4,
        };
        let dist = aggregate(&deck, batch.samples(), &classifier);
        assert_eq!(dist.frequencies.iter().sum::<u64>(), 500);
        assert!(dist.max.unwrap_or(0) <= 4);
    }

    #[test]
    fn empirical_mean_converges_to_exact() {
        let deck = half_lands();
        let mut sampler = Sampler::with_seed(123);
        let batch = sampler.build(&deck, 4_000);
        let classifier = TagCount {
            category: Category::Land,
            depth: 4,
        };
        let dist = aggregate(&deck, batch.samples(), &classifier);
        let exact = expected_value(100, 50, 4);
        assert_eq!(exact, 2.0);
        assert!((dist.average() - exact).abs() <= exact * 0.05, "mean {}", dist.average());

        let pmf = ExactDistribution::hypergeometric(100, 50, 4);
        for k in 0..=4 {
            assert!((dist.probability(k) - pmf.probability(k)).abs() < 0.04, "k={k}");
        }
    }
}
