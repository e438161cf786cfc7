use crate::model::card::CardToken;
use crate::model::deck::{Deck, DeckId};
use crate::sampling::shuffle::shuffled_indices;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// How a cached batch grows when more samples are requested than it holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Append new samples; every previously returned sample keeps its index.
    #[default]
    Extend,
    /// Throw the batch away and draw a fresh one of the requested size.
    Regenerate,
}

/// One shuffled library, stored as a permutation of deck indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    order: Vec<u32>,
}

impl Sample {
    fn draw<R: RngCore>(deck: &Deck, rng: &mut R) -> Self {
        Self {
            order: shuffled_indices(deck.len(), rng),
        }
    }

    pub fn order(&self) -> &[u32] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cards in shuffled order.
    pub fn tokens<'a>(&'a self, deck: &'a Deck) -> impl Iterator<Item = &'a CardToken> + 'a {
        self.order
            .iter()
            .filter_map(move |&idx| deck.token(idx as usize))
    }

    /// The first `depth` cards (the whole sample when `depth` exceeds it).
    pub fn top<'a>(
        &'a self,
        deck: &'a Deck,
        depth: usize,
    ) -> impl Iterator<Item = &'a CardToken> + 'a {
        self.tokens(deck).take(depth)
    }
}

/// Samples drawn for one deck identity.
#[derive(Debug, Clone)]
pub struct SampleBatch {
    deck_id: DeckId,
    generation: u64,
    samples: Vec<Sample>,
    rng: StdRng,
}

impl SampleBatch {
    fn generate(deck: &Deck, count: usize, seed: u64, generation: u64) -> Self {
        let mut batch = Self {
            deck_id: deck.id(),
            generation,
            samples: Vec::with_capacity(count),
            rng: StdRng::seed_from_u64(mix_seed(seed, deck.id(), generation)),
        };
        batch.extend_to(deck, count);
        batch
    }

    fn extend_to(&mut self, deck: &Deck, count: usize) {
        while self.samples.len() < count {
            let sample = Sample::draw(deck, &mut self.rng);
            self.samples.push(sample);
        }
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The first `count` samples, clamped to the batch size.
    pub fn first(&self, count: usize) -> &[Sample] {
        &self.samples[..count.min(self.samples.len())]
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Owns the current batch and hands out stable views of it.
#[derive(Debug, Clone)]
pub struct Sampler {
    seed: u64,
    policy: GrowthPolicy,
    batch: Option<SampleBatch>,
}

impl Sampler {
    pub fn new(seed: u64, policy: GrowthPolicy) -> Self {
        Self {
            seed,
            policy,
            batch: None,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, GrowthPolicy::default())
    }

    pub fn from_entropy(policy: GrowthPolicy) -> Self {
        Self::new(rand::thread_rng().next_u64(), policy)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn batch(&self) -> Option<&SampleBatch> {
        self.batch.as_ref()
    }

    pub fn clear(&mut self) {
        self.batch = None;
    }

    /// Returns a batch of at least `count` samples of `deck`.
    ///
    /// A cached batch for the same deck identity is reused as-is when it
    /// already holds `count` samples. A new deck identity always starts a
    /// fresh batch.
    pub fn build(&mut self, deck: &Deck, count: usize) -> &SampleBatch {
        let seed = self.seed;
        let policy = self.policy;
        let batch = match self.batch.take() {
            Some(mut batch) if batch.deck_id == deck.id() => {
                if count > batch.len() {
                    match policy {
                        GrowthPolicy::Extend => {
                            event!(
                                Level::DEBUG,
                                deck = %deck.id(),
                                from = batch.len(),
                                to = count,
                                "extending sample batch"
                            );
                            batch.extend_to(deck, count);
                        }
                        GrowthPolicy::Regenerate => {
                            let generation = batch.generation + 1;
                            event!(
                                Level::DEBUG,
                                deck = %deck.id(),
                                generation,
                                count,
                                "regenerating sample batch"
                            );
                            batch = SampleBatch::generate(deck, count, seed, generation);
                        }
                    }
                }
                batch
            }
            _ => {
                event!(
                    Level::DEBUG,
                    deck = %deck.id(),
                    count,
                    "generating sample batch"
                );
                SampleBatch::generate(deck, count, seed, 0)
            }
        };
        self.batch.insert(batch)
    }
}

fn mix_seed(seed: u64, deck: DeckId, generation: u64) -> u64 {
    seed ^ deck.raw().rotate_left(23) ^ generation.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)
}
