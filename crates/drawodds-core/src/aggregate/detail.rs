use super::classifier::Classifier;
use crate::model::deck::Deck;
use crate::sampling::SampleBatch;
use serde::Serialize;
use std::ops::Range;

/// Display record for one sample: its outcome and the cards that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleDetail {
    pub index: usize,
    pub outcome: usize,
    pub drawn: Vec<String>,
}

/// Classifies `range` of the batch, clamped to its bounds.
///
/// Callers page through a large batch by requesting consecutive ranges.
pub fn detail_slice<C: Classifier + ?Sized>(
    deck: &Deck,
    batch: &SampleBatch,
    classifier: &C,
    depth: usize,
    range: Range<usize>,
) -> Vec<SampleDetail> {
    let end = range.end.min(batch.len());
    let start = range.start.min(end);
    batch.samples()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, sample)| SampleDetail {
            index: start + offset,
            outcome: classifier.classify(deck, sample),
            drawn: sample
                .top(deck, depth)
                .map(|token| token.name.to_string())
                .collect(),
        })
        .collect()
}
