//! Unbiased shuffling and reproducible sample batches.

mod batch;
mod shuffle;

pub use batch::{GrowthPolicy, Sample, SampleBatch, Sampler};
pub use shuffle::{shuffle, shuffled_indices};
