//! Turning sample batches into empirical distributions.

mod classifier;
mod detail;
mod histogram;

pub use classifier::{
    AnyTagCount, Classifier, FirstMatchPosition, ManaValueTotal, MeetsRequirements, PowerTotal,
    TagCount,
};
pub use detail::{SampleDetail, detail_slice};
pub use histogram::{SimulatedDistribution, aggregate};
