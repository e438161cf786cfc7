//! Exact combinatorics for drawing cards without replacement.
//!
//! - `binomial`: the incremental binomial coefficient everything else builds on.
//! - `hypergeometric`: single-category exact and tail probabilities.
//! - `multivariate`: joint "at least" probabilities over two or three disjoint categories.
//! - `distribution`: the dense exact-distribution record handed to callers.

mod binomial;
mod distribution;
mod hypergeometric;
mod multivariate;

pub use binomial::choose;
pub use distribution::{ExactDistribution, OutcomeProbability};
pub use hypergeometric::{
    at_least_k, at_most_k, clamp_probability, exactly_k, expected_value, pmf, variance,
};
pub use multivariate::{Requirement, at_least_three, at_least_two};
