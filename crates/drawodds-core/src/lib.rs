#![deny(warnings)]
pub mod aggregate;
pub mod cache;
pub mod calculator;
pub mod math;
pub mod model;
pub mod sampling;

pub use calculator::{Calculator, CalculatorOptions, CrossCheck, QueryError};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "drawodds"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
