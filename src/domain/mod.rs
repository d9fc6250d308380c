//! Domain types and sampling logic
//!
//! Validated planning inputs, the sample size estimator, and the
//! interim/rollforward replanning rules. Everything in this module is a
//! pure calculation with no I/O.

pub mod config_types;
pub mod constants;
pub mod estimator;
pub mod parameters;
pub mod result;
pub mod rollforward;

pub use estimator::{
    estimate, EstimateError, EstimateTrace, SampleSizeEstimator, SizeAdjustment,
};
pub use parameters::*;
pub use result::{RollforwardOutcome, SamplingResult};
pub use rollforward::{RollforwardError, RollforwardPlanner};
