//! Audit Sampling - attribute sample sizes for control testing
//!
//! Computes the sample needed to test a control at a given confidence level
//! and tolerable deviation rate, and replans the full-period sample when
//! interim testing is followed by a rollforward period.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod report;

pub use application::{CalculationRequest, RollforwardRequest, SamplingCalculator};
pub use domain::{estimate, SampleSizeEstimator, SamplingResult};
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        let result = SamplingCalculator::default()
            .calculate(&CalculationRequest::new("5000", "90%", "0", "0.05"));
        assert!(result.is_ok());
    }
}
