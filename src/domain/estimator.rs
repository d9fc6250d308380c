//! Attribute sample size estimation
//!
//! Converts planned sampling parameters into a required sample size using
//! the zero-deviation binomial bound
//!
//! ```text
//! n = ln(1 - confidence) / ln(1 - tolerable)
//! ```
//!
//! followed by an ordered pipeline of adjustments over the running value.
//! Both adjustments are heuristics (a linear widening for anticipated
//! deviations and a linear scale-down for small populations), not exact
//! small-sample corrections. The result is rounded up and floored at the
//! minimum sample size. Inputs whose requirement cannot be expressed as a
//! finite item count are rejected rather than rounded to the minimum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::constants::formula;
use crate::domain::parameters::{
    ConfidenceLevel, DeviationRate, Population, RequiredSample, SamplingParameters,
    TolerableDeviation,
};

/// Parameters for which no sample size can be computed
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EstimateError {
    /// `1 - tolerable` rounds to exactly 1.0, so the bound divides by zero
    #[error("tolerable deviation {0} is too small to bound a sample size")]
    TolerableDeviationTooSmall(f64),

    #[error("required sample size {0} exceeds the largest countable sample")]
    SampleSizeOverflow(f64),
}

/// A named step applied to the running sample size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeAdjustment {
    /// Widen the sample by `1 + 2 × expected deviation` when deviations are anticipated
    DeviationInflation,
    /// Scale the sample by `population / 1000` for populations under 1000 items
    FinitePopulationScaleDown,
}

impl SizeAdjustment {
    /// Adjustments in the order they are applied
    pub const PIPELINE: [SizeAdjustment; 2] = [
        SizeAdjustment::DeviationInflation,
        SizeAdjustment::FinitePopulationScaleDown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SizeAdjustment::DeviationInflation => "deviation_inflation",
            SizeAdjustment::FinitePopulationScaleDown => "finite_population_scale_down",
        }
    }

    /// Apply this step to the running sample size
    pub fn apply(&self, running: f64, parameters: &SamplingParameters) -> f64 {
        match self {
            SizeAdjustment::DeviationInflation => {
                let expected = parameters.expected_deviation.into_inner();
                // Strictly positive: a zero expectation leaves the value untouched
                if expected > 0.0 {
                    running * (1.0 + expected * formula::DEVIATION_INFLATION_MULTIPLIER)
                } else {
                    running
                }
            }
            SizeAdjustment::FinitePopulationScaleDown => {
                let population = parameters.population.into_inner();
                if population < formula::SMALL_POPULATION_THRESHOLD {
                    running * (population as f64 / formula::SMALL_POPULATION_THRESHOLD as f64)
                } else {
                    running
                }
            }
        }
    }
}

/// Running value after one adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentOutcome {
    pub adjustment: SizeAdjustment,
    pub value: f64,
}

/// Every intermediate value of one estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateTrace {
    /// Tolerable rate actually used by the formula
    pub effective_tolerable_deviation: f64,
    /// Unadjusted binomial bound
    pub base: f64,
    pub adjustments: Vec<AdjustmentOutcome>,
    pub required: RequiredSample,
}

impl EstimateTrace {
    /// Value before rounding
    pub fn unrounded(&self) -> f64 {
        self.adjustments
            .last()
            .map(|outcome| outcome.value)
            .unwrap_or(self.base)
    }
}

/// Pure sample size calculation with no state between calls
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSizeEstimator;

impl SampleSizeEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Required sample for the given parameters
    pub fn estimate(
        &self,
        parameters: &SamplingParameters,
    ) -> Result<RequiredSample, EstimateError> {
        self.trace(parameters).map(|trace| trace.required)
    }

    /// Estimate while recording each intermediate value
    pub fn trace(&self, parameters: &SamplingParameters) -> Result<EstimateTrace, EstimateError> {
        let effective_tolerable_deviation = parameters.tolerable_deviation.effective();
        let base = binomial_bound(parameters.confidence, effective_tolerable_deviation)?;

        let mut running = base;
        let adjustments = SizeAdjustment::PIPELINE
            .iter()
            .map(|adjustment| {
                running = adjustment.apply(running, parameters);
                AdjustmentOutcome {
                    adjustment: *adjustment,
                    value: running,
                }
            })
            .collect();

        Ok(EstimateTrace {
            effective_tolerable_deviation,
            base,
            adjustments,
            required: round_up_to_minimum(running)?,
        })
    }
}

/// Required sample for one set of planning inputs
pub fn estimate(
    population: Population,
    confidence: ConfidenceLevel,
    expected_deviation: DeviationRate,
    tolerable_deviation: TolerableDeviation,
) -> Result<RequiredSample, EstimateError> {
    SampleSizeEstimator::new().estimate(&SamplingParameters::new(
        population,
        confidence,
        expected_deviation,
        tolerable_deviation,
    ))
}

/// Smallest sample that detects `tolerable` at `confidence` when no deviations are found
fn binomial_bound(confidence: ConfidenceLevel, tolerable: f64) -> Result<f64, EstimateError> {
    let denominator = (1.0 - tolerable).ln();
    if denominator == 0.0 {
        return Err(EstimateError::TolerableDeviationTooSmall(tolerable));
    }
    Ok((1.0 - confidence.fraction()).ln() / denominator)
}

fn round_up_to_minimum(value: f64) -> Result<RequiredSample, EstimateError> {
    let rounded = value.ceil();
    // u64::MAX as f64 rounds up to 2^64, which itself does not fit
    if !rounded.is_finite() || rounded >= u64::MAX as f64 {
        return Err(EstimateError::SampleSizeOverflow(value));
    }
    Ok(RequiredSample::at_least_minimum(rounded.max(0.0) as u64))
}
