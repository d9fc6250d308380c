//! Interim and rollforward replanning
//!
//! Merges the results of interim testing with the full-period requirement.
//! The observed interim deviation rate can only raise the planning
//! assumption, and the rollforward period always receives at least its
//! proportional share of the replanned sample, even when interim work alone
//! already meets the raw requirement.

use thiserror::Error;

use crate::domain::constants::ADVISORY_NOTE;
use crate::domain::estimator::{EstimateError, SampleSizeEstimator};
use crate::domain::parameters::{
    DeviationRate, ExceptionCount, InterimSampleSize, RequiredSample, RollforwardInputs,
    RollforwardPopulation, SamplingParameters,
};
use crate::domain::result::{RollforwardOutcome, SamplingResult};

/// Interim inputs that cannot be replanned
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RollforwardError {
    #[error("{exceptions} exceptions cannot exceed the {interim} items tested at interim")]
    ExceptionsExceedInterimSample {
        exceptions: ExceptionCount,
        interim: InterimSampleSize,
    },

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Replans the full-period sample from interim results
#[derive(Debug, Clone, Copy, Default)]
pub struct RollforwardPlanner {
    estimator: SampleSizeEstimator,
}

impl RollforwardPlanner {
    pub fn new(estimator: SampleSizeEstimator) -> Self {
        Self { estimator }
    }

    /// Base estimate plus replanned rollforward figures
    pub fn plan(
        &self,
        parameters: &SamplingParameters,
        inputs: &RollforwardInputs,
    ) -> Result<SamplingResult, RollforwardError> {
        let base = self.estimator.estimate(parameters)?;
        let outcome = self.replan(parameters, inputs)?;
        Ok(SamplingResult::with_rollforward(*parameters, base, outcome))
    }

    /// Rollforward figures only
    pub fn replan(
        &self,
        parameters: &SamplingParameters,
        inputs: &RollforwardInputs,
    ) -> Result<RollforwardOutcome, RollforwardError> {
        let exceptions = inputs.effective_exceptions();
        let interim = inputs.interim_sample_size;

        let observed_deviation_rate = DeviationRate::observed(exceptions, interim).ok_or(
            RollforwardError::ExceptionsExceedInterimSample {
                exceptions,
                interim,
            },
        )?;
        let planned_expected_deviation = parameters
            .expected_deviation
            .raised_to(observed_deviation_rate);

        let replanned_parameters = SamplingParameters {
            expected_deviation: planned_expected_deviation,
            ..*parameters
        };
        let replanned_required_sample = self.estimator.estimate(&replanned_parameters)?;

        let population = parameters.population.into_inner();
        let rollforward_population = inputs.rollforward_population.into_inner().min(population);
        let proportional_minimum =
            proportional_share(replanned_required_sample, rollforward_population, population);

        let additional_rollforward_sample = replanned_required_sample
            .into_inner()
            .saturating_sub(interim.into_inner())
            .max(proportional_minimum);
        let adjusted_total_sample = interim
            .into_inner()
            .saturating_add(additional_rollforward_sample);

        let advisory_note = (inputs.issues_found && exceptions.into_inner() > 0)
            .then(|| ADVISORY_NOTE.to_string());

        Ok(RollforwardOutcome {
            inputs: RollforwardInputs::new(
                interim,
                inputs.issues_found,
                exceptions,
                RollforwardPopulation::new(rollforward_population),
            ),
            observed_deviation_rate,
            planned_expected_deviation,
            replanned_required_sample,
            proportional_minimum,
            additional_rollforward_sample,
            adjusted_total_sample,
            advisory_note,
        })
    }
}

/// `ceil(required × part / whole)`, or zero for an empty population
fn proportional_share(required: RequiredSample, part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let share = (u128::from(required.into_inner()) * u128::from(part)).div_ceil(u128::from(whole));
    u64::try_from(share).unwrap_or(u64::MAX)
}
