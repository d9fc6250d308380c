//! Calculation results
//!
//! A [`SamplingResult`] is built in full for every calculation and never
//! updated afterwards; a new calculation produces a new value.

use serde::{Deserialize, Serialize};

use crate::domain::parameters::{DeviationRate, RequiredSample, RollforwardInputs, SamplingParameters};

/// Replanning figures derived from interim results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollforwardOutcome {
    /// Interim inputs as used: exceptions zeroed when no issues were
    /// reported, rollforward population clamped to the population
    pub inputs: RollforwardInputs,
    pub observed_deviation_rate: DeviationRate,
    pub planned_expected_deviation: DeviationRate,
    pub replanned_required_sample: RequiredSample,
    pub proportional_minimum: u64,
    pub additional_rollforward_sample: u64,
    pub adjusted_total_sample: u64,
    pub advisory_note: Option<String>,
}

/// Everything produced by one calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingResult {
    pub parameters: SamplingParameters,
    pub base_required_sample: RequiredSample,
    pub rollforward: Option<RollforwardOutcome>,
}

impl SamplingResult {
    pub fn without_rollforward(
        parameters: SamplingParameters,
        base_required_sample: RequiredSample,
    ) -> Self {
        Self {
            parameters,
            base_required_sample,
            rollforward: None,
        }
    }

    pub fn with_rollforward(
        parameters: SamplingParameters,
        base_required_sample: RequiredSample,
        outcome: RollforwardOutcome,
    ) -> Self {
        Self {
            parameters,
            base_required_sample,
            rollforward: Some(outcome),
        }
    }

    pub fn rollforward_enabled(&self) -> bool {
        self.rollforward.is_some()
    }

    /// Full-period requirement; the base figure when no replanning took place
    pub fn replanned_required_sample(&self) -> RequiredSample {
        self.rollforward
            .as_ref()
            .map_or(self.base_required_sample, |outcome| {
                outcome.replanned_required_sample
            })
    }

    /// Additional items to test in the rollforward period (zero without rollforward)
    pub fn additional_rollforward_sample(&self) -> u64 {
        self.rollforward
            .as_ref()
            .map_or(0, |outcome| outcome.additional_rollforward_sample)
    }

    /// Interim plus rollforward items; the base figure when no replanning took place
    pub fn adjusted_total_sample(&self) -> u64 {
        self.rollforward
            .as_ref()
            .map_or(self.base_required_sample.into_inner(), |outcome| {
                outcome.adjusted_total_sample
            })
    }

    /// Expected deviation the final figures were planned with
    pub fn planned_expected_deviation(&self) -> DeviationRate {
        self.rollforward
            .as_ref()
            .map_or(self.parameters.expected_deviation, |outcome| {
                outcome.planned_expected_deviation
            })
    }

    pub fn advisory_note(&self) -> Option<&str> {
        self.rollforward
            .as_ref()
            .and_then(|outcome| outcome.advisory_note.as_deref())
    }
}
