//! Calculation service tying validation, estimation and replanning together

use tracing::{debug, info, instrument, warn};

use crate::application::request::{CalculationRequest, ValidatedRequest};
use crate::domain::{RollforwardPlanner, SampleSizeEstimator, SamplingResult};
use crate::error::Result;
use crate::infrastructure::log_messages;

/// Stateless calculator; every call returns a complete, independent result
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplingCalculator {
    estimator: SampleSizeEstimator,
    planner: RollforwardPlanner,
}

impl SamplingCalculator {
    pub fn new(estimator: SampleSizeEstimator) -> Self {
        Self {
            estimator,
            planner: RollforwardPlanner::new(estimator),
        }
    }

    /// Validate a raw request and calculate it
    #[instrument(skip(self, request), fields(rollforward = request.rollforward_enabled))]
    pub fn calculate(&self, request: &CalculationRequest) -> Result<SamplingResult> {
        let validated = request.validate().inspect_err(|error| {
            warn!(%error, "{}", log_messages::calculation::VALIDATION_FAILED);
        })?;
        self.calculate_validated(&validated)
    }

    /// Calculate an already validated request
    pub fn calculate_validated(&self, request: &ValidatedRequest) -> Result<SamplingResult> {
        let parameters = request.parameters;

        if parameters.tolerable_deviation.is_substituted() {
            warn!(
                supplied = parameters.tolerable_deviation.into_inner(),
                "{}",
                log_messages::calculation::TOLERABLE_SUBSTITUTED
            );
        }

        let trace = self.estimator.trace(&parameters)?;
        debug!(
            base = trace.base,
            unrounded = trace.unrounded(),
            required = trace.required.into_inner(),
            "{}",
            log_messages::calculation::BASE_ESTIMATED
        );

        let result = match &request.rollforward {
            Some(inputs) => {
                let outcome = self.planner.replan(&parameters, inputs)?;
                debug!(
                    observed = outcome.observed_deviation_rate.into_inner(),
                    planned = outcome.planned_expected_deviation.into_inner(),
                    proportional_minimum = outcome.proportional_minimum,
                    "{}",
                    log_messages::calculation::ROLLFORWARD_REPLANNED
                );
                SamplingResult::with_rollforward(parameters, trace.required, outcome)
            }
            None => SamplingResult::without_rollforward(parameters, trace.required),
        };

        info!(
            population = parameters.population.into_inner(),
            confidence = parameters.confidence.percent(),
            base = result.base_required_sample.into_inner(),
            adjusted_total = result.adjusted_total_sample(),
            advisory = result.advisory_note().is_some(),
            "{}",
            log_messages::calculation::COMPLETED
        );

        Ok(result)
    }
}
