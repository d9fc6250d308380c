//! Property-based tests for sample size and replanning invariants

use audit_sampling::domain::{
    estimate, ConfidenceLevel, DeviationRate, EstimateError, ExceptionCount, InterimSampleSize,
    Population, RequiredSample, RollforwardInputs, RollforwardPlanner, RollforwardPopulation,
    SamplingParameters, TolerableDeviation,
};
use proptest::prelude::*;

// Property test generators
pub mod generators {
    use super::*;

    pub fn population() -> impl Strategy<Value = Population> {
        (0u64..10_000_000).prop_map(Population::new)
    }

    pub fn confidence() -> impl Strategy<Value = ConfidenceLevel> {
        prop_oneof![
            Just(ConfidenceLevel::Ninety),
            Just(ConfidenceLevel::NinetyFive),
            Just(ConfidenceLevel::NinetyNine),
        ]
    }

    /// Includes rates above 100%, which still inflate the sample
    pub fn expected_deviation() -> impl Strategy<Value = DeviationRate> {
        (0.0f64..=5.0).prop_filter_map("Invalid deviation rate", |rate| {
            DeviationRate::try_new(rate).ok()
        })
    }

    pub fn tolerable_deviation() -> impl Strategy<Value = TolerableDeviation> {
        (0.001f64..0.999).prop_filter_map("Invalid tolerable rate", |rate| {
            TolerableDeviation::try_new(rate).ok()
        })
    }

    pub fn parameters() -> impl Strategy<Value = SamplingParameters> {
        (
            (1u64..1_000_000).prop_map(Population::new),
            confidence(),
            expected_deviation(),
            tolerable_deviation(),
        )
            .prop_map(|(population, confidence, expected, tolerable)| {
                SamplingParameters::new(population, confidence, expected, tolerable)
            })
    }

    /// Interim results where exceptions never exceed the items tested
    pub fn rollforward_inputs() -> impl Strategy<Value = RollforwardInputs> {
        (0u64..500, any::<bool>(), 0u64..2_000_000)
            .prop_flat_map(|(interim, issues, rollforward)| {
                (Just(interim), Just(issues), 0..=interim, Just(rollforward))
            })
            .prop_map(|(interim, issues, exceptions, rollforward)| {
                RollforwardInputs::new(
                    InterimSampleSize::new(interim),
                    issues,
                    ExceptionCount::new(exceptions),
                    RollforwardPopulation::new(rollforward),
                )
            })
    }
}

use generators::*;

proptest! {
    #[test]
    fn estimate_never_falls_below_minimum(
        population in population(),
        confidence in confidence(),
        expected in expected_deviation(),
        tolerable in tolerable_deviation(),
    ) {
        let required = estimate(population, confidence, expected, tolerable).unwrap();
        prop_assert!(required >= RequiredSample::minimum());
    }

    #[test]
    fn higher_confidence_never_needs_fewer_items(population in population()) {
        let sizes: Vec<_> = ConfidenceLevel::ALL
            .iter()
            .map(|confidence| {
                estimate(
                    population,
                    *confidence,
                    DeviationRate::zero(),
                    TolerableDeviation::standard(),
                )
                .unwrap()
            })
            .collect();
        prop_assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn empty_population_always_needs_minimum(
        confidence in confidence(),
        expected in expected_deviation(),
        tolerable in tolerable_deviation(),
    ) {
        let required = estimate(Population::new(0), confidence, expected, tolerable).unwrap();
        prop_assert_eq!(required.into_inner(), 5);
    }

    #[test]
    fn estimate_is_deterministic(
        population in population(),
        confidence in confidence(),
        expected in expected_deviation(),
        tolerable in tolerable_deviation(),
    ) {
        prop_assert_eq!(
            estimate(population, confidence, expected, tolerable).unwrap(),
            estimate(population, confidence, expected, tolerable).unwrap()
        );
    }

    #[test]
    fn tightening_tolerance_never_lowers_the_requirement(
        population in population(),
        confidence in confidence(),
        tolerable in 1e-15f64..0.5,
        factor in 0.01f64..1.0,
    ) {
        let estimate_at = |rate: f64| {
            estimate(
                population,
                confidence,
                DeviationRate::zero(),
                TolerableDeviation::try_new(rate).unwrap(),
            )
        };
        let loose = estimate_at(tolerable).unwrap();
        match estimate_at(tolerable * factor) {
            Ok(tight) => prop_assert!(tight >= loose),
            Err(error) => {
                prop_assert!(matches!(error, EstimateError::TolerableDeviationTooSmall(_)))
            }
        }
    }

    #[test]
    fn clean_interim_results_observe_no_deviation(
        parameters in parameters(),
        inputs in rollforward_inputs(),
        stray in 0u64..1000,
    ) {
        let inputs = RollforwardInputs::new(
            inputs.interim_sample_size,
            false,
            ExceptionCount::new(stray.min(inputs.interim_sample_size.into_inner())),
            inputs.rollforward_population,
        );
        let outcome = RollforwardPlanner::default().replan(&parameters, &inputs).unwrap();

        prop_assert_eq!(outcome.observed_deviation_rate, DeviationRate::zero());
        prop_assert!(outcome.advisory_note.is_none());
    }

    #[test]
    fn replanning_respects_floors_and_totals(
        parameters in parameters(),
        inputs in rollforward_inputs(),
    ) {
        let outcome = RollforwardPlanner::default().replan(&parameters, &inputs).unwrap();

        prop_assert!(outcome.planned_expected_deviation >= parameters.expected_deviation);
        prop_assert!(outcome.additional_rollforward_sample >= outcome.proportional_minimum);
        prop_assert!(outcome.proportional_minimum <= outcome.replanned_required_sample.into_inner());
        prop_assert!(
            outcome.inputs.rollforward_population.into_inner()
                <= parameters.population.into_inner()
        );
        prop_assert!(
            outcome.adjusted_total_sample >= outcome.replanned_required_sample.into_inner()
        );
        prop_assert_eq!(
            outcome.adjusted_total_sample,
            inputs.interim_sample_size.into_inner() + outcome.additional_rollforward_sample
        );
    }

    #[test]
    fn advisory_note_only_with_reported_exceptions(
        parameters in parameters(),
        inputs in rollforward_inputs(),
    ) {
        let outcome = RollforwardPlanner::default().replan(&parameters, &inputs).unwrap();
        let expects_note = inputs.issues_found && inputs.exception_count.into_inner() > 0;
        prop_assert_eq!(outcome.advisory_note.is_some(), expects_note);
    }
}
