//! End-to-end calculation scenarios through the public request API

use audit_sampling::domain::constants::ADVISORY_NOTE;
use audit_sampling::{CalculationRequest, Error, RollforwardRequest, SamplingCalculator};
use rstest::rstest;

fn calculator() -> SamplingCalculator {
    SamplingCalculator::default()
}

#[rstest]
#[case::classic_parameters("5000", "90%", "0.00", "0.05", 45)]
#[case::ninety_five_percent("5000", "95%", "0.00", "0.05", 59)]
#[case::ninety_nine_percent("5000", "99%", "0.00", "0.05", 90)]
#[case::small_population("500", "90%", "0.00", "0.05", 23)]
#[case::threshold_population("1000", "90%", "0.00", "0.05", 45)]
#[case::tiny_population("1", "99%", "0.00", "0.05", 5)]
#[case::expected_deviation_inflates("5000", "90%", "0.01", "0.05", 46)]
#[case::zero_tolerable_uses_default("5000", "90%", "0.00", "0", 45)]
#[case::wider_tolerable_rate("5000", "90%", "0.00", "0.10", 22)]
#[case::expected_above_one("5000", "90%", "1.5", "0.05", 180)]
#[case::tight_tolerable_rate("5000", "90%", "0.00", "0.0001", 23_025)]
fn test_base_sample_size(
    #[case] population: &str,
    #[case] confidence: &str,
    #[case] expected: &str,
    #[case] tolerable: &str,
    #[case] required: u64,
) {
    let result = calculator()
        .calculate(&CalculationRequest::new(
            population, confidence, expected, tolerable,
        ))
        .unwrap();

    assert_eq!(result.base_required_sample.into_inner(), required);
    assert_eq!(result.replanned_required_sample().into_inner(), required);
    assert_eq!(result.additional_rollforward_sample(), 0);
    assert_eq!(result.adjusted_total_sample(), required);
    assert!(result.advisory_note().is_none());
}

#[test]
fn test_small_population_is_scaled_relative_to_large_population() {
    let large = calculator()
        .calculate(&CalculationRequest::new("5000", "90%", "0", "0.05"))
        .unwrap();
    let small = calculator()
        .calculate(&CalculationRequest::new("500", "90%", "0", "0.05"))
        .unwrap();

    assert!(small.base_required_sample < large.base_required_sample);
    // Half the population, half the unrounded requirement (44.89 / 2), rounded up
    assert_eq!(small.base_required_sample.into_inner(), 23);
}

#[test]
fn test_interim_exceptions_replan_the_full_period() {
    let request = CalculationRequest::new("5000", "90%", "0", "0.05")
        .with_rollforward(RollforwardRequest::new("45", true, "2", "1000"));
    let result = calculator().calculate(&request).unwrap();
    let outcome = result.rollforward.as_ref().unwrap();

    assert!((outcome.observed_deviation_rate.into_inner() - 0.0444).abs() < 1e-4);
    assert_eq!(
        outcome.planned_expected_deviation,
        outcome.observed_deviation_rate
    );
    assert_eq!(result.base_required_sample.into_inner(), 45);
    assert_eq!(outcome.replanned_required_sample.into_inner(), 49);
    assert_eq!(outcome.additional_rollforward_sample, 10);
    assert_eq!(outcome.adjusted_total_sample, 55);
    assert_eq!(result.advisory_note(), Some(ADVISORY_NOTE));
}

#[test]
fn test_clean_interim_results_ignore_stray_exception_count() {
    let request = CalculationRequest::new("5000", "90%", "0", "0.05")
        .with_rollforward(RollforwardRequest::new("45", false, "3", "1000"));
    let result = calculator().calculate(&request).unwrap();
    let outcome = result.rollforward.as_ref().unwrap();

    assert_eq!(outcome.inputs.exception_count.into_inner(), 0);
    assert_eq!(outcome.observed_deviation_rate.into_inner(), 0.0);
    assert_eq!(outcome.replanned_required_sample.into_inner(), 45);
    assert_eq!(outcome.additional_rollforward_sample, 9);
    assert_eq!(outcome.adjusted_total_sample, 54);
    assert!(result.advisory_note().is_none());
}

#[rstest]
#[case::interim_covers_less_than_requirement("20", "1000", 25, 45)]
#[case::interim_exceeds_requirement("100", "1000", 9, 109)]
#[case::rollforward_larger_than_population("20", "7000", 45, 65)]
#[case::no_rollforward_population("20", "0", 25, 45)]
#[case::nothing_tested_at_interim("0", "1000", 45, 45)]
fn test_additional_rollforward_sample(
    #[case] interim: &str,
    #[case] rollforward_population: &str,
    #[case] additional: u64,
    #[case] adjusted_total: u64,
) {
    let request = CalculationRequest::new("5000", "90%", "0", "0.05").with_rollforward(
        RollforwardRequest::new(interim, false, "0", rollforward_population),
    );
    let result = calculator().calculate(&request).unwrap();

    assert_eq!(result.additional_rollforward_sample(), additional);
    assert_eq!(result.adjusted_total_sample(), adjusted_total);
}

#[rstest]
#[case::population_text("lots", "90%", "0", "0.05", "population")]
#[case::population_zero("0", "90%", "0", "0.05", "population")]
#[case::confidence_unsupported("5000", "85%", "0", "0.05", "confidence")]
#[case::expected_negative("5000", "90%", "-0.1", "0.05", "expected_deviation")]
#[case::expected_text("5000", "90%", "some", "0.05", "expected_deviation")]
#[case::tolerable_certain("5000", "90%", "0", "1", "tolerable_deviation")]
#[case::tolerable_empty("5000", "90%", "0", "  ", "tolerable_deviation")]
#[case::tolerable_vanishing("5000", "90%", "0", "1e-17", "tolerable_deviation")]
#[case::expected_unbounded("5000", "90%", "1e300", "0.05", "expected_deviation")]
fn test_invalid_inputs_are_rejected(
    #[case] population: &str,
    #[case] confidence: &str,
    #[case] expected: &str,
    #[case] tolerable: &str,
    #[case] field: &str,
) {
    let error = calculator()
        .calculate(&CalculationRequest::new(
            population, confidence, expected, tolerable,
        ))
        .unwrap_err();

    match error {
        Error::Validation { field: reported, .. } => assert_eq!(reported, field),
        other => panic!("expected validation error, got {other:?}"),
    }
}
