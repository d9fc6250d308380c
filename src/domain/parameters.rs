//! Validated sampling inputs
//!
//! Newtypes for the quantities an auditor supplies when planning an
//! attribute test, so that the estimator and planner never see a raw
//! primitive that has not been through validation.

use derive_more::Display;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::constants::formula;

/// Number of items in the population under test
///
/// Zero is representable so that the estimator is total over its domain;
/// calculation requests require at least one item.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display
))]
pub struct Population(u64);

/// Items already tested during the interim phase
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display
))]
pub struct InterimSampleSize(u64);

/// Exceptions observed during interim testing
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display
))]
pub struct ExceptionCount(u64);

impl ExceptionCount {
    pub fn none() -> Self {
        Self::new(0)
    }
}

/// Items remaining to be tested after the interim date
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display
))]
pub struct RollforwardPopulation(u64);

/// A non-negative deviation rate expressed as a fraction
///
/// Used for the auditor's expected rate as well as rates derived from
/// interim results. Expected rates above 1.0 are unusual but still inflate
/// the sample; observed rates never exceed 1.0 because exceptions cannot
/// outnumber the items tested.
#[nutype(
    validate(finite, greater_or_equal = 0.0),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Display)
)]
pub struct DeviationRate(f64);

impl DeviationRate {
    /// No anticipated deviations
    pub fn zero() -> Self {
        Self::try_new(0.0).expect("Zero deviation rate is valid")
    }

    /// Rate of `exceptions` within `tested` items, or zero when nothing was tested
    ///
    /// `None` when more exceptions are reported than items were tested.
    pub fn observed(exceptions: ExceptionCount, tested: InterimSampleSize) -> Option<Self> {
        let (exceptions, tested) = (exceptions.into_inner(), tested.into_inner());
        if tested == 0 {
            return Some(Self::zero());
        }
        if exceptions > tested {
            return None;
        }
        Self::try_new(exceptions as f64 / tested as f64).ok()
    }

    /// The larger of this rate and `other`
    pub fn raised_to(self, other: Self) -> Self {
        if other.into_inner() > self.into_inner() {
            other
        } else {
            self
        }
    }
}

/// Highest deviation rate the test must be able to detect
///
/// Non-positive values are accepted here and replaced with the default
/// rate by the estimator; rates of 1.0 or more are rejected.
#[nutype(
    validate(finite, less = 1.0),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Display)
)]
pub struct TolerableDeviation(f64);

impl TolerableDeviation {
    /// Conventional 5% tolerable rate
    pub fn standard() -> Self {
        Self::try_new(formula::DEFAULT_TOLERABLE_DEVIATION)
            .expect("Default tolerable deviation is valid")
    }

    /// Rate actually fed into the formula
    pub fn effective(&self) -> f64 {
        let rate = self.into_inner();
        if rate <= 0.0 {
            formula::DEFAULT_TOLERABLE_DEVIATION
        } else {
            rate
        }
    }

    /// Whether the default rate will be substituted for this value
    pub fn is_substituted(&self) -> bool {
        self.into_inner() <= 0.0
    }
}

/// Sample size recommended by the estimator, never below the minimum
#[nutype(
    validate(greater_or_equal = 5),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        Display
    )
)]
pub struct RequiredSample(u64);

impl RequiredSample {
    /// Smallest sample the estimator recommends
    pub fn minimum() -> Self {
        Self::try_new(formula::MIN_SAMPLE_SIZE).expect("Minimum sample size is valid")
    }

    /// Clamp a raw count up to the minimum
    pub fn at_least_minimum(raw: u64) -> Self {
        Self::try_new(raw.max(formula::MIN_SAMPLE_SIZE)).unwrap_or_else(|_| Self::minimum())
    }
}

/// Assurance level required from the test
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ConfidenceLevel {
    #[default]
    #[display("90%")]
    Ninety,
    #[display("95%")]
    NinetyFive,
    #[display("99%")]
    NinetyNine,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 3] = [
        ConfidenceLevel::Ninety,
        ConfidenceLevel::NinetyFive,
        ConfidenceLevel::NinetyNine,
    ];

    pub fn percent(&self) -> u8 {
        match self {
            ConfidenceLevel::Ninety => 90,
            ConfidenceLevel::NinetyFive => 95,
            ConfidenceLevel::NinetyNine => 99,
        }
    }

    pub fn fraction(&self) -> f64 {
        f64::from(self.percent()) / formula::PERCENT_DIVISOR
    }
}

/// Confidence level outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported confidence level '{0}' (expected 90%, 95% or 99%)")]
pub struct UnsupportedConfidence(pub String);

impl TryFrom<u8> for ConfidenceLevel {
    type Error = UnsupportedConfidence;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        match percent {
            90 => Ok(ConfidenceLevel::Ninety),
            95 => Ok(ConfidenceLevel::NinetyFive),
            99 => Ok(ConfidenceLevel::NinetyNine),
            other => Err(UnsupportedConfidence(other.to_string())),
        }
    }
}

impl From<ConfidenceLevel> for u8 {
    fn from(level: ConfidenceLevel) -> Self {
        level.percent()
    }
}

impl FromStr for ConfidenceLevel {
    type Err = UnsupportedConfidence;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        digits
            .parse::<u8>()
            .map_err(|_| UnsupportedConfidence(s.to_string()))
            .and_then(|percent| {
                ConfidenceLevel::try_from(percent).map_err(|_| UnsupportedConfidence(s.to_string()))
            })
    }
}

/// Planned parameters for one attribute test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParameters {
    pub population: Population,
    pub confidence: ConfidenceLevel,
    pub expected_deviation: DeviationRate,
    pub tolerable_deviation: TolerableDeviation,
}

impl SamplingParameters {
    pub fn new(
        population: Population,
        confidence: ConfidenceLevel,
        expected_deviation: DeviationRate,
        tolerable_deviation: TolerableDeviation,
    ) -> Self {
        Self {
            population,
            confidence,
            expected_deviation,
            tolerable_deviation,
        }
    }
}

/// Interim results supplied when rollforward testing is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollforwardInputs {
    pub interim_sample_size: InterimSampleSize,
    pub issues_found: bool,
    pub exception_count: ExceptionCount,
    pub rollforward_population: RollforwardPopulation,
}

impl RollforwardInputs {
    pub fn new(
        interim_sample_size: InterimSampleSize,
        issues_found: bool,
        exception_count: ExceptionCount,
        rollforward_population: RollforwardPopulation,
    ) -> Self {
        Self {
            interim_sample_size,
            issues_found,
            exception_count,
            rollforward_population,
        }
    }

    /// Exceptions that count towards the observed rate
    ///
    /// A stray count is ignored when no issues were reported.
    pub fn effective_exceptions(&self) -> ExceptionCount {
        if self.issues_found {
            self.exception_count
        } else {
            ExceptionCount::none()
        }
    }
}
