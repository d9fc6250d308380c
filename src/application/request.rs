//! Calculation requests arriving from the boundary layer
//!
//! Fields arrive as text (form fields, CLI arguments) or as JSON numbers and
//! are parsed into validated domain types here, before any estimation runs.
//! A request either validates completely or is rejected with the first
//! offending field.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::constants::rates;
use crate::domain::{
    ConfidenceLevel, DeviationRate, ExceptionCount, InterimSampleSize, Population,
    RollforwardInputs, RollforwardPopulation, SamplingParameters, TolerableDeviation,
};
use crate::error::{Error, Result};

/// Field names reported in validation errors
pub mod fields {
    pub const POPULATION: &str = "population";
    pub const CONFIDENCE: &str = "confidence";
    pub const EXPECTED_DEVIATION: &str = "expected_deviation";
    pub const TOLERABLE_DEVIATION: &str = "tolerable_deviation";
    pub const ROLLFORWARD: &str = "rollforward";
    pub const INTERIM_SAMPLE_SIZE: &str = "interim_sample_size";
    pub const ISSUES_FOUND: &str = "issues_found";
    pub const EXCEPTION_COUNT: &str = "exception_count";
    pub const ROLLFORWARD_POPULATION: &str = "rollforward_population";
}

/// A raw field value, either free text or a JSON number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Real(value) => write!(f, "{value}"),
            FieldValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

/// Interim results as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollforwardRequest {
    pub interim_sample_size: Option<FieldValue>,
    pub issues_found: Option<bool>,
    pub exception_count: Option<FieldValue>,
    pub rollforward_population: Option<FieldValue>,
}

impl RollforwardRequest {
    pub fn new(
        interim_sample_size: impl Into<FieldValue>,
        issues_found: bool,
        exception_count: impl Into<FieldValue>,
        rollforward_population: impl Into<FieldValue>,
    ) -> Self {
        Self {
            interim_sample_size: Some(interim_sample_size.into()),
            issues_found: Some(issues_found),
            exception_count: Some(exception_count.into()),
            rollforward_population: Some(rollforward_population.into()),
        }
    }

    fn validate(&self) -> Result<RollforwardInputs> {
        let interim_sample_size = InterimSampleSize::new(parse_count(
            fields::INTERIM_SAMPLE_SIZE,
            required(fields::INTERIM_SAMPLE_SIZE, self.interim_sample_size.as_ref())?,
        )?);
        let issues_found = self
            .issues_found
            .ok_or_else(|| Error::validation(fields::ISSUES_FOUND, MISSING))?;

        // Only read when issues were reported; otherwise the field is ignored entirely
        let exception_count = if issues_found {
            let count = parse_count(
                fields::EXCEPTION_COUNT,
                required(fields::EXCEPTION_COUNT, self.exception_count.as_ref())?,
            )?;
            if count > interim_sample_size.into_inner() {
                return Err(Error::validation(
                    fields::EXCEPTION_COUNT,
                    format!(
                        "{count} exceptions cannot exceed the {interim_sample_size} items tested at interim"
                    ),
                ));
            }
            ExceptionCount::new(count)
        } else {
            ExceptionCount::none()
        };

        let rollforward_population = parse_count(
            fields::ROLLFORWARD_POPULATION,
            required(
                fields::ROLLFORWARD_POPULATION,
                self.rollforward_population.as_ref(),
            )?,
        )?;

        Ok(RollforwardInputs::new(
            interim_sample_size,
            issues_found,
            exception_count,
            RollforwardPopulation::new(rollforward_population),
        ))
    }
}

/// One calculation request from the boundary layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub population: FieldValue,
    pub confidence: FieldValue,
    pub expected_deviation: FieldValue,
    pub tolerable_deviation: FieldValue,
    #[serde(default)]
    pub rollforward_enabled: bool,
    pub rollforward: Option<RollforwardRequest>,
}

/// A request whose every field has been parsed and checked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub parameters: SamplingParameters,
    pub rollforward: Option<RollforwardInputs>,
}

impl CalculationRequest {
    pub fn new(
        population: impl Into<FieldValue>,
        confidence: impl Into<FieldValue>,
        expected_deviation: impl Into<FieldValue>,
        tolerable_deviation: impl Into<FieldValue>,
    ) -> Self {
        Self {
            population: population.into(),
            confidence: confidence.into(),
            expected_deviation: expected_deviation.into(),
            tolerable_deviation: tolerable_deviation.into(),
            rollforward_enabled: false,
            rollforward: None,
        }
    }

    /// Enable rollforward testing with the given interim results
    pub fn with_rollforward(mut self, rollforward: RollforwardRequest) -> Self {
        self.rollforward_enabled = true;
        self.rollforward = Some(rollforward);
        self
    }

    /// Parse every field, failing on the first invalid one
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let population = parse_count(fields::POPULATION, &self.population)?;
        if population < 1 {
            return Err(Error::validation(fields::POPULATION, "must be at least 1"));
        }
        let population = Population::new(population);

        let confidence_text = self.confidence.to_string();
        let confidence = confidence_text
            .parse::<ConfidenceLevel>()
            .map_err(|error| Error::validation(fields::CONFIDENCE, error.to_string()))?;

        let expected = parse_rate(fields::EXPECTED_DEVIATION, &self.expected_deviation)?;
        let expected_deviation = DeviationRate::try_new(expected).map_err(|_| {
            Error::validation(
                fields::EXPECTED_DEVIATION,
                format!("{expected} must be at least {}", rates::MIN_RATE),
            )
        })?;

        let tolerable = parse_rate(fields::TOLERABLE_DEVIATION, &self.tolerable_deviation)?;
        let tolerable_deviation = TolerableDeviation::try_new(tolerable).map_err(|_| {
            Error::validation(
                fields::TOLERABLE_DEVIATION,
                format!("{tolerable} must be less than {}", rates::TOLERABLE_LIMIT),
            )
        })?;

        let parameters = SamplingParameters::new(
            population,
            confidence,
            expected_deviation,
            tolerable_deviation,
        );

        let rollforward = if self.rollforward_enabled {
            let section = self.rollforward.as_ref().ok_or_else(|| {
                Error::validation(
                    fields::ROLLFORWARD,
                    "interim results are required when rollforward testing is enabled",
                )
            })?;
            Some(section.validate()?)
        } else {
            None
        };

        Ok(ValidatedRequest {
            parameters,
            rollforward,
        })
    }
}

const MISSING: &str = "is required when rollforward testing is enabled";

fn required<'a>(field: &'static str, value: Option<&'a FieldValue>) -> Result<&'a FieldValue> {
    value.ok_or_else(|| Error::validation(field, MISSING))
}

fn parse_count(field: &'static str, value: &FieldValue) -> Result<u64> {
    let text = value.to_string();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    let parsed = trimmed
        .parse::<i128>()
        .map_err(|_| Error::validation(field, format!("'{trimmed}' is not a whole number")))?;
    if parsed < 0 {
        return Err(Error::validation(
            field,
            format!("{parsed} must not be negative"),
        ));
    }
    u64::try_from(parsed).map_err(|_| Error::validation(field, format!("{parsed} is too large")))
}

fn parse_rate(field: &'static str, value: &FieldValue) -> Result<f64> {
    let text = value.to_string();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| Error::validation(field, format!("'{trimmed}' is not a number")))?;
    if !parsed.is_finite() {
        return Err(Error::validation(field, "must be a finite number"));
    }
    Ok(parsed)
}
