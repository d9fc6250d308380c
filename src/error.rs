use crate::domain::{EstimateError, RollforwardError};
use crate::report::export::ExportError;
use thiserror::Error;

/// Audit sampling error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<EstimateError> for Error {
    fn from(error: EstimateError) -> Self {
        match error {
            EstimateError::TolerableDeviationTooSmall(_) => {
                Self::validation("tolerable_deviation", error.to_string())
            }
            // Only an extreme expected rate can push the bound past u64
            EstimateError::SampleSizeOverflow(_) => {
                Self::validation("expected_deviation", error.to_string())
            }
        }
    }
}

impl From<RollforwardError> for Error {
    fn from(error: RollforwardError) -> Self {
        match error {
            RollforwardError::ExceptionsExceedInterimSample { .. } => {
                Self::validation("exception_count", error.to_string())
            }
            RollforwardError::Estimate(estimate) => estimate.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExceptionCount, InterimSampleSize};

    #[test]
    fn test_validation_message_names_field() {
        let error = Error::validation("population", "must be at least 1");
        assert!(error.is_validation());
        assert_eq!(error.to_string(), "Invalid population: must be at least 1");
    }

    #[test]
    fn test_estimate_errors_name_the_offending_field() {
        let error: Error = EstimateError::TolerableDeviationTooSmall(1e-17).into();
        assert!(matches!(
            error,
            Error::Validation {
                field: "tolerable_deviation",
                ..
            }
        ));

        let error: Error =
            RollforwardError::Estimate(EstimateError::SampleSizeOverflow(f64::INFINITY)).into();
        assert!(matches!(
            error,
            Error::Validation {
                field: "expected_deviation",
                ..
            }
        ));
    }

    #[test]
    fn test_rollforward_error_becomes_validation() {
        let error: Error = RollforwardError::ExceptionsExceedInterimSample {
            exceptions: ExceptionCount::new(5),
            interim: InterimSampleSize::new(2),
        }
        .into();

        match error {
            Error::Validation { field, reason } => {
                assert_eq!(field, "exception_count");
                assert!(reason.contains("5 exceptions"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
