//! Application layer: request validation and the calculation service

pub mod calculator;
pub mod request;

pub use calculator::SamplingCalculator;
pub use request::{CalculationRequest, FieldValue, RollforwardRequest, ValidatedRequest};
