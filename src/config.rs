use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::application::{CalculationRequest, RollforwardRequest};
use crate::domain::config_types::{LogFormat, LogLevel};
use crate::domain::constants::input_defaults;
use crate::report::ExportFormat;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub defaults: InputDefaults,
    pub logging: LoggingSettings,
    pub export: ExportSettings,
}

/// Field values used when the caller leaves an input blank
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputDefaults {
    pub population: String,
    pub confidence: String,
    pub expected_deviation: String,
    pub tolerable_deviation: String,
    pub interim_sample_size: String,
    pub exception_count: String,
    pub rollforward_population: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportSettings {
    pub format: ExportFormat,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("defaults.population", input_defaults::POPULATION)?
            .set_default("defaults.confidence", input_defaults::CONFIDENCE)?
            .set_default(
                "defaults.expected_deviation",
                input_defaults::EXPECTED_DEVIATION,
            )?
            .set_default(
                "defaults.tolerable_deviation",
                input_defaults::TOLERABLE_DEVIATION,
            )?
            .set_default(
                "defaults.interim_sample_size",
                input_defaults::INTERIM_SAMPLE_SIZE,
            )?
            .set_default("defaults.exception_count", input_defaults::EXCEPTION_COUNT)?
            .set_default(
                "defaults.rollforward_population",
                input_defaults::ROLLFORWARD_POPULATION,
            )?
            .set_default("logging.level", LogLevel::default().to_string())?
            .set_default("logging.format", LogFormat::default().to_string())?
            .set_default("export.format", ExportFormat::default().as_str())?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("AUDIT_SAMPLING").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl InputDefaults {
    /// Request built entirely from default values
    pub fn request(&self, rollforward_enabled: bool, issues_found: bool) -> CalculationRequest {
        let request = CalculationRequest::new(
            self.population.as_str(),
            self.confidence.as_str(),
            self.expected_deviation.as_str(),
            self.tolerable_deviation.as_str(),
        );
        if rollforward_enabled {
            request.with_rollforward(RollforwardRequest::new(
                self.interim_sample_size.as_str(),
                issues_found,
                self.exception_count.as_str(),
                self.rollforward_population.as_str(),
            ))
        } else {
            request
        }
    }
}
