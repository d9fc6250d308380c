use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use audit_sampling::application::{CalculationRequest, FieldValue, RollforwardRequest};
use audit_sampling::config::{InputDefaults, Settings};
use audit_sampling::infrastructure::{init_tracing, log_messages};
use audit_sampling::report::{export_to_path, DisplaySummary, ExportFormat, ExportRecord};
use audit_sampling::SamplingCalculator;

/// Attribute sample size calculator with interim and rollforward replanning
#[derive(Debug, Parser)]
#[command(name = "audit_sampling", version, about)]
struct Cli {
    /// Total items in the population
    #[arg(long)]
    population: Option<String>,

    /// Confidence level: 90%, 95% or 99%
    #[arg(long)]
    confidence: Option<String>,

    /// Expected deviation rate as a fraction
    #[arg(long)]
    expected_deviation: Option<String>,

    /// Tolerable deviation rate as a fraction
    #[arg(long)]
    tolerable_deviation: Option<String>,

    /// Include rollforward testing
    #[arg(long)]
    rollforward: bool,

    /// Items tested at interim
    #[arg(long, requires = "rollforward")]
    interim_sample_size: Option<String>,

    /// Exceptions were found during interim testing
    #[arg(long, requires = "rollforward")]
    issues_found: bool,

    /// Number of interim exceptions (only read with --issues-found)
    #[arg(long, requires = "issues_found")]
    exception_count: Option<String>,

    /// Items remaining in the rollforward period
    #[arg(long, requires = "rollforward")]
    rollforward_population: Option<String>,

    /// Read the whole request from a JSON file instead of arguments
    #[arg(long, conflicts_with_all = ["population", "confidence", "expected_deviation", "tolerable_deviation", "rollforward"])]
    request: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Write the result to this file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export layout: csv or document
    #[arg(long, requires = "export")]
    format: Option<ExportFormat>,
}

impl Cli {
    fn to_request(&self, defaults: &InputDefaults) -> CalculationRequest {
        let field = |value: &Option<String>, fallback: &str| -> FieldValue {
            value.clone().unwrap_or_else(|| fallback.to_string()).into()
        };

        let request = CalculationRequest::new(
            field(&self.population, &defaults.population),
            field(&self.confidence, &defaults.confidence),
            field(&self.expected_deviation, &defaults.expected_deviation),
            field(&self.tolerable_deviation, &defaults.tolerable_deviation),
        );
        if !self.rollforward {
            return request;
        }
        request.with_rollforward(RollforwardRequest::new(
            field(&self.interim_sample_size, &defaults.interim_sample_size),
            self.issues_found,
            field(&self.exception_count, &defaults.exception_count),
            field(&self.rollforward_population, &defaults.rollforward_population),
        ))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new().context("failed to load configuration")?;

    // Initialize tracing
    if let Err(reason) = init_tracing(&settings.logging) {
        eprintln!("tracing already initialised: {reason}");
    }
    info!("{}", log_messages::application::STARTING);
    info!(
        level = %settings.logging.level,
        export_format = %settings.export.format,
        "{}",
        log_messages::configuration::CONFIG_LOADED
    );

    let request = match &cli.request {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read request {}", path.display()))?;
            let request: CalculationRequest = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse request {}", path.display()))?;
            info!(path = %path.display(), "{}", log_messages::application::REQUEST_LOADED);
            request
        }
        None => cli.to_request(&settings.defaults),
    };

    let result = SamplingCalculator::default().calculate(&request)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", DisplaySummary::from_result(&result));
    }

    if let Some(path) = &cli.export {
        let format = cli.format.unwrap_or(settings.export.format);
        let record = ExportRecord::now(result);
        if let Err(export_error) = export_to_path(&record, path, format) {
            error!(error = %export_error, "{}", log_messages::export::FAILED);
            return Err(export_error.into());
        }
        info!(path = %path.display(), %format, "{}", log_messages::export::WRITTEN);
        println!("Results exported to: {}", path.display());
    }

    info!("{}", log_messages::application::FINISHED);
    Ok(())
}
