//! Export of calculation results
//!
//! A result is flattened into an ordered list of labelled values together
//! with the echoed inputs and a generation timestamp, then written either as
//! delimited text (one row per pair) or as a summary document.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::constants::rates;
use crate::domain::SamplingResult;

/// Timestamp layout used in exports
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Document title
pub const DOCUMENT_TITLE: &str = "Audit Sample Size Summary";

/// Value written for fields that only apply with rollforward testing
pub const NOT_APPLICABLE: &str = "N/A";

/// Row labels in export order
pub mod labels {
    pub const POPULATION: &str = "Population";
    pub const CONFIDENCE: &str = "Confidence";
    pub const USER_EXPECTED_DEVIATION: &str = "User Expected Deviation";
    pub const OBSERVED_INTERIM_DEVIATION: &str = "Observed Interim Deviation";
    pub const PLANNED_EXPECTED_DEVIATION: &str = "Planned Expected Deviation";
    pub const TOLERABLE_DEVIATION: &str = "Tolerable Deviation";
    pub const BASE_REQUIRED_SAMPLE: &str = "Base Required Sample";
    pub const ROLLFORWARD_ENABLED: &str = "Rollforward Enabled";
    pub const ISSUES_FOUND: &str = "Issues Found";
    pub const INTERIM_SAMPLE_SIZE: &str = "Interim Sample Size";
    pub const INTERIM_EXCEPTIONS: &str = "Interim Exceptions";
    pub const ROLLFORWARD_POPULATION: &str = "Rollforward Population";
    pub const REPLANNED_REQUIRED_SAMPLE: &str = "Replanned Full-Year Required Sample";
    pub const ADDITIONAL_ROLLFORWARD_SAMPLE: &str = "Additional Rollforward Sample";
    pub const ADJUSTED_TOTAL_SAMPLE: &str = "Adjusted Total Sample";
    pub const ADVISORY_NOTE: &str = "Advisory Note";
    pub const TIMESTAMP: &str = "Timestamp";
}

/// Errors raised while writing an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write to {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write delimited export: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Output layout for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Document,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Document => "document",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Document => "md",
        }
    }

    pub fn exporter(&self) -> Box<dyn ResultExporter> {
        match self {
            ExportFormat::Csv => Box::new(CsvExporter),
            ExportFormat::Document => Box::new(DocumentExporter),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "document" | "doc" | "md" | "markdown" => Ok(ExportFormat::Document),
            _ => Err(format!("Invalid export format: {s}")),
        }
    }
}

/// One labelled value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub label: &'static str,
    pub value: String,
}

impl ExportEntry {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// A result flattened for export, stamped with its generation time
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    result: SamplingResult,
    generated_at: NaiveDateTime,
}

impl ExportRecord {
    pub fn new(result: SamplingResult, generated_at: NaiveDateTime) -> Self {
        Self {
            result,
            generated_at,
        }
    }

    /// Record stamped with the current local time
    pub fn now(result: SamplingResult) -> Self {
        Self::new(result, Local::now().naive_local())
    }

    pub fn result(&self) -> &SamplingResult {
        &self.result
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Every field of the result plus echoed inputs, in export order
    pub fn entries(&self) -> Vec<ExportEntry> {
        let result = &self.result;
        let parameters = &result.parameters;
        let rollforward = result.rollforward.as_ref();
        let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_APPLICABLE.to_string());

        vec![
            ExportEntry::new(labels::POPULATION, parameters.population),
            ExportEntry::new(labels::CONFIDENCE, parameters.confidence.percent()),
            ExportEntry::new(
                labels::USER_EXPECTED_DEVIATION,
                parameters.expected_deviation,
            ),
            ExportEntry::new(
                labels::OBSERVED_INTERIM_DEVIATION,
                or_na(rollforward.map(|outcome| {
                    rounded(outcome.observed_deviation_rate.into_inner()).to_string()
                })),
            ),
            ExportEntry::new(
                labels::PLANNED_EXPECTED_DEVIATION,
                rollforward.map_or_else(
                    || parameters.expected_deviation.to_string(),
                    |outcome| rounded(outcome.planned_expected_deviation.into_inner()).to_string(),
                ),
            ),
            ExportEntry::new(labels::TOLERABLE_DEVIATION, parameters.tolerable_deviation),
            ExportEntry::new(labels::BASE_REQUIRED_SAMPLE, result.base_required_sample),
            ExportEntry::new(labels::ROLLFORWARD_ENABLED, yes_no(result.rollforward_enabled())),
            ExportEntry::new(
                labels::ISSUES_FOUND,
                or_na(rollforward.map(|outcome| yes_no(outcome.inputs.issues_found).to_string())),
            ),
            ExportEntry::new(
                labels::INTERIM_SAMPLE_SIZE,
                or_na(rollforward.map(|outcome| outcome.inputs.interim_sample_size.to_string())),
            ),
            ExportEntry::new(
                labels::INTERIM_EXCEPTIONS,
                or_na(rollforward.map(|outcome| outcome.inputs.exception_count.to_string())),
            ),
            ExportEntry::new(
                labels::ROLLFORWARD_POPULATION,
                or_na(
                    rollforward.map(|outcome| outcome.inputs.rollforward_population.to_string()),
                ),
            ),
            ExportEntry::new(
                labels::REPLANNED_REQUIRED_SAMPLE,
                result.replanned_required_sample(),
            ),
            ExportEntry::new(
                labels::ADDITIONAL_ROLLFORWARD_SAMPLE,
                result.additional_rollforward_sample(),
            ),
            ExportEntry::new(labels::ADJUSTED_TOTAL_SAMPLE, result.adjusted_total_sample()),
            ExportEntry::new(
                labels::ADVISORY_NOTE,
                or_na(rollforward.map(|outcome| {
                    outcome
                        .advisory_note
                        .clone()
                        .unwrap_or_else(|| "None".to_string())
                })),
            ),
            ExportEntry::new(labels::TIMESTAMP, self.timestamp()),
        ]
    }

    /// Category/value rows shown in the summary document
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        let result = &self.result;
        let parameters = &result.parameters;
        let planned = if result.rollforward_enabled() {
            rounded(result.planned_expected_deviation().into_inner()).to_string()
        } else {
            parameters.expected_deviation.to_string()
        };

        vec![
            ("Population Size", parameters.population.to_string()),
            ("Confidence Level", parameters.confidence.to_string()),
            ("Expected Deviation", planned),
            ("Tolerable Deviation", parameters.tolerable_deviation.to_string()),
            ("Base Sample Size", result.base_required_sample.to_string()),
            (
                "Replanned Required Sample",
                result.replanned_required_sample().to_string(),
            ),
            (
                "Additional Rollforward Sample",
                result.additional_rollforward_sample().to_string(),
            ),
            (
                "Adjusted Total Sample",
                result.adjusted_total_sample().to_string(),
            ),
        ]
    }
}

/// Writes an [`ExportRecord`] in one output layout
pub trait ResultExporter {
    fn format(&self) -> ExportFormat;

    fn write(&self, record: &ExportRecord, writer: &mut dyn Write) -> Result<(), ExportError>;
}

/// Delimited text, one `label,value` row per entry
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl ResultExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write(&self, record: &ExportRecord, writer: &mut dyn Write) -> Result<(), ExportError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        for entry in record.entries() {
            csv_writer.write_record([entry.label, entry.value.as_str()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Markdown summary with a title, a two-column table and a timestamp footer
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExporter;

impl ResultExporter for DocumentExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Document
    }

    fn write(&self, record: &ExportRecord, writer: &mut dyn Write) -> Result<(), ExportError> {
        writeln!(writer, "# {DOCUMENT_TITLE}")?;
        writeln!(writer)?;
        writeln!(writer, "| Category | Value |")?;
        writeln!(writer, "| --- | --- |")?;
        for (category, value) in record.summary_rows() {
            writeln!(writer, "| {category} | {} |", escape_cell(&value))?;
        }
        writeln!(writer)?;
        if let Some(note) = record.result().advisory_note() {
            writeln!(writer, "_{note}_")?;
            writeln!(writer)?;
        }
        writeln!(writer, "Generated: {}", record.timestamp())?;
        Ok(())
    }
}

/// Write `record` to `path` in the requested format
pub fn export_to_path(
    record: &ExportRecord,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Destination {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    format.exporter().write(record, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn rounded(rate: f64) -> f64 {
    let scale = 10_f64.powi(rates::EXPORT_DECIMAL_PLACES);
    (rate * scale).round() / scale
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
