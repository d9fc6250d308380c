//! Presentation of calculation results
//!
//! Formats a [`SamplingResult`](crate::domain::SamplingResult) for display
//! and writes it to delimited or document exports. Nothing here feeds back
//! into the calculation.

pub mod display;
pub mod export;

pub use display::DisplaySummary;
pub use export::{
    export_to_path, CsvExporter, DocumentExporter, ExportEntry, ExportError, ExportFormat,
    ExportRecord, ResultExporter,
};
