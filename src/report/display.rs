//! Human-readable result summary

use serde::Serialize;
use std::fmt;

use crate::domain::SamplingResult;

/// The four result lines plus the optional advisory note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySummary {
    pub base: String,
    pub replanned: String,
    pub additional: String,
    pub adjusted_total: String,
    pub note: Option<String>,
}

impl DisplaySummary {
    pub fn from_result(result: &SamplingResult) -> Self {
        Self {
            base: format!(
                "Base sample size (no rollforward): {}",
                result.base_required_sample
            ),
            replanned: format!(
                "Replanned full-year required sample: {}",
                result.replanned_required_sample()
            ),
            additional: format!(
                "Additional rollforward sample required: {}",
                result.additional_rollforward_sample()
            ),
            adjusted_total: format!(
                "Adjusted total sample (interim + rollforward): {}",
                result.adjusted_total_sample()
            ),
            note: result.advisory_note().map(str::to_string),
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        let mut lines = vec![
            self.base.as_str(),
            self.replanned.as_str(),
            self.additional.as_str(),
            self.adjusted_total.as_str(),
        ];
        if let Some(note) = &self.note {
            lines.push(note.as_str());
        }
        lines
    }
}

impl fmt::Display for DisplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
