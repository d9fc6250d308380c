//! Logging settings read from configuration
//!
//! Both enums deserialize from lowercase names and display the same way, so
//! the display form doubles as the `config` default and the `EnvFilter`
//! directive.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Verbosity used when `RUST_LOG` is not set
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[display("trace")]
    Trace,
    #[display("debug")]
    Debug,
    #[default]
    #[display("info")]
    Info,
    #[display("warn")]
    Warn,
    #[display("error")]
    Error,
}

/// Subscriber output layout
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[display("json")]
    Json,
    /// Multi-line, human oriented
    #[display("pretty")]
    Pretty,
    #[default]
    #[display("compact")]
    Compact,
}
