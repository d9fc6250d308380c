//! Log message constants
//!
//! Centralises the message text of every tracing event so wording stays
//! consistent between the library and the command-line front end.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting audit sampling calculator";
    pub const FINISHED: &str = "Calculation finished";
    pub const REQUEST_LOADED: &str = "Calculation request loaded from file";
}

/// Calculation messages
pub mod calculation {
    pub const VALIDATION_FAILED: &str = "Calculation request failed validation";
    pub const TOLERABLE_SUBSTITUTED: &str =
        "Non-positive tolerable deviation supplied; using the default rate";
    pub const BASE_ESTIMATED: &str = "Base sample size estimated";
    pub const ROLLFORWARD_REPLANNED: &str = "Rollforward sample replanned from interim results";
    pub const COMPLETED: &str = "Sample size calculation completed";
}

/// Export messages
pub mod export {
    pub const WRITTEN: &str = "Results exported";
    pub const FAILED: &str = "Export failed";
}

/// Configuration messages
pub mod configuration {
    pub const CONFIG_LOADED: &str = "Configuration loaded successfully";
}
