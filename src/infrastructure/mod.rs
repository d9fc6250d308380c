//! Infrastructure concerns: logging setup and shared log message text

pub mod log_messages;
pub mod telemetry;

pub use telemetry::init_tracing;
