use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logging level for the application.
///
/// Used as the fallback filter when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors.
    Error,

    /// Warnings and errors.
    Warn,

    /// Phase milestones, warnings and errors.
    #[default]
    Info,

    /// Request lifecycle and state transitions.
    Debug,

    /// Everything, including D-Bus chatter.
    Trace,
}

impl LogLevel {
    /// Filter directive for `tracing_subscriber::EnvFilter`.
    ///
    /// The D-Bus library is capped at `warn` unless tracing is requested,
    /// otherwise its per-message logging drowns out the state machine.
    pub fn filter_directive(self) -> String {
        match self {
            LogLevel::Trace => "trace".to_string(),
            level => format!("{level},zbus=warn"),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}
