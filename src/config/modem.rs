use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Modem service polling and restart behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ModemConfig {
    /// Delay between two readiness probes of the modem service, in milliseconds.
    pub poll_interval_ms: u64,

    /// Readiness probes to attempt before reporting that no modem was found.
    pub max_service_polls: u32,

    /// Full bootstrap restarts allowed after device errors before giving up.
    pub max_restarts: u32,
}

impl ModemConfig {
    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_service_polls: 10,
            max_restarts: 3,
        }
    }
}
