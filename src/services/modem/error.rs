use super::Operation;

/// Fragment ModemManager uses when the SIM or modem state forbids an operation.
const FORBIDDEN_FRAGMENT: &str = "Operation not allowed";
/// Fragment ModemManager uses when the modem is powered down.
const DISABLED_FRAGMENT: &str = "not enabled";

/// Modem service errors
///
/// Device failures are classified once, when a request completes, so the
/// bootstrap logic can branch on the variant instead of the message text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModemError {
    /// Operation disallowed in the current device/SIM state (e.g. PIN lock)
    #[error("{message}")]
    Forbidden {
        /// Message as reported by the service
        message: String,
    },

    /// Modem is not enabled
    #[error("{message}")]
    Disabled {
        /// Message as reported by the service
        message: String,
    },

    /// A request was issued while another one is still outstanding
    #[error("cannot start a request while '{pending}' is still pending")]
    AlreadyPending {
        /// The request that is outstanding
        pending: Operation,
    },

    /// Any other device-layer failure
    #[error("{message}")]
    Device {
        /// Message as reported by the service
        message: String,
    },

    /// The SIM reported something that is not an IMSI
    #[error("'{0}' is not a valid IMSI")]
    InvalidIdentity(String),

    /// D-Bus connection could not be established
    #[error("D-Bus connection failed: {0}")]
    Connection(String),
}

impl ModemError {
    /// Classifies a raw failure of `operation` by its message.
    ///
    /// Matching is substring based; the service's error vocabulary is not
    /// a stable contract, so anything unrecognised is a plain device error.
    pub fn classify(operation: Operation, raw: impl std::fmt::Display) -> Self {
        let message = format!("{operation} failed: {raw}");

        if message.contains(FORBIDDEN_FRAGMENT) {
            ModemError::Forbidden { message }
        } else if message.contains(DISABLED_FRAGMENT) {
            ModemError::Disabled { message }
        } else {
            ModemError::Device { message }
        }
    }

    /// Whether the operation is not permitted in the current SIM state.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ModemError::Forbidden { .. })
    }

    /// Whether the modem needs to be enabled first.
    pub fn is_disabled(&self) -> bool {
        matches!(self, ModemError::Disabled { .. })
    }
}

impl From<zbus::Error> for ModemError {
    fn from(err: zbus::Error) -> Self {
        ModemError::Connection(err.to_string())
    }
}
