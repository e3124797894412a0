use std::fmt;

use crate::services::common::ObjectPath;

/// Logical operation carried by a modem request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Power the modem up
    Enable,
    /// Power the modem down
    Disable,
    /// Send a USSD command
    UssdInitiate,
    /// Read the SIM's IMSI
    ReadIdentity,
    /// List the modems known to the service
    Enumerate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Enable => "Enable",
            Operation::Disable => "Disable",
            Operation::UssdInitiate => "UssdInitiate",
            Operation::ReadIdentity => "ReadIdentity",
            Operation::Enumerate => "Enumerate",
        };
        f.write_str(name)
    }
}

/// `MMModemState` as exported by ModemManager.
///
/// Only the ordering matters here: everything from `Enabled` upwards
/// means the radio is powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModemState {
    /// The modem is unusable
    Failed,
    /// State unknown or not reported
    Unknown,
    /// Still being probed
    Initializing,
    /// Locked by PIN/PUK
    Locked,
    /// Powered down
    Disabled,
    /// Being powered down
    Disabling,
    /// Being powered up
    Enabling,
    /// Powered up, not registered
    Enabled,
    /// Searching for a network
    Searching,
    /// Registered with a network
    Registered,
    /// Tearing down a data connection
    Disconnecting,
    /// Setting up a data connection
    Connecting,
    /// Data connection up
    Connected,
}

impl ModemState {
    /// Whether the modem is powered and usable for network operations.
    pub fn is_enabled(self) -> bool {
        self >= ModemState::Enabled
    }
}

impl From<i32> for ModemState {
    fn from(value: i32) -> Self {
        match value {
            -1 => ModemState::Failed,
            1 => ModemState::Initializing,
            2 => ModemState::Locked,
            3 => ModemState::Disabled,
            4 => ModemState::Disabling,
            5 => ModemState::Enabling,
            6 => ModemState::Enabled,
            7 => ModemState::Searching,
            8 => ModemState::Registered,
            9 => ModemState::Disconnecting,
            10 => ModemState::Connecting,
            11 => ModemState::Connected,
            _ => ModemState::Unknown,
        }
    }
}

/// A modem found during discovery.
///
/// The enabled flag is a snapshot taken at discovery time and is updated
/// locally when the bootstrap learns otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModemHandle {
    /// D-Bus object path of the modem
    pub path: ObjectPath,
    /// Whether the modem was enabled when last checked
    pub enabled: bool,
    /// D-Bus object path of the SIM, if one is inserted
    pub sim: Option<ObjectPath>,
}

impl ModemHandle {
    /// Creates a handle for the modem at `path`.
    pub fn new(path: impl Into<ObjectPath>, enabled: bool, sim: Option<ObjectPath>) -> Self {
        Self {
            path: path.into(),
            enabled,
            sim,
        }
    }
}

/// A call to the modem service together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// List the modems and their state
    Enumerate,
    /// Enable (`true`) or disable (`false`) a modem
    SetEnabled {
        /// Target modem
        modem: ModemHandle,
        /// Requested power state
        enabled: bool,
    },
    /// Send a USSD command string
    UssdInitiate {
        /// Target modem
        modem: ModemHandle,
        /// Opaque command, e.g. `*100#`
        command: String,
    },
    /// Read the IMSI of the modem's SIM
    ReadIdentity {
        /// Target modem
        modem: ModemHandle,
    },
}

impl Request {
    /// The logical operation this request performs.
    pub fn operation(&self) -> Operation {
        match self {
            Request::Enumerate => Operation::Enumerate,
            Request::SetEnabled { enabled: true, .. } => Operation::Enable,
            Request::SetEnabled { enabled: false, .. } => Operation::Disable,
            Request::UssdInitiate { .. } => Operation::UssdInitiate,
            Request::ReadIdentity { .. } => Operation::ReadIdentity,
        }
    }
}

/// Successful result of a modem request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Modems in enumeration order
    Modems(Vec<ModemHandle>),
    /// Raw identity string as stored on the SIM
    Identity(String),
    /// Network reply to a USSD command
    Text(String),
    /// The call succeeded without a payload
    Done,
}

impl Reply {
    /// Modem list carried by the reply, empty for other replies.
    pub fn into_modems(self) -> Vec<ModemHandle> {
        match self {
            Reply::Modems(modems) => modems,
            _ => Vec::new(),
        }
    }

    /// Text carried by the reply, empty for replies without text.
    pub fn into_text(self) -> String {
        match self {
            Reply::Identity(text) | Reply::Text(text) => text,
            Reply::Modems(_) | Reply::Done => String::new(),
        }
    }
}

/// Lifecycle notification broadcast by the request channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    /// A request was accepted and is about to be sent
    Started(Operation),
    /// A request completed, successfully or not
    Finished(Operation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_states() {
        assert!(!ModemState::from(3).is_enabled());
        assert!(!ModemState::from(2).is_enabled());
        assert!(ModemState::from(6).is_enabled());
        assert!(ModemState::from(11).is_enabled());
        assert!(!ModemState::from(42).is_enabled());
    }

    #[test]
    fn set_enabled_maps_to_enable_or_disable() {
        let modem = ModemHandle::new("/org/freedesktop/ModemManager1/Modem/0", false, None);

        let enable = Request::SetEnabled {
            modem: modem.clone(),
            enabled: true,
        };
        let disable = Request::SetEnabled {
            modem,
            enabled: false,
        };

        assert_eq!(enable.operation(), Operation::Enable);
        assert_eq!(disable.operation(), Operation::Disable);
    }
}
