//! ModemManager D-Bus proxy definitions.

#![allow(missing_docs)]

use zbus::{proxy, zvariant::OwnedObjectPath};

/// Well-known bus name of ModemManager.
pub const MM_SERVICE: &str = "org.freedesktop.ModemManager1";
/// Object that exports the `ObjectManager` interface for all modems.
pub const MM_OBJECT: &str = "/org/freedesktop/ModemManager1";
/// Interface every modem object implements.
pub const MM_MODEM_INTERFACE: &str = "org.freedesktop.ModemManager1.Modem";

/// ModemManager modem object.
#[proxy(
    default_service = "org.freedesktop.ModemManager1",
    interface = "org.freedesktop.ModemManager1.Modem"
)]
pub trait Modem {
    /// Enable or disable the modem.
    fn enable(&self, enable: bool) -> zbus::Result<()>;

    /// Overall modem state, see `MMModemState`.
    #[zbus(property)]
    fn state(&self) -> zbus::Result<i32>;

    /// Object path of the SIM, or "/" when no SIM is present.
    #[zbus(property)]
    fn sim(&self) -> zbus::Result<OwnedObjectPath>;
}

/// SIM card object.
#[proxy(
    default_service = "org.freedesktop.ModemManager1",
    interface = "org.freedesktop.ModemManager1.Sim"
)]
pub trait Sim {
    /// International mobile subscriber identity.
    #[zbus(property)]
    fn imsi(&self) -> zbus::Result<String>;
}

/// USSD session of a 3GPP modem.
#[proxy(
    default_service = "org.freedesktop.ModemManager1",
    interface = "org.freedesktop.ModemManager1.Modem.Modem3gpp.Ussd"
)]
pub trait Ussd {
    /// Send a USSD command and wait for the network's reply.
    fn initiate(&self, command: &str) -> zbus::Result<String>;
}
