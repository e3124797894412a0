/// D-Bus object path reference.
///
/// Represents a D-Bus object path as a string (e.g., "/org/freedesktop/ModemManager1/Modem/0").
/// Modem and SIM objects are referenced by path and proxies are built on demand.
pub type ObjectPath = String;

/// Path D-Bus services use to mean "no object".
pub const NO_OBJECT: &str = "/";
