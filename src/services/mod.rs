/// Common utilities shared by services
pub mod common;
/// ModemManager client: request channel, discovery and enablement
pub mod modem;
