/// Service access behind the request channel
mod backend;
/// Single-flight request channel
mod channel;
/// Modem discovery and enablement
mod discovery;
/// Modem service errors
mod error;
/// SIM identity and network id
mod identity;
/// D-Bus proxy implementations for ModemManager interfaces.
mod proxy;
/// Request, reply and state types
mod types;

pub use backend::{ModemBackend, ModemManager};
pub use channel::{Completion, Finished, OnFailure, OnSuccess, RequestChannel};
pub use discovery::ModemDiscovery;
pub use error::ModemError;
pub use identity::{NetworkId, SimIdentity};
pub use proxy::*;
pub use types::*;
