//! Session bootstrap: from modem service discovery to a bound provider.
//!
//! The [`Bootstrap`] state machine waits for ModemManager, picks the first
//! modem, makes sure it is enabled, reads the SIM identity and maps it to a
//! provider, asking the user through a [`Presenter`] whenever it cannot
//! decide on its own. Device errors in the middle of that restart the whole
//! sequence, up to a configured number of times.

/// The state machine
mod machine;
/// Outward interface to the user
mod presenter;
/// Phases, actions and events
mod types;


pub use machine::Bootstrap;
pub use presenter::Presenter;
pub use types::{BootstrapPhase, SessionEvent, UserAction};
