use std::{fmt, sync::Arc};

use crate::provider::Provider;

/// Where the bootstrap currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapPhase {
    /// Polling for the modem service
    WaitingForService,
    /// Enumerating modems
    Discovering,
    /// Nothing to work with; waiting for a retry
    NoModemFound,
    /// Looking at the bound modem's power state
    CheckingEnablement,
    /// Waiting for the user to allow enabling the modem
    AwaitingEnable,
    /// Reading the SIM identity
    ReadingIdentity,
    /// Looking up the account for the identity
    ResolvingAccount,
    /// Waiting for the user to pick a provider
    ResolvingProviderInteractive,
    /// Provider bound; balance operations available
    Ready,
    /// Gave up after too many restarts
    Failed,
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapPhase::WaitingForService => "waiting for modem service",
            BootstrapPhase::Discovering => "discovering modems",
            BootstrapPhase::NoModemFound => "no modem found",
            BootstrapPhase::CheckingEnablement => "checking modem state",
            BootstrapPhase::AwaitingEnable => "waiting to enable modem",
            BootstrapPhase::ReadingIdentity => "reading SIM identity",
            BootstrapPhase::ResolvingAccount => "resolving account",
            BootstrapPhase::ResolvingProviderInteractive => "waiting for provider selection",
            BootstrapPhase::Ready => "ready",
            BootstrapPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A decision or request coming back from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Enable the modem
    ConfirmEnable,
    /// Leave the modem disabled
    DeclineEnable,
    /// Start over after no modem was found or the bootstrap failed
    Retry,
    /// Use this provider for the SIM
    SelectProvider {
        /// Country code
        country: String,
        /// Provider name
        name: String,
    },
    /// Query the balance
    FetchBalance,
    /// Redeem a voucher
    TopUp {
        /// Voucher code
        code: String,
    },
    /// End the session
    Quit,
}

/// Session level notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A provider was bound
    ProviderChanged(Arc<Provider>),
    /// A balance reply arrived
    BalanceChanged {
        /// Balance text
        balance: String,
        /// When it arrived
        timestamp: String,
    },
    /// A top-up reply arrived
    TopUpReplied(String),
    /// A modem operation failed
    ModemError(String),
}
