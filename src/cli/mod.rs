//! Command-line interface for balance queries and top-ups.
//!
//! Each invocation runs one bootstrap session against ModemManager, answers
//! its prompts from command line flags and prints the result. Listing
//! commands only read the provider database and never touch the modem.

pub mod formatting;
mod presenter;
mod service;
mod types;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use presenter::{PromptAnswers, TerminalPresenter};
pub use service::CliService;
pub use types::{CliError, CommandResult};

/// Prepaid SIM balance manager.
#[derive(Debug, Parser)]
#[command(name = "prepaid-manager", version, about)]
pub struct Cli {
    /// Log at debug level regardless of the configuration
    #[arg(long, global = true)]
    pub debug: bool,

    /// Also write logs to a daily rotated file in the log directory
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Configuration file to use instead of the default one
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable the modem if it is disabled
    #[arg(long, global = true)]
    pub enable: bool,

    /// Country code of the provider, when it cannot be determined from the SIM
    #[arg(long, value_name = "CC", requires = "provider", global = true)]
    pub country: Option<String>,

    /// Provider name, when it cannot be determined from the SIM
    #[arg(long, value_name = "NAME", requires = "country", global = true)]
    pub provider: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Prompt answers carried by the flags.
    pub fn answers(&self) -> PromptAnswers {
        PromptAnswers {
            enable: self.enable,
            provider: self.country.clone().zip(self.provider.clone()),
        }
    }
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Show the modem's provider and last known balance
    Status,
    /// Query the current balance
    Balance,
    /// Redeem a top-up voucher
    TopUp {
        /// Voucher code
        code: String,
    },
    /// List countries in the provider database
    Countries,
    /// List providers of a country
    Providers {
        /// Country code
        country: String,
    },
    /// Print the configuration JSON schema
    Schema,
}
