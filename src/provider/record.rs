use std::fmt;

use tracing::debug;

use crate::services::modem::{ModemError, ModemHandle, NetworkId, RequestChannel};

/// USSD top-up template: `sequence` with every `replacement` marker swapped
/// for the voucher code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpTemplate {
    /// Command with placeholder, e.g. `*104*CODE#`
    pub sequence: String,
    /// Placeholder text, e.g. `CODE`
    pub replacement: String,
}

impl TopUpTemplate {
    /// Builds the USSD command for `code`.
    pub fn render(&self, code: &str) -> String {
        self.sequence.replace(&self.replacement, code)
    }
}

/// SMS based balance check or top-up. Kept for display, never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsCommand {
    /// Destination number
    pub number: String,
    /// Message body
    pub text: String,
}

/// A mobile network operator and how to talk to it about prepaid balance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Provider {
    /// Lower-case ISO 3166 country code
    pub country: String,
    /// Provider name as listed in the database
    pub name: String,
    /// Networks the provider issues SIMs for
    pub network_ids: Vec<NetworkId>,
    /// USSD command that queries the balance
    pub balance_check: Option<String>,
    /// USSD command template that redeems a voucher
    pub top_up: Option<TopUpTemplate>,
    /// Expected length of voucher codes, when the database knows it
    pub top_up_code_length: Option<usize>,
    /// SMS balance check
    pub sms_balance_check: Option<SmsCommand>,
    /// SMS top-up
    pub sms_top_up: Option<SmsCommand>,
}

impl Provider {
    /// Creates a provider with no commands.
    pub fn new(country: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether a USSD balance check is known.
    pub fn has_balance_check(&self) -> bool {
        self.balance_check.is_some()
    }

    /// Whether a USSD top-up is known.
    pub fn has_top_up(&self) -> bool {
        self.top_up.is_some()
    }

    /// Queries the balance through `channel`.
    ///
    /// Returns `Ok(false)` without touching the channel when the provider
    /// has no balance check command.
    ///
    /// # Errors
    /// Returns `ModemError::AlreadyPending` if another request is outstanding
    pub fn fetch_balance<S>(
        &self,
        channel: &mut RequestChannel<S>,
        modem: &ModemHandle,
        on_success: impl FnOnce(&mut S, String) + Send + 'static,
        on_failure: impl FnOnce(&mut S, ModemError) + Send + 'static,
    ) -> Result<bool, ModemError> {
        let Some(command) = &self.balance_check else {
            return Ok(false);
        };

        debug!(provider = %self, %command, "Fetching balance");
        channel.ussd_initiate(modem, command.clone(), on_success, on_failure)?;
        Ok(true)
    }

    /// Redeems voucher `code` through `channel`.
    ///
    /// Returns `Ok(false)` without touching the channel when the provider
    /// has no top-up command.
    ///
    /// # Errors
    /// Returns `ModemError::AlreadyPending` if another request is outstanding
    pub fn top_up<S>(
        &self,
        channel: &mut RequestChannel<S>,
        modem: &ModemHandle,
        code: &str,
        on_success: impl FnOnce(&mut S, String) + Send + 'static,
        on_failure: impl FnOnce(&mut S, ModemError) + Send + 'static,
    ) -> Result<bool, ModemError> {
        let Some(template) = &self.top_up else {
            return Ok(false);
        };

        let command = template.render(code);
        debug!(provider = %self, %command, "Topping up");
        channel.ussd_initiate(modem, command, on_success, on_failure)?;
        Ok(true)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}
