use std::sync::Arc;

use crate::provider::Provider;

/// Everything the bootstrap tells the user.
///
/// Prompts are answered asynchronously by sending a
/// [`UserAction`](super::UserAction) to the bootstrap.
pub trait Presenter: Send {
    /// Ask for a provider. `None` means the user has to pick country and
    /// provider from scratch; otherwise one of `candidates`.
    fn show_provider_assistant(&mut self, candidates: Option<&[Arc<Provider>]>);

    /// The SIM's network is not in the provider database.
    fn show_provider_unknown(&mut self, mcc: &str, mnc: &str);

    /// The modem is powered down; ask whether to enable it.
    fn show_modem_enable_prompt(&mut self);

    /// No modem (or no modem service) was found.
    fn show_no_modem_found(&mut self);

    /// A modem operation failed.
    fn show_modem_error(&mut self, message: &str);

    /// The provider has no known balance check.
    fn show_balance_info_missing(&mut self, provider: &Provider);

    /// The provider has no known top-up command.
    fn show_top_up_info_missing(&mut self, provider: &Provider);

    /// Current provider name.
    fn update_provider_name(&mut self, name: &str);

    /// Expected voucher code length of the current provider.
    fn update_top_up_code_length(&mut self, length: usize);

    /// Latest balance reply.
    fn update_balance(&mut self, balance: &str, timestamp: &str);

    /// Reply to a top-up.
    fn update_top_up_reply(&mut self, reply: &str);
}
