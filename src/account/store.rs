use tracing::debug;

use super::{Account, AccountError};
use crate::{provider::Provider, services::modem::SimIdentity};

/// Persistent mapping from SIM identity to [`Account`].
///
/// Writes are durable as soon as the call returns.
pub trait AccountStore: Send {
    /// Whether a record exists for `identity`, bound or not.
    fn is_known(&self, identity: &SimIdentity) -> bool;

    /// The account for `identity`, absent unless it is bound to a provider.
    ///
    /// # Errors
    /// Returns `AccountError` if the store cannot be read
    fn fetch(&self, identity: &SimIdentity) -> Result<Option<Account>, AccountError>;

    /// Creates and persists an account for `identity` bound to `provider`.
    ///
    /// # Errors
    /// Returns `AccountError` if the account cannot be persisted
    fn add(&mut self, identity: &SimIdentity, provider: &Provider) -> Result<Account, AccountError>;

    /// Persists `account` under its identifier.
    ///
    /// # Errors
    /// Returns `AccountError` if the account cannot be persisted
    fn save(&mut self, account: &Account) -> Result<(), AccountError>;

    /// Rebinds `account` to `provider`, persisting only on change.
    ///
    /// # Errors
    /// Returns `AccountError` if the account cannot be persisted
    fn update_provider(
        &mut self,
        account: &mut Account,
        provider: &Provider,
    ) -> Result<bool, AccountError> {
        if !account.apply_provider(provider) {
            return Ok(false);
        }

        debug!(account = %account.identifier, %provider, "Account provider changed");
        self.save(account)?;
        Ok(true)
    }

    /// Records a balance reply, persisting only on change.
    ///
    /// # Errors
    /// Returns `AccountError` if the account cannot be persisted
    fn update_balance(
        &mut self,
        account: &mut Account,
        balance: &str,
        timestamp: &str,
    ) -> Result<bool, AccountError> {
        if !account.apply_balance(balance, timestamp) {
            return Ok(false);
        }

        debug!(account = %account.identifier, "Account balance changed");
        self.save(account)?;
        Ok(true)
    }
}
