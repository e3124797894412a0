use serde::{Deserialize, Serialize};

use crate::{provider::Provider, services::modem::SimIdentity};

/// A SIM card's binding to a provider plus its last known balance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    /// Store key, `imsi:<digits>`
    pub identifier: String,
    /// Provider name
    #[serde(default)]
    pub provider: String,
    /// Provider country code
    #[serde(default)]
    pub country: String,
    /// Balance text as replied by the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    /// When `balance` was fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Account {
    /// Store key for `identity`.
    pub fn identifier_for(identity: &SimIdentity) -> String {
        format!("imsi:{identity}")
    }

    /// A fresh account for `identity` bound to `provider`.
    pub fn new(identity: &SimIdentity, provider: &Provider) -> Self {
        Self {
            identifier: Self::identifier_for(identity),
            provider: provider.name.clone(),
            country: provider.country.clone(),
            balance: None,
            timestamp: None,
        }
    }

    /// Whether both provider name and country are set.
    pub fn is_bound(&self) -> bool {
        !self.provider.is_empty() && !self.country.is_empty()
    }

    /// Stored balance and its timestamp, if a balance was ever fetched.
    pub fn balance(&self) -> Option<(&str, &str)> {
        Some((self.balance.as_deref()?, self.timestamp.as_deref()?))
    }

    /// Rebinds to `provider`. Returns whether anything changed.
    pub fn apply_provider(&mut self, provider: &Provider) -> bool {
        let mut changed = false;

        if self.country != provider.country {
            self.country.clone_from(&provider.country);
            changed = true;
        }
        if self.provider != provider.name {
            self.provider.clone_from(&provider.name);
            changed = true;
        }

        changed
    }

    /// Records a balance reply. A repeated timestamp is ignored.
    pub fn apply_balance(&mut self, balance: &str, timestamp: &str) -> bool {
        if self.timestamp.as_deref() == Some(timestamp) {
            return false;
        }

        self.balance = Some(balance.to_string());
        self.timestamp = Some(timestamp.to_string());
        true
    }
}
