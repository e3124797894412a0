use std::sync::Arc;

use tracing::debug;

use super::{Provider, ProviderCatalog};
use crate::{
    account::Account,
    services::modem::{NetworkId, SimIdentity},
};

/// Outcome of mapping a SIM identity to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one provider issues SIMs for the network
    Resolved(Arc<Provider>),
    /// Several providers share the network; the user has to pick one
    Ambiguous(Vec<Arc<Provider>>),
    /// The network is not in the database
    Unknown(NetworkId),
}

/// Maps identities, accounts and explicit choices to providers.
#[derive(Clone)]
pub struct ProviderResolver {
    catalog: Arc<dyn ProviderCatalog>,
}

impl ProviderResolver {
    /// Creates a resolver over `catalog`.
    pub fn new(catalog: Arc<dyn ProviderCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog lookups go to.
    pub fn catalog(&self) -> &Arc<dyn ProviderCatalog> {
        &self.catalog
    }

    /// Looks up the providers for the network that issued `identity`.
    pub fn resolve_by_identity(&self, identity: &SimIdentity) -> Resolution {
        let network = identity.network_id();
        let mut candidates = self.catalog.lookup_by_network_id(&network);
        debug!(%network, candidates = candidates.len(), "Resolving provider by identity");

        match candidates.len() {
            0 => Resolution::Unknown(network),
            1 => Resolution::Resolved(candidates.remove(0)),
            _ => Resolution::Ambiguous(candidates),
        }
    }

    /// The provider called `name` in `country`, if the catalog has it.
    pub fn resolve_explicit(&self, country: &str, name: &str) -> Option<Arc<Provider>> {
        self.catalog.lookup_by_country_and_name(country, name)
    }

    /// The provider an account was bound to, if the catalog still has it.
    pub fn resolve_from_account(&self, account: &Account) -> Option<Arc<Provider>> {
        self.resolve_explicit(&account.country, &account.provider)
    }
}
