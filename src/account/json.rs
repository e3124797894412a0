use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{Account, AccountError, AccountStore};
use crate::{provider::Provider, services::modem::SimIdentity};

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
}

/// Account store backed by a JSON file.
///
/// The whole file is rewritten on every save.
#[derive(Debug)]
pub struct JsonAccountStore {
    path: PathBuf,
    file: AccountsFile,
}

impl JsonAccountStore {
    /// Opens the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    /// Returns `AccountError` if the file exists but cannot be read or parsed
    #[instrument]
    pub fn open(path: &Path) -> Result<Self, AccountError> {
        let file = if path.exists() {
            let content = fs::read_to_string(path).map_err(|err| AccountError::Io {
                path: path.to_path_buf(),
                details: err.to_string(),
            })?;
            serde_json::from_str(&content).map_err(|err| AccountError::Corrupt {
                path: path.to_path_buf(),
                details: err.to_string(),
            })?
        } else {
            info!("No account store at {}, starting empty", path.display());
            AccountsFile::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored account, ordered by identifier.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.file.accounts.values()
    }

    fn io_error(&self, err: impl ToString) -> AccountError {
        AccountError::Io {
            path: self.path.clone(),
            details: err.to_string(),
        }
    }

    fn persist(&self, file: &AccountsFile) -> Result<(), AccountError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let content = serde_json::to_string_pretty(file).map_err(|err| self.io_error(err))?;
        fs::write(&self.path, content).map_err(|err| self.io_error(err))
    }
}

impl AccountStore for JsonAccountStore {
    fn is_known(&self, identity: &SimIdentity) -> bool {
        self.file
            .accounts
            .contains_key(&Account::identifier_for(identity))
    }

    fn fetch(&self, identity: &SimIdentity) -> Result<Option<Account>, AccountError> {
        let account = self
            .file
            .accounts
            .get(&Account::identifier_for(identity))
            .filter(|account| account.is_bound())
            .cloned();

        debug!(found = account.is_some(), "Fetched account");
        Ok(account)
    }

    fn add(&mut self, identity: &SimIdentity, provider: &Provider) -> Result<Account, AccountError> {
        let account = Account::new(identity, provider);
        info!(account = %account.identifier, %provider, "Adding account");
        self.save(&account)?;
        Ok(account)
    }

    fn save(&mut self, account: &Account) -> Result<(), AccountError> {
        // Memory only changes once the file is written.
        let mut accounts = self.file.accounts.clone();
        accounts.insert(account.identifier.clone(), account.clone());
        let file = AccountsFile { accounts };

        self.persist(&file)?;
        self.file = file;
        Ok(())
    }
}
