//! Test doubles shared by the unit tests.

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;

use crate::{
    account::{Account, AccountError, AccountStore},
    bootstrap::Presenter,
    provider::Provider,
    services::modem::{ModemBackend, Operation, Reply, Request, SimIdentity},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Script {
    replies: HashMap<Operation, VecDeque<Result<Reply, String>>>,
    calls: Vec<Operation>,
    commands: Vec<String>,
    unavailable: u32,
    probes: u32,
}

/// Modem backend that answers from a per-operation queue of replies.
///
/// An operation with nothing queued fails.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The first `probes` availability probes report the service missing.
    pub(crate) fn unavailable_for(self, probes: u32) -> Self {
        lock(&self.script).unavailable = probes;
        self
    }

    pub(crate) fn reply(&self, operation: Operation, reply: Reply) {
        lock(&self.script)
            .replies
            .entry(operation)
            .or_default()
            .push_back(Ok(reply));
    }

    pub(crate) fn fail(&self, operation: Operation, message: &str) {
        lock(&self.script)
            .replies
            .entry(operation)
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Operations that reached the service, in order.
    pub(crate) fn calls(&self) -> Vec<Operation> {
        lock(&self.script).calls.clone()
    }

    /// USSD commands that reached the service, in order.
    pub(crate) fn commands(&self) -> Vec<String> {
        lock(&self.script).commands.clone()
    }

    pub(crate) fn probes(&self) -> u32 {
        lock(&self.script).probes
    }

    fn probe(&self) -> bool {
        let mut script = lock(&self.script);
        script.probes += 1;

        if script.unavailable > 0 {
            script.unavailable -= 1;
            false
        } else {
            true
        }
    }

    fn answer(&self, request: &Request) -> Result<Reply, zbus::Error> {
        let mut script = lock(&self.script);
        let operation = request.operation();
        script.calls.push(operation);

        if let Request::UssdInitiate { command, .. } = request {
            script.commands.push(command.clone());
        }

        match script
            .replies
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(zbus::Error::Failure(message)),
            None => Err(zbus::Error::Failure(format!("no scripted reply for {operation}"))),
        }
    }
}

#[async_trait]
impl ModemBackend for ScriptedBackend {
    async fn is_available(&self) -> bool {
        self.probe()
    }

    async fn execute(&self, request: Request) -> Result<Reply, zbus::Error> {
        self.answer(&request)
    }
}

/// A presenter call, with provider references flattened to names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shown {
    ProviderAssistant(Option<Vec<String>>),
    ProviderUnknown(String, String),
    EnablePrompt,
    NoModemFound,
    ModemError(String),
    BalanceInfoMissing(String),
    TopUpInfoMissing(String),
    ProviderName(String),
    TopUpCodeLength(usize),
    Balance(String),
    TopUpReply(String),
}

/// Presenter that records every call. Clones share the record.
#[derive(Clone, Default)]
pub(crate) struct RecordingPresenter {
    shown: Arc<Mutex<Vec<Shown>>>,
}

impl RecordingPresenter {
    pub(crate) fn shown(&self) -> Vec<Shown> {
        lock(&self.shown).clone()
    }

    fn push(&self, shown: Shown) {
        lock(&self.shown).push(shown);
    }
}

impl Presenter for RecordingPresenter {
    fn show_provider_assistant(&mut self, candidates: Option<&[Arc<Provider>]>) {
        let names = candidates.map(|candidates| {
            candidates
                .iter()
                .map(|provider| provider.name.clone())
                .collect()
        });
        self.push(Shown::ProviderAssistant(names));
    }

    fn show_provider_unknown(&mut self, mcc: &str, mnc: &str) {
        self.push(Shown::ProviderUnknown(mcc.to_string(), mnc.to_string()));
    }

    fn show_modem_enable_prompt(&mut self) {
        self.push(Shown::EnablePrompt);
    }

    fn show_no_modem_found(&mut self) {
        self.push(Shown::NoModemFound);
    }

    fn show_modem_error(&mut self, message: &str) {
        self.push(Shown::ModemError(message.to_string()));
    }

    fn show_balance_info_missing(&mut self, provider: &Provider) {
        self.push(Shown::BalanceInfoMissing(provider.name.clone()));
    }

    fn show_top_up_info_missing(&mut self, provider: &Provider) {
        self.push(Shown::TopUpInfoMissing(provider.name.clone()));
    }

    fn update_provider_name(&mut self, name: &str) {
        self.push(Shown::ProviderName(name.to_string()));
    }

    fn update_top_up_code_length(&mut self, length: usize) {
        self.push(Shown::TopUpCodeLength(length));
    }

    fn update_balance(&mut self, balance: &str, _timestamp: &str) {
        self.push(Shown::Balance(balance.to_string()));
    }

    fn update_top_up_reply(&mut self, reply: &str) {
        self.push(Shown::TopUpReply(reply.to_string()));
    }
}

#[derive(Default)]
struct Accounts {
    records: BTreeMap<String, Account>,
    added: Vec<(String, String)>,
    saves: usize,
}

/// In-memory account store. Clones share the records.
#[derive(Clone, Default)]
pub(crate) struct MemoryAccountStore {
    accounts: Arc<Mutex<Accounts>>,
}

impl MemoryAccountStore {
    pub(crate) fn with_account(account: Account) -> Self {
        let store = Self::default();
        lock(&store.accounts)
            .records
            .insert(account.identifier.clone(), account);
        store
    }

    /// `(identifier, provider name)` of every `add` call.
    pub(crate) fn added(&self) -> Vec<(String, String)> {
        lock(&self.accounts).added.clone()
    }

    pub(crate) fn saves(&self) -> usize {
        lock(&self.accounts).saves
    }

    pub(crate) fn get(&self, identifier: &str) -> Option<Account> {
        lock(&self.accounts).records.get(identifier).cloned()
    }
}

impl AccountStore for MemoryAccountStore {
    fn is_known(&self, identity: &SimIdentity) -> bool {
        lock(&self.accounts)
            .records
            .contains_key(&Account::identifier_for(identity))
    }

    fn fetch(&self, identity: &SimIdentity) -> Result<Option<Account>, AccountError> {
        Ok(lock(&self.accounts)
            .records
            .get(&Account::identifier_for(identity))
            .filter(|account| account.is_bound())
            .cloned())
    }

    fn add(&mut self, identity: &SimIdentity, provider: &Provider) -> Result<Account, AccountError> {
        let account = Account::new(identity, provider);
        lock(&self.accounts)
            .added
            .push((account.identifier.clone(), provider.name.clone()));
        self.save(&account)?;
        Ok(account)
    }

    fn save(&mut self, account: &Account) -> Result<(), AccountError> {
        let mut accounts = lock(&self.accounts);
        accounts.saves += 1;
        accounts
            .records
            .insert(account.identifier.clone(), account.clone());
        Ok(())
    }
}
