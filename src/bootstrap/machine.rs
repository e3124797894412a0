use std::sync::Arc;

use chrono::Local;
use tokio::{
    sync::{broadcast, mpsc},
    time::{Instant, sleep_until},
};
use tracing::{debug, error, info, instrument, warn};

use super::{BootstrapPhase, Presenter, SessionEvent, UserAction};
use crate::{
    account::{Account, AccountStore},
    config::ModemConfig,
    provider::{Provider, ProviderCatalog, ProviderResolver, Resolution},
    services::{
        common::Property,
        modem::{
            Completion, ModemBackend, ModemDiscovery, ModemError, ModemHandle, Operation,
            RequestChannel, RequestEvent, SimIdentity,
        },
    },
};

/// `asctime` style, e.g. `Sun Oct 18 14:02:11 2026`.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

enum Wake {
    Completed(Completion),
    Action(Option<UserAction>),
    Poll,
}

/// Drives a session from "is there a modem service?" to a bound provider,
/// then serves balance queries and top-ups.
///
/// All state lives here and is only touched from [`Bootstrap::step`], so
/// nothing needs locking. Modem calls go through the owned
/// [`RequestChannel`], whose continuations receive the bootstrap itself.
pub struct Bootstrap {
    settings: ModemConfig,
    discovery: ModemDiscovery,
    channel: RequestChannel<Bootstrap>,
    resolver: ProviderResolver,
    accounts: Box<dyn AccountStore>,
    presenter: Box<dyn Presenter>,
    actions: mpsc::UnboundedReceiver<UserAction>,
    actions_open: bool,
    events: broadcast::Sender<SessionEvent>,
    phase: Property<BootstrapPhase>,
    modem: Option<ModemHandle>,
    identity: Option<SimIdentity>,
    account: Option<Account>,
    provider: Option<Arc<Provider>>,
    polls: u32,
    restarts: u32,
    next_poll: Option<Instant>,
}

impl Bootstrap {
    /// Creates an idle bootstrap; call [`Bootstrap::start`] to begin.
    pub fn new(
        settings: ModemConfig,
        backend: Arc<dyn ModemBackend>,
        catalog: Arc<dyn ProviderCatalog>,
        accounts: Box<dyn AccountStore>,
        presenter: Box<dyn Presenter>,
        actions: mpsc::UnboundedReceiver<UserAction>,
    ) -> Self {
        let (events, _) = broadcast::channel(32);

        Self {
            settings,
            discovery: ModemDiscovery::new(Arc::clone(&backend)),
            channel: RequestChannel::new(backend),
            resolver: ProviderResolver::new(catalog),
            accounts,
            presenter,
            actions,
            actions_open: true,
            events,
            phase: Property::new(BootstrapPhase::WaitingForService),
            modem: None,
            identity: None,
            account: None,
            provider: None,
            polls: 0,
            restarts: 0,
            next_poll: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> BootstrapPhase {
        self.phase.get()
    }

    /// Subscribe to provider, balance and error notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Subscribe to modem request started/finished notifications.
    pub fn subscribe_requests(&self) -> broadcast::Receiver<RequestEvent> {
        self.channel.subscribe()
    }

    /// Modem operation currently outstanding.
    pub fn pending_request(&self) -> Option<Operation> {
        self.channel.pending()
    }

    /// The modem the session works with.
    pub fn modem(&self) -> Option<&ModemHandle> {
        self.modem.as_ref()
    }

    /// Identity of the SIM, unless reading it was not allowed.
    pub fn identity(&self) -> Option<&SimIdentity> {
        self.identity.as_ref()
    }

    /// The stored account of the SIM.
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// The bound provider.
    pub fn provider(&self) -> Option<&Arc<Provider>> {
        self.provider.as_ref()
    }

    /// Restarts since the last start or retry.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Begins polling for the modem service.
    pub fn start(&mut self) {
        info!("Starting bootstrap");
        self.reset_session();
        self.enter(BootstrapPhase::WaitingForService);
        self.next_poll = Some(Instant::now());
    }

    /// Starts and steps until the session ends.
    #[instrument(skip(self))]
    pub async fn run(&mut self) {
        self.start();
        while self.step().await {}
    }

    /// Waits for the next wake-up and handles it.
    ///
    /// Wake-ups are the in-flight request completing, a user action or the
    /// poll timer. Returns `false` once the session is over: the user quit,
    /// or nothing is left that could wake the bootstrap.
    pub async fn step(&mut self) -> bool {
        let busy = self.channel.is_pending();
        let listening = self.actions_open;
        let deadline = self.next_poll;

        let wake = tokio::select! {
            completion = self.channel.completion(), if busy => Wake::Completed(completion),
            action = self.actions.recv(), if listening => Wake::Action(action),
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => Wake::Poll,
            else => return false,
        };

        match wake {
            Wake::Completed(completion) => {
                if let Some(finished) = self.channel.finish(completion) {
                    finished.resume(self);
                }
            }
            Wake::Action(Some(action)) => return self.handle_action(action),
            Wake::Action(None) => {
                debug!("User action channel closed");
                self.actions_open = false;
            }
            Wake::Poll => self.poll_service().await,
        }

        true
    }

    fn enter(&mut self, phase: BootstrapPhase) {
        let from = self.phase.get();
        if self.phase.set(phase) {
            debug!(%from, to = %phase, "Bootstrap phase changed");
        }
    }

    fn reset_session(&mut self) {
        self.modem = None;
        self.identity = None;
        self.account = None;
        self.provider = None;
        self.polls = 0;
        self.next_poll = None;
    }

    fn schedule_poll(&mut self) {
        self.next_poll = Some(Instant::now() + self.settings.poll_interval());
    }

    fn bound_modem(&self) -> Option<ModemHandle> {
        if self.modem.is_none() {
            error!(phase = %self.phase.get(), "No modem bound");
        }
        self.modem.clone()
    }

    fn check_issued(&self, issued: Result<(), ModemError>) {
        if let Err(err) = issued {
            error!(phase = %self.phase.get(), "Dropped modem request: {err}");
        }
    }

    async fn poll_service(&mut self) {
        self.next_poll = None;
        if self.phase.get() != BootstrapPhase::WaitingForService {
            return;
        }

        if self.discovery.wait_for_service().await {
            info!(polls = self.polls, "Modem service is available");
            self.discover();
            return;
        }

        self.polls += 1;
        if self.polls >= self.settings.max_service_polls {
            warn!(polls = self.polls, "Modem service did not show up");
            self.enter(BootstrapPhase::NoModemFound);
            self.presenter.show_no_modem_found();
        } else {
            self.schedule_poll();
        }
    }

    fn discover(&mut self) {
        self.enter(BootstrapPhase::Discovering);

        let issued = self.discovery.discover_modems(
            &mut self.channel,
            |boot: &mut Self, modems| boot.on_modems(modems),
            |boot: &mut Self, err| boot.fail(err),
        );
        self.check_issued(issued);
    }

    fn on_modems(&mut self, modems: Vec<ModemHandle>) {
        match ModemDiscovery::select_modem(modems) {
            Some(modem) => {
                self.modem = Some(modem);
                self.check_enablement();
            }
            None => {
                info!("No modem found");
                self.enter(BootstrapPhase::NoModemFound);
                self.presenter.show_no_modem_found();
            }
        }
    }

    fn check_enablement(&mut self) {
        let Some(modem) = self.bound_modem() else {
            return;
        };
        self.enter(BootstrapPhase::CheckingEnablement);

        if ModemDiscovery::is_enabled(&modem) {
            self.read_identity(&modem);
        } else {
            info!(modem = %modem.path, "Modem is disabled");
            self.enter(BootstrapPhase::AwaitingEnable);
            self.presenter.show_modem_enable_prompt();
        }
    }

    fn enable_modem(&mut self) {
        let Some(modem) = self.bound_modem() else {
            return;
        };
        self.enter(BootstrapPhase::CheckingEnablement);

        let issued = self.discovery.enable(
            &mut self.channel,
            &modem,
            |boot: &mut Self| boot.on_enabled(),
            |boot: &mut Self, err| boot.fail(err),
        );
        self.check_issued(issued);
    }

    fn on_enabled(&mut self) {
        info!("Modem enabled");
        if let Some(modem) = self.modem.as_mut() {
            modem.enabled = true;
        }
        self.check_enablement();
    }

    fn read_identity(&mut self, modem: &ModemHandle) {
        self.enter(BootstrapPhase::ReadingIdentity);

        let issued = self.discovery.read_identity(
            &mut self.channel,
            modem,
            |boot: &mut Self, identity| boot.on_identity(identity),
            |boot: &mut Self, err| boot.on_identity_failed(err),
        );
        self.check_issued(issued);
    }

    fn on_identity_failed(&mut self, err: ModemError) {
        if err.is_forbidden() {
            info!("Reading the SIM identity is not allowed: {err}");
            self.identity = None;
            self.enter(BootstrapPhase::ResolvingProviderInteractive);
            self.presenter.show_provider_assistant(None);
        } else if err.is_disabled() {
            info!("Modem is no longer enabled: {err}");
            if let Some(modem) = self.modem.as_mut() {
                modem.enabled = false;
            }
            self.check_enablement();
        } else {
            self.fail(err);
        }
    }

    fn on_identity(&mut self, identity: SimIdentity) {
        info!(network = %identity.network_id(), "Read SIM identity");
        self.enter(BootstrapPhase::ResolvingAccount);
        self.identity = Some(identity.clone());

        let stored = self.accounts.fetch(&identity).unwrap_or_else(|err| {
            warn!("Failed to fetch account: {err}");
            None
        });

        if let Some(account) = stored {
            let provider = self.resolver.resolve_from_account(&account);
            if provider.is_none() {
                warn!(
                    account = %account.identifier,
                    provider = %account.provider,
                    country = %account.country,
                    "Stored provider is not in the provider database"
                );
            }

            self.account = Some(account);
            if let Some(provider) = provider {
                self.bind_provider(provider);
                return;
            }
        }

        match self.resolver.resolve_by_identity(&identity) {
            Resolution::Resolved(provider) => self.bind_provider(provider),
            Resolution::Ambiguous(candidates) => {
                info!(candidates = candidates.len(), "Several providers match");
                self.enter(BootstrapPhase::ResolvingProviderInteractive);
                self.presenter.show_provider_assistant(Some(&candidates));
            }
            Resolution::Unknown(network) => {
                warn!(%network, "Network is not in the provider database");
                self.enter(BootstrapPhase::ResolvingProviderInteractive);
                self.presenter
                    .show_provider_unknown(&network.mcc, &network.mnc);
            }
        }
    }

    fn select_provider(&mut self, country: &str, name: &str) {
        match self.resolver.resolve_explicit(country, name) {
            Some(provider) => self.bind_provider(provider),
            None => {
                warn!(country, name, "Selected provider is not in the provider database");
                self.presenter.show_provider_assistant(None);
            }
        }
    }

    fn bind_provider(&mut self, provider: Arc<Provider>) {
        info!(%provider, "Provider bound");
        self.presenter.update_provider_name(&provider.name);
        if let Some(length) = provider.top_up_code_length {
            self.presenter.update_top_up_code_length(length);
        }

        if let Some(account) = self.account.as_mut() {
            if let Err(err) = self.accounts.update_provider(account, &provider) {
                warn!("Failed to store provider change: {err}");
            }
            if let Some((balance, timestamp)) = account.balance() {
                self.presenter.update_balance(balance, timestamp);
            }
        } else if let Some(identity) = &self.identity {
            match self.accounts.add(identity, &provider) {
                Ok(account) => self.account = Some(account),
                Err(err) => warn!("Failed to store account: {err}"),
            }
        }

        self.provider = Some(Arc::clone(&provider));
        let _ = self.events.send(SessionEvent::ProviderChanged(provider));
        self.enter(BootstrapPhase::Ready);
    }

    fn fetch_balance(&mut self) {
        let (Some(provider), Some(modem)) = (self.provider.clone(), self.bound_modem()) else {
            return;
        };

        let issued = provider.fetch_balance(
            &mut self.channel,
            &modem,
            |boot: &mut Self, balance| boot.on_balance(balance),
            |boot: &mut Self, err| boot.on_request_failed(err),
        );

        match issued {
            Ok(true) => {}
            Ok(false) => {
                error!(%provider, "No idea how to fetch the balance");
                self.presenter.show_balance_info_missing(&provider);
            }
            Err(err) => self.check_issued(Err(err)),
        }
    }

    fn on_balance(&mut self, balance: String) {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        info!(%balance, "Balance fetched");

        if let Some(account) = self.account.as_mut() {
            if let Err(err) = self.accounts.update_balance(account, &balance, &timestamp) {
                warn!("Failed to store balance: {err}");
            }
        }

        self.presenter.update_balance(&balance, &timestamp);
        let _ = self
            .events
            .send(SessionEvent::BalanceChanged { balance, timestamp });
    }

    fn top_up(&mut self, code: &str) {
        let (Some(provider), Some(modem)) = (self.provider.clone(), self.bound_modem()) else {
            return;
        };

        let issued = provider.top_up(
            &mut self.channel,
            &modem,
            code,
            |boot: &mut Self, reply| boot.on_top_up(reply),
            |boot: &mut Self, err| boot.on_request_failed(err),
        );

        match issued {
            Ok(true) => {}
            Ok(false) => {
                error!(%provider, "No idea how to top up");
                self.presenter.show_top_up_info_missing(&provider);
            }
            Err(err) => self.check_issued(Err(err)),
        }
    }

    fn on_top_up(&mut self, reply: String) {
        info!(%reply, "Top-up replied");
        self.presenter.update_top_up_reply(&reply);
        let _ = self.events.send(SessionEvent::TopUpReplied(reply));
    }

    fn report_error(&mut self, err: &ModemError) {
        let message = err.to_string();
        self.presenter.show_modem_error(&message);
        let _ = self.events.send(SessionEvent::ModemError(message));
    }

    fn on_request_failed(&mut self, err: ModemError) {
        error!("Modem request failed: {err}");
        self.report_error(&err);
    }

    fn fail(&mut self, err: ModemError) {
        error!(phase = %self.phase.get(), "Bootstrap failed: {err}");
        self.report_error(&err);
        self.enter(BootstrapPhase::Failed);
        self.restart();
    }

    fn restart(&mut self) {
        self.restarts += 1;
        if self.restarts > self.settings.max_restarts {
            error!(restarts = self.restarts, "Giving up on the modem");
            return;
        }

        info!(restart = self.restarts, "Restarting bootstrap");
        self.reset_session();
        self.enter(BootstrapPhase::WaitingForService);
        self.schedule_poll();
    }

    fn handle_action(&mut self, action: UserAction) -> bool {
        let phase = self.phase.get();
        debug!(?action, %phase, "User action");

        match (action, phase) {
            (UserAction::Quit, _) => {
                info!("Session ended");
                return false;
            }
            (UserAction::ConfirmEnable, BootstrapPhase::AwaitingEnable) => self.enable_modem(),
            (UserAction::DeclineEnable, BootstrapPhase::AwaitingEnable) => {
                info!("Modem left disabled");
            }
            (UserAction::Retry, BootstrapPhase::NoModemFound | BootstrapPhase::Failed) => {
                self.restarts = 0;
                self.start();
            }
            (
                UserAction::SelectProvider { country, name },
                BootstrapPhase::ResolvingProviderInteractive | BootstrapPhase::Ready,
            ) => self.select_provider(&country, &name),
            (UserAction::FetchBalance, BootstrapPhase::Ready) => self.fetch_balance(),
            (UserAction::TopUp { code }, BootstrapPhase::Ready) => self.top_up(&code),
            (action, phase) => warn!(?action, %phase, "Ignoring user action"),
        }

        true
    }
}
