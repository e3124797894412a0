use std::{fmt::Write as _, sync::Arc};

use tokio::sync::{broadcast::error::TryRecvError, mpsc};
use tracing::{debug, info, instrument};

use super::{
    Cli, CliError, Commands, CommandResult, TerminalPresenter,
    formatting::{format_country, format_header, format_progress},
};
use crate::{
    account::JsonAccountStore,
    bootstrap::{Bootstrap, BootstrapPhase, SessionEvent, UserAction},
    config::Config,
    provider::{ProviderCatalog, ServiceProviderDb},
    services::modem::{ModemManager, RequestEvent},
};

/// Executes parsed command lines.
///
/// Session commands (`status`, `balance`, `top-up`) run a [`Bootstrap`]
/// until the provider is bound, issue their request and stop after the
/// reply. Listing commands only load the provider database.
pub struct CliService {
    config: Config,
}

impl CliService {
    /// Creates a service working with `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the command in `cli`, returning what to print.
    ///
    /// # Errors
    /// Returns `CliError` if the provider database, the account store or the
    /// modem service is unusable, or the session ends without a result
    pub async fn execute(&self, cli: &Cli) -> CommandResult {
        match &cli.command {
            Commands::Countries => self.countries(),
            Commands::Providers { country } => self.providers(country),
            Commands::Schema => schema(),
            Commands::Status => self.session(cli, None).await,
            Commands::Balance => self.session(cli, Some(UserAction::FetchBalance)).await,
            Commands::TopUp { code } => {
                if code.trim().is_empty() {
                    return Err(CliError::InvalidArguments(
                        "top-up code must not be empty".to_string(),
                    ));
                }
                let request = UserAction::TopUp {
                    code: code.trim().to_string(),
                };
                self.session(cli, Some(request)).await
            }
        }
    }

    fn catalog(&self) -> Result<ServiceProviderDb, CliError> {
        let providers = &self.config.providers;
        Ok(ServiceProviderDb::load(
            &providers.database_path(),
            &providers.country_codes,
        )?)
    }

    fn countries(&self) -> CommandResult {
        let catalog = self.catalog()?;
        let mut output = format_header("Countries");

        for (name, code) in catalog.list_countries() {
            let _ = write!(output, "\n  {}", format_country(name.as_deref(), &code));
        }

        Ok(output)
    }

    fn providers(&self, country: &str) -> CommandResult {
        let catalog = self.catalog()?;
        let country = country.to_lowercase();
        let names = catalog.list_provider_names(&country);

        if names.is_empty() {
            return Err(CliError::InvalidArguments(format!(
                "no providers known for country '{country}'"
            )));
        }

        let mut output = format_header(&format!("Providers in {country}"));
        for name in names {
            let _ = write!(output, "\n  {name}");
        }

        Ok(output)
    }

    #[instrument(skip(self, cli), fields(command = ?cli.command))]
    async fn session(&self, cli: &Cli, request: Option<UserAction>) -> CommandResult {
        let catalog: Arc<dyn ProviderCatalog> = Arc::new(self.catalog()?);
        let accounts = JsonAccountStore::open(&self.config.accounts.store_path()?)?;
        let backend = Arc::new(ModemManager::connect().await?);

        let (actions, receiver) = mpsc::unbounded_channel();
        let presenter = TerminalPresenter::new(actions.clone(), cli.answers());

        let mut bootstrap = Bootstrap::new(
            self.config.modem.clone(),
            backend,
            catalog,
            Box::new(accounts),
            Box::new(presenter),
            receiver,
        );
        let mut events = bootstrap.subscribe();
        let mut requests = bootstrap.subscribe_requests();
        let mut outcome = SessionOutcome::new(request);

        bootstrap.start();

        while bootstrap.step().await {
            if let Some(action) = outcome.on_phase(bootstrap.phase())? {
                let _ = actions.send(action);
            }

            loop {
                match requests.try_recv() {
                    Ok(event) => report_progress(event),
                    Err(TryRecvError::Lagged(_)) => {}
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }

            loop {
                match events.try_recv() {
                    Ok(event) => {
                        if let Some(action) = outcome.on_event(event) {
                            let _ = actions.send(action);
                        }
                    }
                    Err(TryRecvError::Lagged(_)) => {}
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }

        outcome.finish(bootstrap.phase())
    }
}

/// What a session command has seen so far and what it still has to ask for.
#[derive(Debug)]
pub(super) struct SessionOutcome {
    request: Option<UserAction>,
    reached_ready: bool,
    awaiting_reply: bool,
    failure: Option<String>,
}

impl SessionOutcome {
    /// Tracks a session that issues `request` once ready, or just quits.
    pub(super) fn new(request: Option<UserAction>) -> Self {
        Self {
            request,
            reached_ready: false,
            awaiting_reply: false,
            failure: None,
        }
    }

    /// Action to send after the bootstrap moved to `phase`.
    ///
    /// # Errors
    /// Returns `CliError::ServiceError` once the bootstrap gave up
    pub(super) fn on_phase(&mut self, phase: BootstrapPhase) -> Result<Option<UserAction>, CliError> {
        match phase {
            BootstrapPhase::Failed => Err(CliError::ServiceError(
                "giving up after repeated modem errors".to_string(),
            )),
            BootstrapPhase::Ready if !self.reached_ready => {
                self.reached_ready = true;
                info!("Session ready");
                Ok(Some(match self.request.take() {
                    Some(action) => {
                        self.awaiting_reply = true;
                        action
                    }
                    None => UserAction::Quit,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Action to send after `event`; the first reply to the request ends the session.
    pub(super) fn on_event(&mut self, event: SessionEvent) -> Option<UserAction> {
        debug!(?event, "Session event");
        if !self.awaiting_reply || !is_reply(&event) {
            return None;
        }

        self.awaiting_reply = false;
        if let SessionEvent::ModemError(message) = event {
            self.failure = Some(message);
        }
        Some(UserAction::Quit)
    }

    /// Result of the command once the bootstrap stopped in `phase`.
    ///
    /// # Errors
    /// Returns `CliError::ServiceError` if the request failed or the session
    /// never got ready
    pub(super) fn finish(self, phase: BootstrapPhase) -> CommandResult {
        if let Some(message) = self.failure {
            Err(CliError::ServiceError(message))
        } else if self.reached_ready {
            Ok(String::new())
        } else {
            Err(CliError::ServiceError(format!("session ended while {phase}")))
        }
    }
}

fn report_progress(event: RequestEvent) {
    match event {
        RequestEvent::Started(operation) => {
            eprintln!("{}", format_progress(operation));
        }
        RequestEvent::Finished(operation) => debug!(%operation, "Modem answered"),
    }
}

fn is_reply(event: &SessionEvent) -> bool {
    matches!(
        event,
        SessionEvent::BalanceChanged { .. }
            | SessionEvent::TopUpReplied(_)
            | SessionEvent::ModemError(_)
    )
}

fn schema() -> CommandResult {
    let schema = schemars::schema_for!(Config);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| CliError::ServiceError(format!("cannot serialize schema: {e}")))
}
