use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::{ModemBackend, ModemError, ModemHandle, Request, RequestChannel, SimIdentity};

/// Modem discovery and enablement.
///
/// Readiness probes go straight to the backend; every device call goes
/// through the caller's [`RequestChannel`].
#[derive(Clone)]
pub struct ModemDiscovery {
    backend: Arc<dyn ModemBackend>,
}

impl ModemDiscovery {
    /// Creates a discovery helper for `backend`.
    pub fn new(backend: Arc<dyn ModemBackend>) -> Self {
        Self { backend }
    }

    /// Probes once whether the modem service is reachable.
    ///
    /// The caller is expected to schedule repeated probes.
    #[instrument(skip(self))]
    pub async fn wait_for_service(&self) -> bool {
        let ready = self.backend.is_available().await;
        debug!(ready, "Probed modem service");
        ready
    }

    /// Enumerates modems; `on_success` receives them in service order.
    ///
    /// # Errors
    /// Returns `ModemError::AlreadyPending` if the channel is busy
    pub fn discover_modems<S>(
        &self,
        channel: &mut RequestChannel<S>,
        on_success: impl FnOnce(&mut S, Vec<ModemHandle>) + Send + 'static,
        on_failure: impl FnOnce(&mut S, ModemError) + Send + 'static,
    ) -> Result<(), ModemError> {
        channel.invoke(
            Request::Enumerate,
            move |owner, reply| on_success(owner, reply.into_modems()),
            on_failure,
        )
    }

    /// Picks the modem to work with.
    ///
    /// Only one modem is supported: the first enumerated one wins and the
    /// rest are ignored.
    pub fn select_modem(modems: Vec<ModemHandle>) -> Option<ModemHandle> {
        let mut modems = modems.into_iter();
        let selected = modems.next()?;

        for ignored in modems {
            warn!(modem = %ignored.path, "Ignoring additional modem");
        }

        debug!(modem = %selected.path, "Using modem");
        Some(selected)
    }

    /// Cached enabled state of `modem`; no service round trip.
    pub fn is_enabled(modem: &ModemHandle) -> bool {
        modem.enabled
    }

    /// Powers `modem` up.
    ///
    /// # Errors
    /// Returns `ModemError::AlreadyPending` if the channel is busy
    pub fn enable<S>(
        &self,
        channel: &mut RequestChannel<S>,
        modem: &ModemHandle,
        on_success: impl FnOnce(&mut S) + Send + 'static,
        on_failure: impl FnOnce(&mut S, ModemError) + Send + 'static,
    ) -> Result<(), ModemError> {
        let request = Request::SetEnabled {
            modem: modem.clone(),
            enabled: true,
        };

        channel.invoke(request, move |owner, _| on_success(owner), on_failure)
    }

    /// Reads the IMSI of the SIM in `modem`.
    ///
    /// A reply that is not a valid IMSI is routed to `on_failure` as
    /// `ModemError::InvalidIdentity`, so the failure continuation must be
    /// cloneable.
    ///
    /// # Errors
    /// Returns `ModemError::AlreadyPending` if the channel is busy
    pub fn read_identity<S, F>(
        &self,
        channel: &mut RequestChannel<S>,
        modem: &ModemHandle,
        on_success: impl FnOnce(&mut S, SimIdentity) + Send + 'static,
        on_failure: F,
    ) -> Result<(), ModemError>
    where
        F: FnOnce(&mut S, ModemError) + Clone + Send + 'static,
    {
        let request = Request::ReadIdentity {
            modem: modem.clone(),
        };
        let on_invalid = on_failure.clone();

        channel.invoke(
            request,
            move |owner, reply| match SimIdentity::parse(&reply.into_text()) {
                Ok(identity) => on_success(owner, identity),
                Err(err) => {
                    warn!("{err}");
                    on_invalid(owner, err)
                }
            },
            on_failure,
        )
    }
}
