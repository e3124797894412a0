use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use zbus::{
    Connection,
    fdo::{DBusProxy, ObjectManagerProxy},
    names::BusName,
};

use super::{
    ModemError, ModemHandle, ModemProxy, ModemState, Reply, Request, SimProxy, UssdProxy,
    proxy::{MM_MODEM_INTERFACE, MM_OBJECT, MM_SERVICE},
};
use crate::services::common::NO_OBJECT;

/// The modem-control service as seen by the request channel.
///
/// Implementations perform exactly one call per `execute`; bookkeeping and
/// error classification happen in the channel.
#[async_trait]
pub trait ModemBackend: Send + Sync {
    /// Whether the service is currently reachable.
    async fn is_available(&self) -> bool;

    /// Performs `request` against the service.
    async fn execute(&self, request: Request) -> Result<Reply, zbus::Error>;
}

/// ModemManager on the system bus.
pub struct ModemManager {
    connection: Connection,
}

impl ModemManager {
    /// Connects to the system bus.
    ///
    /// # Errors
    /// Returns `ModemError::Connection` if the system bus is unreachable
    #[instrument]
    pub async fn connect() -> Result<Self, ModemError> {
        let connection = Connection::system().await.map_err(|err| {
            ModemError::Connection(format!("system bus connection failed: {err}"))
        })?;

        Ok(Self { connection })
    }

    async fn probe_service(&self) -> zbus::Result<bool> {
        let dbus = DBusProxy::new(&self.connection).await?;
        let name = BusName::try_from(MM_SERVICE)?;
        Ok(dbus.name_has_owner(name).await?)
    }

    async fn modem_proxy(&self, path: &str) -> zbus::Result<ModemProxy<'_>> {
        ModemProxy::builder(&self.connection)
            .path(path.to_string())?
            .build()
            .await
    }

    #[instrument(skip(self))]
    async fn enumerate(&self) -> zbus::Result<Vec<ModemHandle>> {
        let manager = ObjectManagerProxy::builder(&self.connection)
            .destination(MM_SERVICE)?
            .path(MM_OBJECT)?
            .build()
            .await?;

        let objects = manager.get_managed_objects().await?;

        let mut paths: Vec<String> = objects
            .into_iter()
            .filter(|(_, interfaces)| {
                interfaces
                    .keys()
                    .any(|name| name.as_str() == MM_MODEM_INTERFACE)
            })
            .map(|(path, _)| path.as_str().to_string())
            .collect();
        // Managed objects come back as a map; keep enumeration order stable.
        paths.sort();

        let mut modems = Vec::with_capacity(paths.len());
        for path in paths {
            let proxy = self.modem_proxy(&path).await?;

            let state = proxy.state().await.map(ModemState::from).unwrap_or_else(|err| {
                warn!("Failed to fetch modem state for {path}: {err}");
                ModemState::Unknown
            });

            let sim = match proxy.sim().await {
                Ok(sim) if sim.as_str() != NO_OBJECT => Some(sim.as_str().to_string()),
                Ok(_) => None,
                Err(err) => {
                    warn!("Failed to fetch SIM path for {path}: {err}");
                    None
                }
            };

            debug!(modem = %path, ?state, "Found modem");
            modems.push(ModemHandle::new(path, state.is_enabled(), sim));
        }

        Ok(modems)
    }

    async fn read_identity(&self, modem: &ModemHandle) -> zbus::Result<String> {
        let sim_path = self.modem_proxy(&modem.path).await?.sim().await?;
        if sim_path.as_str() == NO_OBJECT {
            return Err(zbus::Error::Failure("no SIM card present".to_string()));
        }

        let sim = SimProxy::builder(&self.connection)
            .path(sim_path.as_str().to_string())?
            .build()
            .await?;

        sim.imsi().await
    }
}

#[async_trait]
impl ModemBackend for ModemManager {
    async fn is_available(&self) -> bool {
        self.probe_service().await.unwrap_or_else(|err| {
            warn!("Failed to probe {MM_SERVICE}: {err}");
            false
        })
    }

    async fn execute(&self, request: Request) -> Result<Reply, zbus::Error> {
        match request {
            Request::Enumerate => self.enumerate().await.map(Reply::Modems),
            Request::SetEnabled { modem, enabled } => {
                self.modem_proxy(&modem.path).await?.enable(enabled).await?;
                Ok(Reply::Done)
            }
            Request::UssdInitiate { modem, command } => {
                let ussd = UssdProxy::builder(&self.connection)
                    .path(modem.path.clone())?
                    .build()
                    .await?;
                ussd.initiate(&command).await.map(Reply::Text)
            }
            Request::ReadIdentity { modem } => self.read_identity(&modem).await.map(Reply::Identity),
        }
    }
}
