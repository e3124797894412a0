use std::{future, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::broadcast;
use tracing::{debug, error};

use super::{ModemBackend, ModemError, ModemHandle, Operation, Reply, Request, RequestEvent};

/// Continuation run when a request succeeds.
pub type OnSuccess<S> = Box<dyn FnOnce(&mut S, Reply) + Send>;
/// Continuation run when a request fails.
pub type OnFailure<S> = Box<dyn FnOnce(&mut S, ModemError) + Send>;

type InFlight = BoxFuture<'static, Result<Reply, zbus::Error>>;

struct RequestState<S> {
    operation: Operation,
    on_success: OnSuccess<S>,
    on_failure: OnFailure<S>,
}

/// Raw outcome of the in-flight call, handed back to [`RequestChannel::finish`].
pub struct Completion(Result<Reply, zbus::Error>);

/// A finished request whose continuation has not run yet.
pub struct Finished<S> {
    state: RequestState<S>,
    outcome: Result<Reply, ModemError>,
}

impl<S> Finished<S> {
    /// Operation that finished.
    pub fn operation(&self) -> Operation {
        self.state.operation
    }

    /// Runs exactly one of the request's continuations against `owner`.
    pub fn resume(self, owner: &mut S) {
        match self.outcome {
            Ok(reply) => (self.state.on_success)(owner, reply),
            Err(err) => (self.state.on_failure)(owner, err),
        }
    }
}

/// Single-flight channel to the modem service.
///
/// At most one request is outstanding. Continuations receive `&mut S`, the
/// owner of the channel, so they can drive the next step directly. The
/// in-flight call is only polled through [`RequestChannel::completion`],
/// which keeps all state changes on the owner's task.
pub struct RequestChannel<S> {
    backend: Arc<dyn ModemBackend>,
    pending: Option<RequestState<S>>,
    in_flight: Option<InFlight>,
    events: broadcast::Sender<RequestEvent>,
}

impl<S> RequestChannel<S> {
    /// Creates an idle channel on top of `backend`.
    pub fn new(backend: Arc<dyn ModemBackend>) -> Self {
        let (events, _) = broadcast::channel(32);

        Self {
            backend,
            pending: None,
            in_flight: None,
            events,
        }
    }

    /// Subscribe to request started/finished notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<RequestEvent> {
        self.events.subscribe()
    }

    /// Operation currently outstanding, if any.
    pub fn pending(&self) -> Option<Operation> {
        self.pending.as_ref().map(|state| state.operation)
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts `request`.
    ///
    /// The started notification goes out before the service call is made.
    ///
    /// # Errors
    /// Returns `ModemError::AlreadyPending` if another request is outstanding;
    /// the new request never reaches the service.
    pub fn invoke(
        &mut self,
        request: Request,
        on_success: impl FnOnce(&mut S, Reply) + Send + 'static,
        on_failure: impl FnOnce(&mut S, ModemError) + Send + 'static,
    ) -> Result<(), ModemError> {
        let operation = request.operation();

        if let Some(pending) = self.pending() {
            error!(%pending, requested = %operation, "Modem request rejected, channel busy");
            return Err(ModemError::AlreadyPending { pending });
        }

        self.pending = Some(RequestState {
            operation,
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        });

        debug!(%operation, "Started modem request");
        let _ = self.events.send(RequestEvent::Started(operation));

        let backend = Arc::clone(&self.backend);
        self.in_flight = Some(Box::pin(async move { backend.execute(request).await }));

        Ok(())
    }

    /// Sends a USSD command on `modem`, handing the network's reply text to `on_success`.
    ///
    /// # Errors
    /// Returns `ModemError::AlreadyPending` if another request is outstanding
    pub fn ussd_initiate(
        &mut self,
        modem: &ModemHandle,
        command: impl Into<String>,
        on_success: impl FnOnce(&mut S, String) + Send + 'static,
        on_failure: impl FnOnce(&mut S, ModemError) + Send + 'static,
    ) -> Result<(), ModemError> {
        let request = Request::UssdInitiate {
            modem: modem.clone(),
            command: command.into(),
        };

        self.invoke(
            request,
            move |owner, reply| on_success(owner, reply.into_text()),
            on_failure,
        )
    }

    /// Waits for the in-flight call to complete.
    ///
    /// Never resolves while the channel is idle. Cancel safe: dropping the
    /// returned future leaves the call in flight.
    pub async fn completion(&mut self) -> Completion {
        let Some(call) = self.in_flight.as_mut() else {
            return future::pending().await;
        };

        let outcome = call.await;
        self.in_flight = None;
        Completion(outcome)
    }

    /// Settles the pending request with `completion`.
    ///
    /// Clears the pending state and broadcasts the finished notification;
    /// the caller then runs the continuation with [`Finished::resume`], at
    /// which point the channel accepts new requests.
    pub fn finish(&mut self, completion: Completion) -> Option<Finished<S>> {
        let Some(state) = self.pending.take() else {
            error!("Modem request completed with nothing pending");
            return None;
        };

        let operation = state.operation;
        let outcome = completion
            .0
            .map_err(|err| ModemError::classify(operation, err));

        debug!(%operation, ok = outcome.is_ok(), "Finished modem request");
        let _ = self.events.send(RequestEvent::Finished(operation));

        Some(Finished { state, outcome })
    }
}
