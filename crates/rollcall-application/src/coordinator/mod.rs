//! The dual-mode query coordinator.
//!
//! `submit` stamps a request with the next sequence number, queues its
//! `Started` event, and spawns one worker task for it. Workers send their
//! results into a single delivery task, which is the only code that ever
//! calls the listener.
//!
//! ```text
//! submit ──► Started ─────────────────────────────┐
//!        └─► worker: [mode write] ─► retrieval ─► Completed ──► delivery ──► listener
//! ```

mod delivery;
mod dispatch;
mod handle;

pub use handle::{Delivery, QueryHandle};

use rollcall_core::auth::{Credentials, SessionGate};
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::listener::QueryListener;
use rollcall_core::query::{Request, RequestKind};
use rollcall_core::search_mode::SearchModeStore;
use rollcall_core::source::PatientSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::Instrument;

use delivery::{DeliveryEvent, SharedListener};
use dispatch::Dispatcher;

/// Decides which source serves a request, runs it off the caller's thread,
/// and delivers results to a [`QueryListener`] in order.
///
/// Requests are never cancelled. When two are in flight, both run to
/// completion; a result is dropped only if a newer request's result has
/// already been applied.
pub struct QueryCoordinator {
    dispatcher: Arc<Dispatcher>,
    events: mpsc::UnboundedSender<DeliveryEvent>,
    listener: SharedListener,
    next_id: AtomicU64,
    runtime: Handle,
}

impl QueryCoordinator {
    pub fn builder(
        source: Arc<dyn PatientSource>,
        gate: Arc<dyn SessionGate>,
        mode_store: Arc<dyn SearchModeStore>,
    ) -> QueryCoordinatorBuilder {
        QueryCoordinatorBuilder {
            source,
            gate,
            mode_store,
            credentials: Credentials::default(),
            cohort_scope: None,
            listener: None,
        }
    }

    /// Queues a request and returns immediately.
    ///
    /// May be called from any thread, including one outside the runtime.
    pub fn submit(&self, kind: RequestKind) -> QueryHandle {
        let request_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let request = Request::new(request_id, kind);
        let (ack, delivered) = oneshot::channel();

        tracing::info!(
            request_id,
            submitted_at = %request.submitted_wall(),
            "Submitting {}",
            request.kind()
        );

        if self
            .events
            .send(DeliveryEvent::Started { request_id })
            .is_err()
        {
            tracing::error!(request_id, "delivery task is gone, request not started");
            return QueryHandle::new(request_id, delivered);
        }

        let dispatcher = self.dispatcher.clone();
        let events = self.events.clone();
        let span = tracing::info_span!("query", request_id);
        self.runtime.spawn(
            async move {
                let result = dispatcher.execute(&request).await;
                if events
                    .send(DeliveryEvent::Completed { result, ack })
                    .is_err()
                {
                    tracing::warn!("delivery task is gone, result discarded");
                }
            }
            .instrument(span),
        );

        QueryHandle::new(request_id, delivered)
    }

    /// Lists the configured cohort, or every patient when no cohort is configured.
    pub fn reload(&self) -> QueryHandle {
        let kind = match &self.dispatcher.cohort_scope {
            Some(cohort_id) => RequestKind::ByCohort(cohort_id.clone()),
            None => RequestKind::AllRecords,
        };
        self.submit(kind)
    }

    /// Searches the local cache, within the configured cohort if any.
    pub fn search(&self, text: impl Into<String>) -> QueryHandle {
        self.submit(RequestKind::LocalSearch(text.into()))
    }

    pub fn search_on_server(&self, text: impl Into<String>) -> QueryHandle {
        self.submit(RequestKind::RemoteSearch(text.into()))
    }

    /// Attaches, replaces, or (with `None`) detaches the listener.
    pub async fn set_listener(&self, listener: Option<Arc<dyn QueryListener>>) {
        *self.listener.write().await = listener;
    }

    /// Credentials used by later remote searches.
    pub async fn set_credentials(&self, credentials: Credentials) {
        *self.dispatcher.credentials.write().await = credentials;
    }

    pub fn cohort_scope(&self) -> Option<&str> {
        self.dispatcher.cohort_scope.as_deref()
    }
}

/// Builder for [`QueryCoordinator`].
pub struct QueryCoordinatorBuilder {
    source: Arc<dyn PatientSource>,
    gate: Arc<dyn SessionGate>,
    mode_store: Arc<dyn SearchModeStore>,
    credentials: Credentials,
    cohort_scope: Option<String>,
    listener: Option<Arc<dyn QueryListener>>,
}

impl QueryCoordinatorBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Cohort used by `reload` and to scope local search.
    pub fn cohort_scope(mut self, cohort_id: impl Into<String>) -> Self {
        self.cohort_scope = Some(cohort_id.into());
        self
    }

    pub fn listener(mut self, listener: Arc<dyn QueryListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Starts the delivery task on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a tokio runtime.
    pub fn build(self) -> Result<QueryCoordinator> {
        let runtime = Handle::try_current().map_err(|e| {
            RollcallError::internal(format!("query coordinator needs a tokio runtime: {e}"))
        })?;

        let (events, receiver) = mpsc::unbounded_channel();
        let listener: SharedListener = Arc::new(RwLock::new(self.listener));
        runtime.spawn(delivery::run(receiver, listener.clone()));

        Ok(QueryCoordinator {
            dispatcher: Arc::new(Dispatcher {
                source: self.source,
                gate: self.gate,
                mode_store: self.mode_store,
                credentials: RwLock::new(self.credentials),
                cohort_scope: self.cohort_scope,
            }),
            events,
            listener,
            next_id: AtomicU64::new(0),
            runtime,
        })
    }
}
