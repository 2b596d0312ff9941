//! Per-request work: mode bookkeeping, source selection, session scope.

use futures::FutureExt;
use rollcall_core::auth::{Credentials, SessionGate, SessionGuard};
use rollcall_core::error::RollcallError;
use rollcall_core::patient::Patient;
use rollcall_core::query::{Outcome, QueryResult, Request, RequestKind};
use rollcall_core::search_mode::{SearchMode, SearchModeStore};
use rollcall_core::source::PatientSource;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything a worker needs to turn a [`Request`] into a [`QueryResult`].
pub(crate) struct Dispatcher {
    pub(crate) source: Arc<dyn PatientSource>,
    pub(crate) gate: Arc<dyn SessionGate>,
    pub(crate) mode_store: Arc<dyn SearchModeStore>,
    pub(crate) credentials: RwLock<Credentials>,
    /// Cohort that scopes local search
    pub(crate) cohort_scope: Option<String>,
}

impl Dispatcher {
    /// Never fails: every error becomes a failed [`QueryResult`].
    pub(crate) async fn execute(&self, request: &Request) -> QueryResult {
        // A panic in the mode store or the source must still end in a result.
        let work = async {
            if let Some(mode) = request.kind().mode() {
                self.record_mode(request, mode).await;
            }
            self.retrieve(request).await
        };

        let retrieved = AssertUnwindSafe(work)
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                tracing::error!(
                    request_id = request.id(),
                    criteria = request.kind().criteria(),
                    "Request panicked for {}",
                    request.kind()
                );
                Err(Outcome::SourceFailure)
            });

        let result = match retrieved {
            Ok(records) => QueryResult::success(request, records),
            Err(outcome) => QueryResult::failed(request, outcome),
        };

        tracing::debug!(
            request_id = request.id(),
            outcome = ?result.outcome(),
            records = result.records().len(),
            "Time taken in fetching patients: {} ms",
            result.elapsed_millis()
        );
        result
    }

    /// Written before retrieval starts, so the record survives a hung or
    /// crashed retrieval. A failed write is logged and the request goes on.
    async fn record_mode(&self, request: &Request, mode: SearchMode) {
        if let Err(e) = self.mode_store.set(mode).await {
            tracing::warn!(
                request_id = request.id(),
                mode = %mode,
                "Failed to record search mode: {}",
                e
            );
        }
    }

    async fn retrieve(&self, request: &Request) -> Result<Vec<Patient>, Outcome> {
        let fetched = match request.kind() {
            RequestKind::LocalSearch(text) => {
                self.source
                    .search_local(text, self.cohort_scope.as_deref())
                    .await
            }
            RequestKind::ByCohort(cohort_id) => self.source.fetch_by_cohort(cohort_id).await,
            RequestKind::AllRecords => self.source.fetch_all().await,
            RequestKind::RemoteSearch(text) => return self.search_remote(request, text).await,
        };
        fetched.map_err(|e| source_failure(request, e))
    }

    /// Authenticates, searches under the session, and closes the session on
    /// every path out of this function.
    async fn search_remote(&self, request: &Request, text: &str) -> Result<Vec<Patient>, Outcome> {
        let credentials = self.credentials.read().await.clone();

        let authenticated = AssertUnwindSafe(self.gate.authenticate(&credentials))
            .catch_unwind()
            .await;
        let session = match authenticated {
            Ok(Ok(session)) => SessionGuard::new(session),
            Ok(Err(e)) => {
                tracing::warn!(
                    request_id = request.id(),
                    mode = SearchMode::Server.as_str(),
                    criteria = text,
                    "Authentication failure ({}), returning empty patient list",
                    e
                );
                return Err(Outcome::AuthFailure);
            }
            Err(_) => {
                tracing::error!(
                    request_id = request.id(),
                    mode = SearchMode::Server.as_str(),
                    criteria = text,
                    "Authentication panicked, returning empty patient list"
                );
                return Err(Outcome::AuthFailure);
            }
        };

        let searched = self.source.search_remote(session.session(), text).await;
        session.close();
        searched.map_err(|e| source_failure(request, e))
    }
}

fn source_failure(request: &Request, error: RollcallError) -> Outcome {
    let mode = request
        .kind()
        .mode()
        .map(|m| m.as_str())
        .unwrap_or("listing");
    tracing::warn!(
        request_id = request.id(),
        mode,
        criteria = request.kind().criteria(),
        "Exception occurred while fetching patients for {}: {}",
        request.kind(),
        error
    );
    Outcome::SourceFailure
}
