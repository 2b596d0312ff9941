//! Presentation-side listener contract.

use crate::query::{QueryResult, RequestId};

/// Receives lifecycle and result callbacks for submitted requests.
///
/// The coordinator invokes all three callbacks from one delivery task, in
/// order, never concurrently. For a request that is delivered:
/// `on_started` < `on_result` < `on_finished`. A request whose result was
/// superseded by a newer one gets `on_started` and `on_finished`, never
/// `on_result`.
///
/// `on_result` is the only callback that may change displayed state. A result
/// whose outcome is not a success must not clear or replace the display.
pub trait QueryListener: Send + Sync {
    fn on_started(&self, request_id: RequestId);

    fn on_result(&self, result: &QueryResult);

    /// Work for this request is done (e.g. hide a progress indicator).
    fn on_finished(&self, request_id: RequestId);
}
