use rollcall_core::query::{Outcome, RequestId};
use tokio::sync::oneshot;

/// What happened to a request's result once it reached the delivery task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The result was handed to the listener (or there was no listener attached).
    Applied(Outcome),
    /// A newer request's result had already been applied; this one was dropped.
    Superseded,
    /// The delivery task went away before the result arrived.
    Abandoned,
}

/// Returned by [`super::QueryCoordinator::submit`]; never needs to be awaited.
#[derive(Debug)]
pub struct QueryHandle {
    request_id: RequestId,
    delivery: oneshot::Receiver<Delivery>,
}

impl QueryHandle {
    pub(crate) fn new(request_id: RequestId, delivery: oneshot::Receiver<Delivery>) -> Self {
        Self {
            request_id,
            delivery,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Waits until the result has been applied or dropped.
    pub async fn delivered(self) -> Delivery {
        self.delivery.await.unwrap_or(Delivery::Abandoned)
    }
}
