//! Single-consumer delivery of lifecycle events and results to the listener.

use rollcall_core::listener::QueryListener;
use rollcall_core::query::{QueryResult, RequestId};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};

use super::handle::Delivery;

pub(crate) type SharedListener = Arc<RwLock<Option<Arc<dyn QueryListener>>>>;

pub(crate) enum DeliveryEvent {
    Started {
        request_id: RequestId,
    },
    Completed {
        result: QueryResult,
        ack: oneshot::Sender<Delivery>,
    },
}

/// Applies events in channel order.
///
/// A `Started` event is always queued before its worker is spawned, so it is
/// always delivered before that request's result. A completion whose request
/// id is lower than the last applied one is stale: the listener gets
/// `on_finished` for it but never `on_result`.
pub(crate) async fn run(mut events: mpsc::UnboundedReceiver<DeliveryEvent>, listener: SharedListener) {
    let mut last_applied: Option<RequestId> = None;

    while let Some(event) = events.recv().await {
        let current = listener.read().await.clone();

        match event {
            DeliveryEvent::Started { request_id } => {
                notify(&current, |l| l.on_started(request_id));
            }
            DeliveryEvent::Completed { result, ack } => {
                let request_id = result.request_id();

                if last_applied.is_some_and(|last| last > request_id) {
                    tracing::debug!(
                        request_id,
                        last_applied = last_applied.unwrap_or_default(),
                        "Dropping stale result for {}",
                        result.kind()
                    );
                    notify(&current, |l| l.on_finished(request_id));
                    let _ = ack.send(Delivery::Superseded);
                    continue;
                }

                last_applied = Some(request_id);
                let outcome = result.outcome();
                notify(&current, |l| l.on_result(&result));
                notify(&current, |l| l.on_finished(request_id));
                let _ = ack.send(Delivery::Applied(outcome));
            }
        }
    }

    tracing::debug!("delivery channel closed");
}

/// Listener code is not ours; a panic in it must not stop later deliveries.
fn notify(listener: &Option<Arc<dyn QueryListener>>, f: impl FnOnce(&dyn QueryListener)) {
    let Some(listener) = listener else {
        return;
    };
    if catch_unwind(AssertUnwindSafe(|| f(listener.as_ref()))).is_err() {
        tracing::error!("query listener panicked; continuing with later deliveries");
    }
}
