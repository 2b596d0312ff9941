use anyhow::Result;
use rollcall_application::{Delivery, PatientListView, QueryHandle};
use std::sync::Arc;
use std::time::Instant;

use super::context::Context;
use super::render;

/// `rollcall list`
pub async fn list(ctx: &Context, cohort: Option<String>) -> Result<()> {
    let view = Arc::new(PatientListView::new());
    let coordinator = ctx.coordinator(cohort, view.clone()).await?;

    let started = Instant::now();
    let handle = coordinator.reload();
    finish(handle, &view, started).await;
    Ok(())
}

/// `rollcall search`
pub async fn search(
    ctx: &Context,
    text: String,
    server: bool,
    cohort: Option<String>,
) -> Result<()> {
    let view = Arc::new(PatientListView::new());
    let coordinator = ctx.coordinator(cohort, view.clone()).await?;

    let started = Instant::now();
    let handle = if server {
        coordinator.search_on_server(text)
    } else {
        coordinator.search(text)
    };
    finish(handle, &view, started).await;
    Ok(())
}

async fn finish(handle: QueryHandle, view: &PatientListView, started: Instant) {
    let request_id = handle.request_id();
    match handle.delivered().await {
        Delivery::Applied(outcome) => {
            tracing::debug!(request_id, ?outcome, "result applied");
        }
        other => tracing::warn!(request_id, ?other, "result was not applied"),
    }

    let mut out = std::io::stdout().lock();
    if let Err(e) = render::write_snapshot(&mut out, &view.snapshot(), started.elapsed()) {
        tracing::error!("Failed to write patient list: {}", e);
    }
}
