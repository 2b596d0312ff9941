use anyhow::Result;
use rollcall_core::search_mode::SearchModeStore;

use super::context::Context;

/// `rollcall mode`
pub async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.mode_store()?;
    let mode = store.get().await;
    println!("{mode}");
    tracing::debug!("search mode read from {}", store.path().display());
    Ok(())
}
