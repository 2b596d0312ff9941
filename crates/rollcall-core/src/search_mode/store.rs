//! Search mode store trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::search_mode::SearchMode;

/// Persists the mode of the most recent patient search.
///
/// Implementations must have written the value durably by the time `set`
/// returns; callers never rely on a deferred commit.
#[async_trait]
pub trait SearchModeStore: Send + Sync {
    async fn set(&self, mode: SearchMode) -> Result<()>;

    /// Returns the last stored mode, or [`SearchMode::default`] if none was stored.
    async fn get(&self) -> SearchMode;
}
