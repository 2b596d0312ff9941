//! Search mode domain module.
//!
//! Tracks which data source (local cache or remote server) served the most
//! recent patient search.
//!
//! - `model`: the [`SearchMode`] value and its persisted key names
//! - `store`: repository trait for persisting the last used mode

mod model;
mod store;

pub use model::{SEARCH_PREF_KEY, SEARCH_PREF_NAMESPACE, SearchMode};
pub use store::SearchModeStore;
