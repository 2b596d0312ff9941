//! Domain layer for Rollcall.
//!
//! Types and collaborator traits for the dual-mode patient list coordinator:
//! what a request is, what a result looks like, and the contracts of the data
//! source, session gate, search mode store, and listener.

pub mod auth;
pub mod config;
pub mod error;
pub mod listener;
pub mod patient;
pub mod query;
pub mod search_mode;
pub mod source;

// Re-export common types
pub use error::{Result, RollcallError};
pub use listener::QueryListener;
pub use patient::Patient;
pub use query::{Outcome, QueryResult, Request, RequestId, RequestKind};
pub use search_mode::{SearchMode, SearchModeStore};
pub use source::PatientSource;
