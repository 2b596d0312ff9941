//! Query domain module.
//!
//! Requests submitted to the coordinator and the results it delivers.

mod model;

pub use model::{Outcome, QueryResult, Request, RequestId, RequestKind};
