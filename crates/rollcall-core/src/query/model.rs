//! Request and result models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::patient::Patient;
use crate::search_mode::SearchMode;

/// Sequence number assigned to a request at submission.
///
/// Strictly increasing per coordinator; a larger id always means a later submit.
pub type RequestId = u64;

/// What a request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "criteria", rename_all = "snake_case")]
pub enum RequestKind {
    /// All patients that are members of a cohort
    ByCohort(String),
    /// Every patient in the local cache
    AllRecords,
    /// Free-text search against the local cache
    LocalSearch(String),
    /// Free-text search against the remote server
    RemoteSearch(String),
}

impl RequestKind {
    /// Mode recorded for this kind, if it is a search.
    ///
    /// Listing operations (`ByCohort`, `AllRecords`) are not searches and
    /// never touch the stored search mode.
    pub fn mode(&self) -> Option<SearchMode> {
        match self {
            Self::LocalSearch(_) => Some(SearchMode::Local),
            Self::RemoteSearch(_) => Some(SearchMode::Server),
            Self::ByCohort(_) | Self::AllRecords => None,
        }
    }

    pub fn is_search(&self) -> bool {
        self.mode().is_some()
    }

    /// The criteria string, for logging.
    pub fn criteria(&self) -> &str {
        match self {
            Self::ByCohort(id) => id,
            Self::AllRecords => "*",
            Self::LocalSearch(text) | Self::RemoteSearch(text) => text,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByCohort(id) => write!(f, "cohort '{id}'"),
            Self::AllRecords => f.write_str("all patients"),
            Self::LocalSearch(text) => write!(f, "local search '{text}'"),
            Self::RemoteSearch(text) => write!(f, "server search '{text}'"),
        }
    }
}

/// An immutable request, created once per submission.
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    kind: RequestKind,
    submitted_at: Instant,
    submitted_wall: DateTime<Utc>,
}

impl Request {
    /// Creates a request stamped with the current monotonic and wall-clock time.
    pub fn new(id: RequestId, kind: RequestKind) -> Self {
        Self {
            id,
            kind,
            submitted_at: Instant::now(),
            submitted_wall: Utc::now(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub fn submitted_wall(&self) -> DateTime<Utc> {
        self.submitted_wall
    }

    /// Milliseconds since submission, from the monotonic clock.
    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.submitted_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Classification of a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    /// Local or remote retrieval raised an error
    SourceFailure,
    /// Authentication against the remote server did not succeed
    AuthFailure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// The snapshot delivered to a listener for one completed request.
///
/// A failed result never carries records; use [`QueryResult::success`] or
/// [`QueryResult::failed`] to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    request_id: RequestId,
    kind: RequestKind,
    records: Vec<Patient>,
    outcome: Outcome,
    elapsed_millis: u64,
}

impl QueryResult {
    pub fn success(request: &Request, records: Vec<Patient>) -> Self {
        Self {
            request_id: request.id(),
            kind: request.kind().clone(),
            records,
            outcome: Outcome::Success,
            elapsed_millis: request.elapsed_millis(),
        }
    }

    /// Builds a failed result with an empty record list.
    ///
    /// Passing [`Outcome::Success`] here is a programming error and is
    /// downgraded to [`Outcome::SourceFailure`].
    pub fn failed(request: &Request, outcome: Outcome) -> Self {
        let outcome = match outcome {
            Outcome::Success => Outcome::SourceFailure,
            other => other,
        };
        Self {
            request_id: request.id(),
            kind: request.kind().clone(),
            records: Vec::new(),
            outcome,
            elapsed_millis: request.elapsed_millis(),
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub fn records(&self) -> &[Patient] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Patient> {
        self.records
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(uuid: &str) -> Patient {
        Patient {
            uuid: uuid.to_string(),
            identifier: format!("ID-{uuid}"),
            given_name: "A".to_string(),
            middle_name: String::new(),
            family_name: "B".to_string(),
            gender: "F".to_string(),
            birthdate: None,
        }
    }

    #[test]
    fn test_mode_only_for_search_kinds() {
        assert_eq!(
            RequestKind::LocalSearch("x".into()).mode(),
            Some(SearchMode::Local)
        );
        assert_eq!(
            RequestKind::RemoteSearch("x".into()).mode(),
            Some(SearchMode::Server)
        );
        assert_eq!(RequestKind::AllRecords.mode(), None);
        assert!(!RequestKind::ByCohort("c".into()).is_search());
    }

    #[test]
    fn test_success_keeps_records() {
        let request = Request::new(7, RequestKind::AllRecords);
        let result = QueryResult::success(&request, vec![patient("a"), patient("b")]);
        assert_eq!(result.request_id(), 7);
        assert_eq!(result.outcome(), Outcome::Success);
        assert_eq!(result.records().len(), 2);
    }

    #[test]
    fn test_failed_result_is_empty() {
        let request = Request::new(1, RequestKind::RemoteSearch("john".into()));
        let result = QueryResult::failed(&request, Outcome::AuthFailure);
        assert!(result.records().is_empty());
        assert_eq!(result.outcome(), Outcome::AuthFailure);
        assert_eq!(result.kind(), &RequestKind::RemoteSearch("john".into()));
    }

    #[test]
    fn test_failed_never_reports_success() {
        let request = Request::new(1, RequestKind::AllRecords);
        let result = QueryResult::failed(&request, Outcome::Success);
        assert_eq!(result.outcome(), Outcome::SourceFailure);
    }

    #[test]
    fn test_criteria_for_logging() {
        assert_eq!(RequestKind::AllRecords.criteria(), "*");
        assert_eq!(RequestKind::ByCohort("c-1".into()).criteria(), "c-1");
        assert_eq!(
            RequestKind::LocalSearch("john".into()).to_string(),
            "local search 'john'"
        );
    }
}
