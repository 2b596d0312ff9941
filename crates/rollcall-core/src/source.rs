//! Patient data source trait.

use async_trait::async_trait;

use crate::auth::Session;
use crate::error::Result;
use crate::patient::Patient;

/// The four retrieval operations the coordinator dispatches to.
///
/// Every operation is fallible; the coordinator maps errors to
/// [`crate::query::Outcome::SourceFailure`].
#[async_trait]
pub trait PatientSource: Send + Sync {
    /// Patients that are members of the given cohort.
    async fn fetch_by_cohort(&self, cohort_id: &str) -> Result<Vec<Patient>>;

    /// Every patient in the local cache.
    async fn fetch_all(&self) -> Result<Vec<Patient>>;

    /// Free-text search in the local cache, optionally restricted to a cohort.
    async fn search_local(&self, text: &str, cohort_id: Option<&str>) -> Result<Vec<Patient>>;

    /// Free-text search on the remote server, under an authenticated session.
    async fn search_remote(&self, session: &dyn Session, text: &str) -> Result<Vec<Patient>>;
}
