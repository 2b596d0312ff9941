//! Local patient cache backed by a JSON file.
//!
//! ```json
//! {
//!   "patients": [ { "uuid": "...", "identifier": "...", ... } ],
//!   "cohorts": { "cohort-uuid": ["patient-uuid", "..."] }
//! }
//! ```

use rollcall_core::error::{Result, RollcallError};
use rollcall_core::patient::Patient;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Contents of the patient cache file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientCache {
    #[serde(default)]
    pub patients: Vec<Patient>,
    /// Cohort id -> member patient uuids
    #[serde(default)]
    pub cohorts: HashMap<String, Vec<String>>,
}

/// Read-only, in-memory view of the local patient cache.
///
/// Results keep the order of the cache file.
#[derive(Debug, Clone, Default)]
pub struct LocalPatientStore {
    cache: PatientCache,
}

impl LocalPatientStore {
    pub fn new(cache: PatientCache) -> Self {
        Self { cache }
    }

    /// Loads the cache file. A missing file is an empty cache.
    pub async fn open(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No patient cache at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let cache: PatientCache = serde_json::from_str(&content).map_err(|e| {
            RollcallError::data_access(format!(
                "invalid patient cache {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::info!(
            patients = cache.patients.len(),
            cohorts = cache.cohorts.len(),
            "Loaded patient cache from {}",
            path.display()
        );
        Ok(Self { cache })
    }

    pub fn len(&self) -> usize {
        self.cache.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.patients.is_empty()
    }

    pub fn all(&self) -> Vec<Patient> {
        self.cache.patients.clone()
    }

    /// Members of `cohort_id`; an unknown cohort is `NotFound`.
    pub fn by_cohort(&self, cohort_id: &str) -> Result<Vec<Patient>> {
        let members = self.members(cohort_id)?;
        Ok(self
            .cache
            .patients
            .iter()
            .filter(|p| members.contains(p.uuid.as_str()))
            .cloned()
            .collect())
    }

    /// Case-insensitive search; every whitespace-separated term must match
    /// the identifier or a name part. Blank text matches everything in scope.
    pub fn search(&self, text: &str, cohort_id: Option<&str>) -> Result<Vec<Patient>> {
        let terms: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        let members = cohort_id.map(|id| self.members(id)).transpose()?;

        Ok(self
            .cache
            .patients
            .iter()
            .filter(|p| {
                members
                    .as_ref()
                    .is_none_or(|m| m.contains(p.uuid.as_str()))
            })
            .filter(|p| terms.iter().all(|term| p.matches_lowercase(term)))
            .cloned()
            .collect())
    }

    fn members(&self, cohort_id: &str) -> Result<HashSet<&str>> {
        self.cache
            .cohorts
            .get(cohort_id)
            .map(|uuids| uuids.iter().map(String::as_str).collect())
            .ok_or_else(|| RollcallError::not_found("cohort", cohort_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patient(uuid: &str, given: &str, family: &str) -> Patient {
        Patient {
            uuid: uuid.to_string(),
            identifier: format!("MRN-{uuid}"),
            given_name: given.to_string(),
            middle_name: String::new(),
            family_name: family.to_string(),
            gender: "M".to_string(),
            birthdate: None,
        }
    }

    fn store() -> LocalPatientStore {
        let mut cohorts = HashMap::new();
        cohorts.insert("c-1".to_string(), vec!["p1".to_string(), "p3".to_string()]);
        cohorts.insert("c-empty".to_string(), Vec::new());
        LocalPatientStore::new(PatientCache {
            patients: vec![
                patient("p1", "John", "Doe"),
                patient("p2", "Johnny", "Walker"),
                patient("p3", "Mary", "Johnson"),
            ],
            cohorts,
        })
    }

    fn uuids(patients: &[Patient]) -> Vec<&str> {
        patients.iter().map(|p| p.uuid.as_str()).collect()
    }

    #[test]
    fn test_all_keeps_file_order() {
        assert_eq!(uuids(&store().all()), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_by_cohort() {
        let s = store();
        assert_eq!(uuids(&s.by_cohort("c-1").unwrap()), vec!["p1", "p3"]);
        assert!(s.by_cohort("c-empty").unwrap().is_empty());
        assert!(s.by_cohort("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let s = store();
        assert_eq!(uuids(&s.search("JOHN", None).unwrap()), vec!["p1", "p2", "p3"]);
        assert_eq!(uuids(&s.search("john doe", None).unwrap()), vec!["p1"]);
    }

    #[test]
    fn test_search_within_cohort() {
        let s = store();
        assert_eq!(uuids(&s.search("john", Some("c-1")).unwrap()), vec!["p1", "p3"]);
        assert!(s.search("john", Some("missing")).is_err());
    }

    #[test]
    fn test_search_zero_matches_is_ok() {
        assert!(store().search("zebra", None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let s = LocalPatientStore::open(&temp_dir.path().join("patients.json"))
            .await
            .unwrap();
        assert!(s.is_empty());
    }

    #[tokio::test]
    async fn test_open_reads_cache_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("patients.json");
        let cache = store().cache;
        std::fs::write(&path, serde_json::to_string(&cache).unwrap()).unwrap();

        let s = LocalPatientStore::open(&path).await.unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(uuids(&s.by_cohort("c-1").unwrap()), vec!["p1", "p3"]);
    }

    #[tokio::test]
    async fn test_open_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("patients.json");
        std::fs::write(&path, "[not a cache").unwrap();
        let err = LocalPatientStore::open(&path).await.unwrap_err();
        assert!(matches!(err, RollcallError::DataAccess(ref msg) if msg.contains("patients.json")));
    }
}
