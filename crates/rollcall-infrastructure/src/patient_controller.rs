//! The patient data source used by the coordinator.

use async_trait::async_trait;
use rollcall_core::auth::Session;
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::patient::Patient;
use rollcall_core::source::PatientSource;

use crate::local_patient_store::LocalPatientStore;
use crate::rest::RestPatientClient;

/// Local operations go to the patient cache, remote search to the server.
pub struct PatientController {
    local: LocalPatientStore,
    remote: Option<RestPatientClient>,
}

impl PatientController {
    pub fn new(local: LocalPatientStore, remote: Option<RestPatientClient>) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl PatientSource for PatientController {
    async fn fetch_by_cohort(&self, cohort_id: &str) -> Result<Vec<Patient>> {
        let patients = self.local.by_cohort(cohort_id)?;
        tracing::info!("#Patients in the cohort {}: {}", cohort_id, patients.len());
        Ok(patients)
    }

    async fn fetch_all(&self) -> Result<Vec<Patient>> {
        let patients = self.local.all();
        tracing::info!("#All patients: {}", patients.len());
        Ok(patients)
    }

    async fn search_local(&self, text: &str, cohort_id: Option<&str>) -> Result<Vec<Patient>> {
        self.local.search(text, cohort_id)
    }

    async fn search_remote(&self, session: &dyn Session, text: &str) -> Result<Vec<Patient>> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| RollcallError::config("no server configured for remote search"))?;
        remote.search(session, text).await
    }
}
