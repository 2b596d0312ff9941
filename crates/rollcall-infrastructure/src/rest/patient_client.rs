//! Patient search on the remote server.

use rollcall_core::auth::Session;
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::patient::Patient;
use std::time::Duration;

use super::dto::PatientListResponse;
use super::{SESSION_COOKIE, build_client, rest_url};

/// Searches `{server}/ws/rest/v1/patient` under an open session.
pub struct RestPatientClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestPatientClient {
    pub fn new(timeout: Duration, base_url: impl Into<String>) -> Result<Self> {
        let client = build_client(timeout).map_err(|e| RollcallError::remote(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn search(&self, session: &dyn Session, text: &str) -> Result<Vec<Patient>> {
        let response = self
            .client
            .get(rest_url(&self.base_url, "patient"))
            .query(&[("q", text), ("v", "full")])
            .header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE, session.id()),
            )
            .send()
            .await
            .map_err(|e| RollcallError::remote(format!("patient search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RollcallError::remote(format!(
                "patient search returned status {}",
                status.as_u16()
            )));
        }

        let body: PatientListResponse = response
            .json()
            .await
            .map_err(|e| RollcallError::remote(format!("invalid patient search response: {e}")))?;

        Ok(body.results.into_iter().map(Patient::from).collect())
    }
}
