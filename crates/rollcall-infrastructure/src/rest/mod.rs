//! Remote patient server over its REST API.
//!
//! - `session_gate`: opens and closes authenticated sessions
//! - `patient_client`: patient search under a session
//! - `dto`: wire representations and their mapping into domain types

mod dto;
mod patient_client;
mod session_gate;

pub use patient_client::RestPatientClient;
pub use session_gate::{RestSession, RestSessionGate};

use std::time::Duration;

const REST_PREFIX: &str = "ws/rest/v1";

/// Name of the session cookie the server issues.
pub(crate) const SESSION_COOKIE: &str = "JSESSIONID";

/// `{base}/ws/rest/v1/{resource}`, tolerant of a trailing slash on `base`.
pub(crate) fn rest_url(base: &str, resource: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), REST_PREFIX, resource)
}

pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}
