use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials used to open a session on the remote server.
///
/// The password is never printed: `Debug` redacts it so credentials can
/// travel through `tracing` fields safely.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Base URL of the server, e.g. `https://clinic.example.org/openmrs`
    pub server_url: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            server_url: server_url.into(),
        }
    }

    /// All three fields are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.server_url.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server_url", &self.server_url)
            .finish()
    }
}
