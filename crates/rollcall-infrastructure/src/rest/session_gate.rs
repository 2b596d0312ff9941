//! Session gate for the remote server.

use async_trait::async_trait;
use reqwest::StatusCode;
use rollcall_core::auth::{AuthError, Credentials, Session, SessionGate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::dto::SessionResponse;
use super::{SESSION_COOKIE, build_client, rest_url};

/// Authenticates with HTTP basic auth against `{server}/ws/rest/v1/session`.
///
/// Exactly one request per `authenticate` call. Nothing is held open when
/// authentication fails, so there is nothing to release on that path.
pub struct RestSessionGate {
    client: reqwest::Client,
    /// Overrides the server URL stored with the credentials
    server_url: Option<String>,
}

impl RestSessionGate {
    pub fn new(timeout: Duration, server_url: Option<String>) -> Result<Self, AuthError> {
        let client = build_client(timeout).map_err(|e| AuthError::Unreachable(e.to_string()))?;
        Ok(Self { client, server_url })
    }

    fn base_url<'a>(&'a self, credentials: &'a Credentials) -> &'a str {
        self.server_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&credentials.server_url)
    }
}

#[async_trait]
impl SessionGate for RestSessionGate {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn Session>, AuthError> {
        let base_url = self.base_url(credentials);
        if credentials.username.is_empty() || credentials.password.is_empty() || base_url.is_empty()
        {
            return Err(AuthError::MissingCredentials);
        }

        tracing::debug!(server = base_url, user = %credentials.username, "authenticating");

        let response = self
            .client
            .get(rest_url(base_url, "session"))
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        let session_id = session_id_from(body)?;
        tracing::info!(server = base_url, "remote session opened");

        Ok(Box::new(RestSession {
            id: session_id,
            base_url: base_url.to_string(),
            client: self.client.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

fn session_id_from(body: SessionResponse) -> Result<String, AuthError> {
    if !body.authenticated {
        return Err(AuthError::InvalidCredentials);
    }
    body.session_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AuthError::MalformedResponse("authenticated without a sessionId".into()))
}

/// An open server session, identified by its session cookie.
pub struct RestSession {
    id: String,
    base_url: String,
    client: reqwest::Client,
    closed: AtomicBool,
}

impl RestSession {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Session for RestSession {
    fn id(&self) -> &str {
        &self.id
    }

    /// Marks the session closed and, when a runtime is available, sends a
    /// best-effort logout. Later calls do nothing.
    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime available, skipping remote logout");
            return;
        };

        let request = self
            .client
            .delete(rest_url(&self.base_url, "session"))
            .header(reqwest::header::COOKIE, format!("{}={}", SESSION_COOKIE, self.id));
        handle.spawn(async move {
            if let Err(e) = request.send().await {
                tracing::debug!("remote logout failed: {}", e);
            }
        });
    }
}
