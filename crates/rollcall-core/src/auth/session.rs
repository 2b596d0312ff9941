//! Session gate and session lifetime.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::auth::Credentials;

/// Why an authentication attempt did not produce a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable credentials are stored
    #[error("no stored credentials")]
    MissingCredentials,

    /// The server rejected the username/password pair
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server could not be reached
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The server answered with an unexpected HTTP status
    #[error("authentication rejected with status {status}")]
    Rejected { status: u16 },

    /// The server answered, but not in a form we understand
    #[error("malformed authentication response: {0}")]
    MalformedResponse(String),
}

/// A live authenticated channel to the remote server.
///
/// A session belongs to exactly one remote request and is never reused.
pub trait Session: Send + Sync {
    /// Opaque session identifier issued by the server.
    fn id(&self) -> &str;

    /// Releases the session. Must be idempotent.
    fn close(&self);
}

/// Opens sessions on the remote server.
///
/// One attempt per call, no retry. An implementation that fails must release
/// anything it opened before returning the error.
#[async_trait]
pub trait SessionGate: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials)
    -> Result<Box<dyn Session>, AuthError>;
}

/// Owns a session for the duration of one remote request.
///
/// The session is closed exactly once: by [`SessionGuard::close`], or on drop
/// if the owning future returned early, panicked, or was dropped.
pub struct SessionGuard {
    session: Option<Box<dyn Session>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn Session>) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// The guarded session.
    ///
    /// Only `None` after `close`, which consumes the guard, so this always
    /// finds a session.
    pub fn session(&self) -> &dyn Session {
        match self.session.as_deref() {
            Some(session) => session,
            None => unreachable!("session guard used after close"),
        }
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(session_id = session.id(), "closing remote session");
            session.close();
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("session_id", &self.session.as_ref().map(|s| s.id().to_string()))
            .finish()
    }
}
