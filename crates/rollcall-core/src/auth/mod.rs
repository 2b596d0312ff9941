//! Authentication against the remote patient server.
//!
//! - `credentials`: stored server credentials
//! - `session`: the session gate, sessions, and the scope guard that releases them

mod credentials;
mod session;

pub use credentials::Credentials;
pub use session::{AuthError, Session, SessionGate, SessionGuard};
