//! Server credentials file storage.
//!
//! Loads [`Credentials`] from `credentials.json` in the config directory.

use rollcall_core::RollcallError;
use rollcall_core::auth::Credentials;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::{PathError, RollcallPaths, ServiceType};

/// Errors that can occur while loading credentials.
#[derive(Debug)]
pub enum CredentialStorageError {
    /// Credentials file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for CredentialStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialStorageError::NotFound(path) => {
                write!(f, "Credentials file not found at: {}", path.display())
            }
            CredentialStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            CredentialStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            CredentialStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine config directory")
            }
        }
    }
}

impl std::error::Error for CredentialStorageError {}

impl From<std::io::Error> for CredentialStorageError {
    fn from(e: std::io::Error) -> Self {
        CredentialStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for CredentialStorageError {
    fn from(e: serde_json::Error) -> Self {
        CredentialStorageError::ParseError(e)
    }
}

impl From<PathError> for CredentialStorageError {
    fn from(_: PathError) -> Self {
        CredentialStorageError::ConfigDirNotFound
    }
}

impl From<CredentialStorageError> for RollcallError {
    fn from(e: CredentialStorageError) -> Self {
        match e {
            CredentialStorageError::NotFound(path) => {
                RollcallError::not_found("credentials", path.display().to_string())
            }
            other => RollcallError::Security(other.to_string()),
        }
    }
}

/// Read-only storage for `credentials.json`.
///
/// The file should be readable by the owning user only (mode 600); error
/// messages never include its contents.
pub struct CredentialStorage {
    path: PathBuf,
}

impl CredentialStorage {
    pub fn new(base_path: Option<&Path>) -> Result<Self, CredentialStorageError> {
        let path = RollcallPaths::new(base_path).get_path(ServiceType::Credentials)?;
        Ok(Self { path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Credentials, CredentialStorageError> {
        if !self.path.exists() {
            return Err(CredentialStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let credentials = serde_json::from_str(&content)?;

        Ok(credentials)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
