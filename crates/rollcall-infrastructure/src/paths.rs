//! Unified path management for rollcall files.
//!
//! ```text
//! ~/.config/rollcall/          # Config directory (platform config dir)
//! ├── config.toml              # Application configuration
//! ├── credentials.json         # Server credentials
//! ├── search_prefs.toml        # Last used search mode
//! └── patients.json            # Local patient cache
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for rollcall_core::RollcallError {
    fn from(e: PathError) -> Self {
        rollcall_core::RollcallError::config(e.to_string())
    }
}

/// The files rollcall keeps in its config directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Credentials,
    SearchPrefs,
    Patients,
}

impl ServiceType {
    fn file_name(&self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::Credentials => "credentials.json",
            ServiceType::SearchPrefs => "search_prefs.toml",
            ServiceType::Patients => "patients.json",
        }
    }
}

/// Resolves rollcall file locations.
///
/// With a base path every file lives directly under it (tests, `--config-dir`);
/// otherwise under `<platform config dir>/rollcall`.
#[derive(Debug, Clone, Default)]
pub struct RollcallPaths {
    base: Option<PathBuf>,
}

impl RollcallPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("rollcall"))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(service.file_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_override() {
        let paths = RollcallPaths::new(Some(Path::new("/tmp/rollcall-test")));
        assert_eq!(
            paths.get_path(ServiceType::SearchPrefs).unwrap(),
            PathBuf::from("/tmp/rollcall-test/search_prefs.toml")
        );
        assert_eq!(
            paths.get_path(ServiceType::Credentials).unwrap(),
            PathBuf::from("/tmp/rollcall-test/credentials.json")
        );
    }

    #[test]
    fn test_default_dir_ends_with_rollcall() {
        let paths = RollcallPaths::default();
        if let Ok(dir) = paths.config_dir() {
            assert!(dir.ends_with("rollcall"));
        }
    }
}
