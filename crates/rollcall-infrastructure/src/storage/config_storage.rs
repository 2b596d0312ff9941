//! Configuration file storage.

use rollcall_core::config::RollcallConfig;
use rollcall_core::error::Result;
use std::path::{Path, PathBuf};

use crate::paths::{RollcallPaths, ServiceType};
use crate::storage::AtomicTomlFile;

/// Loads and saves `config.toml`.
///
/// A missing or empty file yields [`RollcallConfig::default`]; a file that
/// fails to parse is an error rather than a silent default.
pub struct ConfigStorage {
    file: AtomicTomlFile<RollcallConfig>,
}

impl ConfigStorage {
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = RollcallPaths::new(base_path).get_path(ServiceType::Config)?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn load(&self) -> Result<RollcallConfig> {
        let config = self.file.load()?.unwrap_or_default();
        Ok(config)
    }

    pub fn save(&self, config: &RollcallConfig) -> Result<()> {
        self.file.save(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(Some(temp_dir.path())).unwrap();
        assert_eq!(storage.load().unwrap(), RollcallConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(Some(temp_dir.path())).unwrap();

        let mut config = RollcallConfig::default();
        config.server.url = Some("https://clinic.example.org/openmrs".to_string());
        config.search.default_cohort = Some("c-1".to_string());
        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[server\nurl = 1").unwrap();

        let storage = ConfigStorage::with_path(path);
        assert!(storage.load().is_err());
    }
}
