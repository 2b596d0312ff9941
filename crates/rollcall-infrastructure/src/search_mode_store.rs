//! TOML-backed search mode store.
//!
//! The mode lives in `search_prefs.toml`:
//!
//! ```toml
//! [patient_search_pref]
//! patient_search_pref_key = "server"
//! ```

use async_trait::async_trait;
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::search_mode::{SearchMode, SearchModeStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::paths::{RollcallPaths, ServiceType};
use crate::storage::AtomicTomlFile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SearchPrefsFile {
    #[serde(default)]
    patient_search_pref: SearchPrefs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SearchPrefs {
    #[serde(
        rename = "patient_search_pref_key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    mode: Option<SearchMode>,
}

/// [`SearchModeStore`] persisted to a TOML file.
///
/// `set` returns only after the file has been atomically replaced. A missing
/// or unreadable file reads as the default mode.
#[derive(Clone)]
pub struct TomlSearchModeStore {
    file: Arc<AtomicTomlFile<SearchPrefsFile>>,
}

impl TomlSearchModeStore {
    /// Store at the default location (`search_prefs.toml` in the config directory).
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = RollcallPaths::new(base_path).get_path(ServiceType::SearchPrefs)?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl SearchModeStore for TomlSearchModeStore {
    async fn set(&self, mode: SearchMode) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            file.update(SearchPrefsFile::default(), |prefs| {
                prefs.patient_search_pref.mode = Some(mode);
            })
        })
        .await
        .map_err(|e| RollcallError::internal(format!("search mode write task failed: {e}")))??;

        tracing::debug!(mode = %mode, "search mode stored");
        Ok(())
    }

    async fn get(&self) -> SearchMode {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load()).await;

        match loaded {
            Ok(Ok(Some(prefs))) => prefs.patient_search_pref.mode.unwrap_or_default(),
            Ok(Ok(None)) => SearchMode::default(),
            Ok(Err(e)) => {
                tracing::warn!("Failed to read search mode, using default: {}", e);
                SearchMode::default()
            }
            Err(e) => {
                tracing::warn!("Search mode read task failed, using default: {}", e);
                SearchMode::default()
            }
        }
    }
}
