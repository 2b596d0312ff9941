//! Configuration model, loaded from `config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default timeout for remote calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RollcallConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Server base URL; overrides the URL stored with the credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct LocalConfig {
    /// Patient cache file; defaults to `patients.json` in the config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patients_file: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SearchConfig {
    /// Cohort that scopes listing and local search when none is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cohort: Option<String>,
}
