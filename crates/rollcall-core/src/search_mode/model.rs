use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RollcallError;

/// Namespace (preferences table) the search mode is stored under.
pub const SEARCH_PREF_NAMESPACE: &str = "patient_search_pref";

/// Key the search mode is stored under inside [`SEARCH_PREF_NAMESPACE`].
pub const SEARCH_PREF_KEY: &str = "patient_search_pref_key";

/// Which data source served a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Local patient cache (default when nothing has been recorded yet)
    #[default]
    Local,
    /// Remote server, reached through an authenticated session
    Server,
}

impl SearchMode {
    /// The persisted string value: `"local"` or `"server"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = RollcallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "server" => Ok(Self::Server),
            other => Err(RollcallError::config(format!(
                "unknown search mode '{other}'"
            ))),
        }
    }
}
