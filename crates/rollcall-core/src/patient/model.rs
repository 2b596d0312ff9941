//! Patient record as displayed in a patient list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single patient record.
///
/// This is the record type every retrieval operation returns, whether it came
/// from the local cache or from the remote server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Stable patient UUID
    pub uuid: String,
    /// Preferred patient identifier (e.g. medical record number)
    pub identifier: String,
    pub given_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub family_name: String,
    /// Gender code as stored by the server ("M", "F", ...)
    #[serde(default)]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
}

impl Patient {
    /// Full display name: `"Family, Given Middle"`.
    pub fn full_name(&self) -> String {
        let given = [self.given_name.as_str(), self.middle_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}, {}", self.family_name, given)
    }

    pub fn is_male(&self) -> bool {
        self.gender.eq_ignore_ascii_case("M")
    }

    /// Case-insensitive match of `needle` against name parts and identifier.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        [
            &self.identifier,
            &self.given_name,
            &self.middle_name,
            &self.family_name,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}
