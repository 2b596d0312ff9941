//! Wire representations of the server's session and patient resources.

use chrono::NaiveDate;
use rollcall_core::patient::Patient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub authenticated: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PatientListResponse {
    #[serde(default)]
    pub results: Vec<RestPatient>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestPatient {
    pub uuid: String,
    #[serde(default)]
    pub identifiers: Vec<RestIdentifier>,
    pub person: RestPerson,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestIdentifier {
    pub identifier: String,
    #[serde(default)]
    pub preferred: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RestPerson {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub preferred_name: Option<RestName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RestName {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

impl From<RestPatient> for Patient {
    fn from(rest: RestPatient) -> Self {
        let identifier = rest
            .identifiers
            .iter()
            .find(|id| id.preferred)
            .or_else(|| rest.identifiers.first())
            .map(|id| id.identifier.clone())
            .unwrap_or_default();

        let (given_name, middle_name, family_name) = match rest.person.preferred_name {
            Some(name) => (
                name.given_name.unwrap_or_default(),
                name.middle_name.unwrap_or_default(),
                name.family_name.unwrap_or_default(),
            ),
            None => Default::default(),
        };

        Patient {
            uuid: rest.uuid,
            identifier,
            given_name,
            middle_name,
            family_name,
            gender: rest.person.gender.unwrap_or_default(),
            birthdate: rest.person.birthdate.as_deref().and_then(parse_birthdate),
        }
    }
}

/// Accepts `yyyy-mm-dd` with or without a trailing time component.
fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
