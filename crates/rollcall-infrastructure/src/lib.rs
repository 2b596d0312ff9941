//! Infrastructure layer for Rollcall.
//!
//! File-backed stores (configuration, credentials, search mode, patient cache)
//! and the REST client for the remote patient server.

pub mod local_patient_store;
pub mod paths;
pub mod patient_controller;
pub mod rest;
pub mod search_mode_store;
pub mod storage;

pub use crate::local_patient_store::{LocalPatientStore, PatientCache};
pub use crate::patient_controller::PatientController;
pub use crate::paths::{RollcallPaths, ServiceType};
pub use crate::rest::{RestPatientClient, RestSessionGate};
pub use crate::search_mode_store::TomlSearchModeStore;
pub use crate::storage::{ConfigStorage, CredentialStorage};
