use anyhow::Result;
use rollcall_application::QueryCoordinator;
use rollcall_core::auth::Credentials;
use rollcall_core::config::RollcallConfig;
use rollcall_core::listener::QueryListener;
use rollcall_infrastructure::storage::CredentialStorageError;
use rollcall_infrastructure::{
    ConfigStorage, CredentialStorage, LocalPatientStore, PatientController, RestPatientClient,
    RestSessionGate, RollcallPaths, ServiceType, TomlSearchModeStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::GlobalArgs;

/// Settings resolved from flags, `config.toml` and `credentials.json`.
///
/// Flags win over the config file; the server URL falls back to the one in
/// the credentials file.
pub struct Context {
    pub config: RollcallConfig,
    pub credentials: Credentials,
    pub config_dir: Option<PathBuf>,
    pub patients_path: PathBuf,
    pub server_url: Option<String>,
}

impl Context {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let base = args.config_dir.as_deref();
        let config = ConfigStorage::new(base)?.load()?;

        let credentials = match CredentialStorage::new(base)?.load() {
            Ok(credentials) => credentials,
            Err(CredentialStorageError::NotFound(path)) => {
                tracing::warn!(
                    "No credentials at {}, server search will fail to authenticate",
                    path.display()
                );
                Credentials::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable credentials: {}", e);
                Credentials::default()
            }
        };

        let patients_path = match args
            .patients
            .clone()
            .or_else(|| config.local.patients_file.clone())
        {
            Some(path) => path,
            None => RollcallPaths::new(base).get_path(ServiceType::Patients)?,
        };

        let server_url = resolve_server_url(args, &config, &credentials);

        Ok(Self {
            config,
            credentials,
            config_dir: args.config_dir.clone(),
            patients_path,
            server_url,
        })
    }

    pub fn mode_store(&self) -> Result<TomlSearchModeStore> {
        Ok(TomlSearchModeStore::new(self.config_dir.as_deref())?)
    }

    /// Wires the coordinator; `cohort` falls back to `[search] default_cohort`.
    pub async fn coordinator(
        &self,
        cohort: Option<String>,
        listener: Arc<dyn QueryListener>,
    ) -> Result<QueryCoordinator> {
        let timeout = Duration::from_secs(self.config.server.timeout_secs);

        let local = LocalPatientStore::open(&self.patients_path).await?;
        let remote = self
            .server_url
            .as_deref()
            .map(|url| RestPatientClient::new(timeout, url))
            .transpose()?;
        let source = Arc::new(PatientController::new(local, remote));
        let gate = Arc::new(RestSessionGate::new(timeout, self.server_url.clone())?);

        let mut builder = QueryCoordinator::builder(source, gate, Arc::new(self.mode_store()?))
            .credentials(self.credentials.clone())
            .listener(listener);
        if let Some(cohort) = cohort.or_else(|| self.config.search.default_cohort.clone()) {
            builder = builder.cohort_scope(cohort);
        }

        Ok(builder.build()?)
    }
}

fn resolve_server_url(
    args: &GlobalArgs,
    config: &RollcallConfig,
    credentials: &Credentials,
) -> Option<String> {
    args.server_url
        .clone()
        .or_else(|| config.server.url.clone())
        .or_else(|| {
            Some(credentials.server_url.clone()).filter(|url| !url.trim().is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_url(url: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            server_url: url.map(str::to_string),
            ..GlobalArgs::default()
        }
    }

    #[test]
    fn test_flag_wins_over_config_and_credentials() {
        let mut config = RollcallConfig::default();
        config.server.url = Some("http://config".to_string());
        let credentials = Credentials::new("u", "p", "http://creds");

        assert_eq!(
            resolve_server_url(&args_with_url(Some("http://flag")), &config, &credentials)
                .as_deref(),
            Some("http://flag")
        );
        assert_eq!(
            resolve_server_url(&args_with_url(None), &config, &credentials).as_deref(),
            Some("http://config")
        );
    }

    #[test]
    fn test_credentials_url_is_last_resort() {
        let config = RollcallConfig::default();

        let credentials = Credentials::new("u", "p", "http://creds");
        assert_eq!(
            resolve_server_url(&args_with_url(None), &config, &credentials).as_deref(),
            Some("http://creds")
        );

        let blank = Credentials::new("u", "p", "  ");
        assert_eq!(resolve_server_url(&args_with_url(None), &config, &blank), None);
    }
}
