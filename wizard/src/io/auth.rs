//! Auth service: active account lookup and application-default credentials.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::core::types::Credentials;
use crate::io::gcloud::Gcloud;

const ADC_FILE_NAME: &str = "application_default_credentials.json";

pub trait AuthService {
    /// Account `gcloud` is currently logged in as, if any.
    fn get_active_account(&self) -> Result<Option<String>>;
    /// Run a fresh interactive login and return the new credentials.
    fn create_default_credentials(&self) -> Result<Credentials>;
    /// Credentials from a previous login.
    fn get_default_credentials(&self) -> Result<Credentials>;
}

pub struct GcloudAuthService {
    gcloud: Gcloud,
}

impl GcloudAuthService {
    pub fn new(gcloud: Gcloud) -> Self {
        Self { gcloud }
    }
}

impl AuthService for GcloudAuthService {
    #[instrument(skip_all)]
    fn get_active_account(&self) -> Result<Option<String>> {
        let out = self.gcloud.capture(&[
            "auth",
            "list",
            "--filter=status:ACTIVE",
            "--format=value(account)",
        ])?;
        let account = out.lines().map(str::trim).find(|line| !line.is_empty());
        debug!(active = account.is_some(), "active account lookup");
        Ok(account.map(str::to_string))
    }

    #[instrument(skip_all)]
    fn create_default_credentials(&self) -> Result<Credentials> {
        info!("starting interactive application-default login");
        self.gcloud
            .interactive(&["auth", "application-default", "login"])
            .context("application-default login")?;
        self.get_default_credentials()
    }

    #[instrument(skip_all)]
    fn get_default_credentials(&self) -> Result<Credentials> {
        let path = application_default_credentials_path()
            .ok_or_else(|| anyhow!("cannot locate the gcloud configuration directory"))?;
        if !path.is_file() {
            return Err(anyhow!(
                "no application default credentials at {} (run `gcloud auth application-default login`)",
                path.display()
            ));
        }
        let account = self.get_active_account()?;
        Ok(Credentials { path, account })
    }
}

/// `$CLOUDSDK_CONFIG`, else the platform's gcloud configuration directory.
fn gcloud_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("CLOUDSDK_CONFIG") {
        return Some(PathBuf::from(dir));
    }
    if cfg!(windows) {
        dirs::config_dir().map(|dir| dir.join("gcloud"))
    } else {
        dirs::home_dir().map(|home| home.join(".config").join("gcloud"))
    }
}

pub fn application_default_credentials_path() -> Option<PathBuf> {
    gcloud_config_dir().map(|dir| dir.join(ADC_FILE_NAME))
}
