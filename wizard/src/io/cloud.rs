//! Building the credential-scoped cloud services.
//!
//! The project and billing services can only be created once credentials are
//! resolved, so the wizard receives a [`Connector`] rather than the services.

use anyhow::Result;

use crate::core::types::Credentials;
use crate::io::billing::{BillingService, GcloudBillingService};
use crate::io::config::GcloudConfig;
use crate::io::gcloud::Gcloud;
use crate::io::project::{GcloudProjectService, ProjectService};

/// Services bound to one set of credentials.
pub struct CloudServices {
    pub project: Box<dyn ProjectService>,
    pub billing: Box<dyn BillingService>,
}

pub trait Connector {
    fn connect(&self, credentials: &Credentials) -> Result<CloudServices>;
}

pub struct GcloudConnector {
    config: GcloudConfig,
}

impl GcloudConnector {
    pub fn new(config: GcloudConfig) -> Self {
        Self { config }
    }
}

impl Connector for GcloudConnector {
    fn connect(&self, credentials: &Credentials) -> Result<CloudServices> {
        let gcloud = Gcloud::new(self.config.clone()).with_credentials(credentials);
        Ok(CloudServices {
            project: Box::new(GcloudProjectService::new(gcloud.clone())),
            billing: Box::new(GcloudBillingService::new(gcloud)),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    #[test]
    fn file_credentials_scope_project_lookups() {
        let temp = tempfile::tempdir().expect("tempdir");
        let script = temp.path().join("fake-gcloud");
        // Echoes the project id (`$3`) and the credentials file it was given.
        fs::write(
            &script,
            "#!/bin/sh\nprintf '{\"projectId\":\"%s\",\"name\":\"%s\"}' \"$3\" \"$CLOUDSDK_AUTH_CREDENTIAL_FILE_OVERRIDE\"\n",
        )
        .expect("write script");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
        let config = GcloudConfig {
            binary: script.display().to_string(),
            ..GcloudConfig::default()
        };

        let services = GcloudConnector::new(config)
            .connect(&Credentials::from_file("/srv/keys/service-account.json"))
            .expect("connect");
        let project = services.project.get_project("shop-project").expect("describe");

        assert_eq!(project.project_id, "shop-project");
        assert_eq!(project.name, "/srv/keys/service-account.json");
    }
}
