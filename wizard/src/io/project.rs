//! Project service: project lookup and existence checks.

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::io::gcloud::Gcloud;

/// Project metadata as returned by `gcloud projects describe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_id: String,
    pub name: String,
}

pub trait ProjectService {
    fn get_project(&self, project_id: &str) -> Result<ProjectInfo>;
    fn project_exists(&self, project_id: &str) -> Result<bool>;
}

pub struct GcloudProjectService {
    gcloud: Gcloud,
}

impl GcloudProjectService {
    pub fn new(gcloud: Gcloud) -> Self {
        Self { gcloud }
    }
}

impl ProjectService for GcloudProjectService {
    #[instrument(skip(self))]
    fn get_project(&self, project_id: &str) -> Result<ProjectInfo> {
        self.gcloud.json(&["projects", "describe", project_id])
    }

    #[instrument(skip(self))]
    fn project_exists(&self, project_id: &str) -> Result<bool> {
        let exists = self.gcloud.exists(&["projects", "describe", project_id])?;
        debug!(exists, "project lookup");
        Ok(exists)
    }
}
