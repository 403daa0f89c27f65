//! Deployment configuration stored inside a generated project
//! (`<project>/.deploy/config.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The project directory does not carry enough information to update it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration file in [{}] does not contain enough information to update a Django project: {reason}", .dir.display())]
pub struct InvalidConfigError {
    pub dir: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectDeployConfig {
    /// Deployment target, `gke` or `gae`.
    pub backend: Option<String>,
}

pub fn deploy_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".deploy").join("config.toml")
}

/// Load the deployment configuration of `project_dir`.
///
/// A missing file is an [`InvalidConfigError`]; so is a file without a backend.
pub fn load_deploy_config(project_dir: &Path) -> Result<ProjectDeployConfig> {
    let path = deploy_config_path(project_dir);
    if !path.is_file() {
        return Err(InvalidConfigError {
            dir: project_dir.to_path_buf(),
            reason: format!("missing {}", path.display()),
        }
        .into());
    }
    let contents = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ProjectDeployConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

/// The configured backend, or an [`InvalidConfigError`] when unset.
pub fn require_backend(project_dir: &Path, cfg: &ProjectDeployConfig) -> Result<String> {
    match cfg.backend.as_deref().map(str::trim) {
        Some(backend) if !backend.is_empty() => Ok(backend.to_string()),
        _ => Err(InvalidConfigError {
            dir: project_dir.to_path_buf(),
            reason: "no backend configured".to_string(),
        }
        .into()),
    }
}
