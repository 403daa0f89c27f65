//! Tool requirements per deployment backend.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing::debug;

/// A required executable and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    pub tool: &'static str,
    pub location: Option<PathBuf>,
}

/// Finds executables by name.
pub trait ToolLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf>;
}

/// Searches `PATH`.
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        which::which(tool).ok()
    }
}

pub fn required_tools(backend: &str) -> Result<&'static [&'static str]> {
    match backend {
        "gke" => Ok(&["gcloud", "docker", "kubectl", "cloud_sql_proxy"]),
        "gae" => Ok(&["gcloud", "cloud_sql_proxy"]),
        other => Err(anyhow!("unknown backend '{other}' (expected 'gke' or 'gae')")),
    }
}

/// Look up every tool `backend` needs.
pub fn check_requirements(backend: &str, locator: &dyn ToolLocator) -> Result<Vec<ToolCheck>> {
    let checks = required_tools(backend)?
        .iter()
        .map(|&tool| {
            let location = locator.locate(tool);
            debug!(tool, found = location.is_some(), "tool lookup");
            ToolCheck { tool, location }
        })
        .collect();
    Ok(checks)
}

/// Names of tools that were not found.
pub fn missing_tools(checks: &[ToolCheck]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|check| check.location.is_none())
        .map(|check| check.tool)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlyGcloud;

    impl ToolLocator for OnlyGcloud {
        fn locate(&self, tool: &str) -> Option<PathBuf> {
            (tool == "gcloud").then(|| PathBuf::from("/usr/bin/gcloud"))
        }
    }

    #[test]
    fn backends_have_expected_tools() {
        assert_eq!(
            required_tools("gae").expect("gae"),
            &["gcloud", "cloud_sql_proxy"]
        );
        assert!(required_tools("gke").expect("gke").contains(&"kubectl"));
        assert!(required_tools("heroku").is_err());
    }

    #[test]
    fn check_reports_unfound_tools() {
        let checks = check_requirements("gke", &OnlyGcloud).expect("gke");
        assert_eq!(checks.len(), 4);
        assert_eq!(
            checks[0].location.as_deref(),
            Some(std::path::Path::new("/usr/bin/gcloud"))
        );
        assert_eq!(
            missing_tools(&checks),
            vec!["docker", "kubectl", "cloud_sql_proxy"]
        );
    }
}
