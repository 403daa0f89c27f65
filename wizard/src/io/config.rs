//! Wizard configuration stored in `<config dir>/django-deploy/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CONFIG_DIR_NAME: &str = "django-deploy";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Wizard configuration (TOML).
///
/// Every field has a default, so an absent file or a partial file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WizardConfig {
    pub gcloud: GcloudConfig,
    pub billing: BillingConfig,
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GcloudConfig {
    /// Executable used for every cloud service call.
    pub binary: String,

    /// Per-call wall-clock limit in seconds.
    pub timeout_secs: u64,

    /// Captured stdout/stderr beyond this many bytes is discarded.
    pub output_limit_bytes: usize,
}

impl Default for GcloudConfig {
    fn default() -> Self {
        Self {
            binary: "gcloud".to_string(),
            timeout_secs: 120,
            output_limit_bytes: 1_000_000,
        }
    }
}

impl GcloudConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BillingConfig {
    /// Page opened in the browser when the user creates a billing account.
    pub create_url: String,

    /// Seconds between billing-account polls while waiting for a new account.
    pub poll_interval_secs: u64,

    /// Give up waiting for a new billing account after this many seconds.
    /// Unset means wait until interrupted.
    pub poll_timeout_secs: Option<u64>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            create_url: "https://console.cloud.google.com/billing/create".to_string(),
            poll_interval_secs: 2,
            poll_timeout_secs: None,
        }
    }
}

impl BillingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Command that performs the deployment. Receives the collected
    /// parameters as JSON on stdin.
    pub command: Vec<String>,
}

impl WizardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.gcloud.binary.trim().is_empty() {
            return Err(anyhow!("gcloud.binary must be non-empty"));
        }
        if self.gcloud.timeout_secs == 0 {
            return Err(anyhow!("gcloud.timeout_secs must be > 0"));
        }
        if self.gcloud.output_limit_bytes == 0 {
            return Err(anyhow!("gcloud.output_limit_bytes must be > 0"));
        }
        if self.billing.poll_interval_secs == 0 {
            return Err(anyhow!("billing.poll_interval_secs must be > 0"));
        }
        if self.billing.poll_timeout_secs == Some(0) {
            return Err(anyhow!("billing.poll_timeout_secs must be > 0 when set"));
        }
        if let Some(program) = self.workflow.command.first()
            && program.trim().is_empty()
        {
            return Err(anyhow!("workflow.command must start with a program"));
        }
        Ok(())
    }
}

/// Location used when `--config` is not given.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `WizardConfig::default()`.
pub fn load_config(path: &Path) -> Result<WizardConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        let cfg = WizardConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WizardConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Resolve `--config` against the default location and load it.
pub fn load_config_or_default(explicit: Option<&Path>) -> Result<WizardConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => match default_config_path() {
            Some(path) => load_config(&path),
            None => Ok(WizardConfig::default()),
        },
    }
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &WizardConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, WizardConfig::default());
        assert_eq!(cfg.billing.poll_interval(), Duration::from_secs(2));
        assert_eq!(cfg.billing.poll_timeout(), None);
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.toml");
        let cfg = WizardConfig {
            billing: BillingConfig {
                poll_timeout_secs: Some(600),
                ..BillingConfig::default()
            },
            workflow: WorkflowConfig {
                command: vec!["deploy-django".to_string(), "--verbose".to_string()],
            },
            ..WizardConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[gcloud]\ntimeout_secs = 30\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.gcloud.timeout_secs, 30);
        assert_eq!(cfg.gcloud.binary, "gcloud");
        assert_eq!(cfg.billing, BillingConfig::default());
    }

    #[test]
    fn rejects_zero_timeout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[gcloud]\ntimeout_secs = 0\n").expect("write");
        let err = load_config(&path).expect_err("zero timeout rejected");
        assert!(format!("{err:#}").contains("gcloud.timeout_secs must be > 0"));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[billing]\npoll_interval_secs = 0\npoll_timeout_secs = 1\n",
        )
        .expect("write");
        let err = load_config(&path).expect_err("zero interval rejected");
        assert!(format!("{err:#}").contains("billing.poll_interval_secs must be > 0"));
    }
}
