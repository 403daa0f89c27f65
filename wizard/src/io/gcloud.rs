//! `gcloud` adapter shared by the cloud service implementations.
//!
//! Every cloud call is a `gcloud ... --format=json` subprocess with a timeout,
//! so we keep a small, explicit wrapper around it.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::core::types::Credentials;
use crate::io::config::GcloudConfig;
use crate::io::process::{CommandOutput, run_command_with_timeout, run_interactive};

/// Environment variable gcloud reads to authenticate every command with a
/// credentials file instead of the active login.
pub const CREDENTIAL_FILE_OVERRIDE_ENV: &str = "CLOUDSDK_AUTH_CREDENTIAL_FILE_OVERRIDE";

/// Stderr fragments gcloud prints when a resource is missing or hidden from
/// the caller.
const NOT_FOUND_MARKERS: [&str; 3] = ["NOT_FOUND", "not found", "or it may not exist"];

/// Wrapper for executing `gcloud` commands, optionally as a specific account
/// or with a specific credentials file.
#[derive(Debug, Clone)]
pub struct Gcloud {
    config: GcloudConfig,
    account: Option<String>,
    credential_file: Option<PathBuf>,
}

impl Gcloud {
    pub fn new(config: GcloudConfig) -> Self {
        Self {
            config,
            account: None,
            credential_file: None,
        }
    }

    /// Authenticate subsequent commands with `credentials`: the known login
    /// account, or else the credentials file itself.
    pub fn with_credentials(mut self, credentials: &Credentials) -> Self {
        match &credentials.account {
            Some(account) => {
                self.account = Some(account.clone());
                self.credential_file = None;
            }
            None => {
                self.account = None;
                self.credential_file = Some(credentials.path.clone());
            }
        }
        self
    }

    /// Run a command and parse its JSON stdout. Non-zero exit is an error.
    #[instrument(skip_all, fields(command = %args.join(" ")))]
    pub fn json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let out = self.run(args, &["--format=json"])?;
        ensure_success(args, &out)?;
        serde_json::from_slice(&out.stdout)
            .with_context(|| format!("parse output of gcloud {}", args.join(" ")))
    }

    /// Run a command and return its trimmed stdout. Non-zero exit is an error.
    pub fn capture(&self, args: &[&str]) -> Result<String> {
        let out = self.run(args, &[])?;
        ensure_success(args, &out)?;
        Ok(out.stdout_text().trim().to_string())
    }

    /// Run a lookup command and report whether the resource exists.
    ///
    /// Only a failure whose stderr says the resource is missing or hidden
    /// counts as `false`; spawn failures, timeouts and any other failure
    /// (expired login, network) are errors carrying gcloud's stderr.
    #[instrument(skip_all, fields(command = %args.join(" ")))]
    pub fn exists(&self, args: &[&str]) -> Result<bool> {
        let out = self.run(args, &["--format=json"])?;
        let stderr = out.stderr_text();
        if !out.timed_out
            && !out.status.success()
            && NOT_FOUND_MARKERS.iter().any(|marker| stderr.contains(marker))
        {
            debug!(stderr = %stderr, "resource not found");
            return Ok(false);
        }
        ensure_success(args, &out)?;
        Ok(true)
    }

    /// Run a command attached to the terminal (login flows).
    pub fn interactive(&self, args: &[&str]) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(args);
        let status = run_interactive(cmd)?;
        if !status.success() {
            return Err(anyhow!(
                "gcloud {} failed with status {:?}",
                args.join(" "),
                status.code()
            ));
        }
        Ok(())
    }

    /// Base command carrying the credentials file override, if any.
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        if let Some(path) = &self.credential_file {
            cmd.env(CREDENTIAL_FILE_OVERRIDE_ENV, path);
        }
        cmd
    }

    fn run(&self, args: &[&str], extra: &[&str]) -> Result<CommandOutput> {
        let mut cmd = self.command();
        cmd.args(args).args(extra);
        if let Some(account) = &self.account {
            cmd.arg(format!("--account={account}"));
        }
        debug!(command = %args.join(" "), "running gcloud");
        run_command_with_timeout(
            cmd,
            None,
            self.config.timeout(),
            self.config.output_limit_bytes,
        )
        .with_context(|| format!("run gcloud {}", args.join(" ")))
    }
}

fn ensure_success(args: &[&str], out: &CommandOutput) -> Result<()> {
    if out.timed_out {
        warn!(command = %args.join(" "), "gcloud timed out");
        return Err(anyhow!("gcloud {} timed out", args.join(" ")));
    }
    if !out.status.success() {
        warn!(command = %args.join(" "), exit_code = ?out.status.code(), "gcloud failed");
        return Err(anyhow!(
            "gcloud {} failed with status {:?}: {}",
            args.join(" "),
            out.status.code(),
            out.stderr_text()
        ));
    }
    Ok(())
}
