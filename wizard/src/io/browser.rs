//! Opening pages in the user's browser.

use std::process::Command;

use anyhow::{Result, anyhow};
use tracing::{debug, warn};

use crate::io::process::run_interactive;

pub trait Browser {
    fn open(&self, url: &str) -> Result<()>;
}

/// Hands the URL to the platform opener.
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        debug!(url, "opening browser");
        let status = run_interactive(opener(url))?;
        if !status.success() {
            warn!(url, exit_code = ?status.code(), "browser opener failed");
            return Err(anyhow!("could not open {url} in a browser"));
        }
        Ok(())
    }
}

fn opener(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}
