//! Fixed-interval polling with an optional deadline and cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::debug;

/// Shared flag that stops a running poll at its next check.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Total time spent waiting between checks before giving up. `None` waits
    /// forever.
    pub timeout: Option<Duration>,
}

impl PollSettings {
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self { interval, timeout }
    }
}

/// Run `check` until it yields a value, sleeping `settings.interval` between
/// attempts.
///
/// The deadline counts sleep time only, so a slow `check` does not shorten
/// the wait. Errors from `check` end the poll immediately.
pub fn poll_until<T>(
    settings: PollSettings,
    cancel: &CancelToken,
    mut check: impl FnMut() -> Result<Option<T>>,
) -> Result<T> {
    let mut waited = Duration::ZERO;
    let mut attempts: u64 = 0;
    loop {
        if cancel.is_cancelled() {
            bail!("stopped waiting after {attempts} checks: cancelled");
        }
        attempts += 1;
        if let Some(value) = check()? {
            debug!(attempts, "poll satisfied");
            return Ok(value);
        }
        if let Some(timeout) = settings.timeout
            && waited >= timeout
        {
            bail!(
                "gave up after waiting {}s ({attempts} checks)",
                waited.as_secs()
            );
        }
        thread::sleep(settings.interval);
        waited += settings.interval;
    }
}
