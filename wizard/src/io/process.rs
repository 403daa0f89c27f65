//! Helpers for running child processes with timeouts and bounded output.

use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.status.success()
    }
}

/// Captured bytes of one output pipe plus the count discarded past the limit.
type Captured = (Vec<u8>, usize);

/// Run `cmd` to completion or until `timeout`, capturing at most
/// `output_limit_bytes` of each output stream.
///
/// Input is fed and both pipes are drained on their own threads, so a chatty
/// child never blocks on a full pipe. Bytes past the limit are drained and
/// counted, not stored.
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs(), output_limit_bytes))]
pub fn run_command_with_timeout(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<CommandOutput> {
    let program = cmd.get_program().to_owned();
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    debug!(?program, "spawning child process");
    let mut child = cmd.spawn().map_err(|err| {
        error!(%err, ?program, "failed to spawn command");
        anyhow::Error::new(err).context(format!("spawn {program:?}"))
    })?;

    let writer = match stdin {
        Some(input) => {
            let mut pipe = child
                .stdin
                .take()
                .ok_or_else(|| anyhow!("stdin was not piped"))?;
            let input = input.to_vec();
            Some(thread::spawn(move || {
                pipe.write_all(&input).context("write stdin")
            }))
        }
        None => None,
    };
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let stdout_reader = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_reader = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let (status, timed_out) = match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => (status, false),
        None => {
            warn!(?program, timeout_secs = timeout.as_secs(), "command timed out, killing");
            child.kill().context("kill command")?;
            (child.wait().context("wait command after kill")?, true)
        }
    };

    if let Some(writer) = writer {
        // A child that exits without reading all of its input closes the
        // pipe; that is not a failure of the command itself.
        if let Err(err) = join_thread(writer)? {
            debug!(%err, "stdin not fully consumed");
        }
    }
    let (stdout, stdout_truncated) = join_thread(stdout_reader)?.context("read stdout")?;
    let (stderr, stderr_truncated) = join_thread(stderr_reader)?.context("read stderr")?;
    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

/// Run a command attached to the user's terminal (for flows that need the
/// user, such as a browser login). Only the exit status is observed.
#[instrument(skip_all)]
pub fn run_interactive(mut cmd: Command) -> Result<ExitStatus> {
    debug!(program = ?cmd.get_program(), "running interactive command");
    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("run {:?}", cmd.get_program()))?;
    debug!(exit_code = ?status.code(), "interactive command finished");
    Ok(status)
}

fn join_thread<T>(handle: thread::JoinHandle<T>) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow!("process pipe thread panicked"))
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<Captured> {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Ok((kept, dropped));
        }
        let take = n.min(limit.saturating_sub(kept.len()));
        kept.extend_from_slice(&chunk[..take]);
        dropped += n - take;
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_status() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("printf hello; exit 3");
        let out = run_command_with_timeout(cmd, None, Duration::from_secs(10), 1024)
            .expect("run sh");
        assert_eq!(out.stdout_text(), "hello");
        assert_eq!(out.status.code(), Some(3));
        assert!(!out.succeeded());
    }

    #[test]
    fn truncates_beyond_limit() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("printf 0123456789");
        let out =
            run_command_with_timeout(cmd, None, Duration::from_secs(10), 4).expect("run sh");
        assert_eq!(out.stdout, b"0123");
        assert_eq!(out.stdout_truncated, 6);
    }

    #[test]
    fn feeds_stdin() {
        let cmd = Command::new("cat");
        let out = run_command_with_timeout(cmd, Some(b"{\"a\":1}"), Duration::from_secs(10), 1024)
            .expect("run cat");
        assert!(out.succeeded());
        assert_eq!(out.stdout_text(), "{\"a\":1}");
    }
}
