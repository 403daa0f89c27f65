//! Console collaborator used by every prompt.
//!
//! The [`Console`] trait is the only way prompts talk to the user. Tests use a
//! scripted console that replays queued answers and records the transcript.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use console::{Term, style};

pub trait Console {
    /// Show `prompt` and read one line (without the trailing newline).
    fn ask(&self, prompt: &str) -> Result<String>;
    /// Show an informational line.
    fn tell(&self, message: &str);
    /// Show an error line.
    fn error(&self, message: &str);
    /// Show `prompt` and read one line without echoing it.
    fn getpass(&self, prompt: &str) -> Result<String>;
}

/// Console backed by the process's terminal.
pub struct TerminalConsole {
    term: Term,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn ask(&self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush().context("flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read answer from stdin")?;
        if read == 0 {
            bail!("stdin closed while waiting for an answer");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn tell(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }

    fn getpass(&self, prompt: &str) -> Result<String> {
        self.term
            .write_str(prompt)
            .context("write password prompt")?;
        self.term.read_secure_line().context("read password")
    }
}
