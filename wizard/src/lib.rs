//! Interactive parameter wizard for deploying Django projects to Google Cloud.
//!
//! The wizard collects every deployment parameter (credentials, project,
//! billing, passwords, directory and Django settings), accepting values
//! supplied on the command line and prompting for the rest. The architecture
//! keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (parameter keys, answer snapshots,
//!   validation rules, defaults). No I/O.
//! - **[`io`]**: Side-effecting operations (terminal, `gcloud`, browser,
//!   process execution, config files). Each sits behind a trait so tests can
//!   substitute fakes.
//! - **[`prompt`]**: Prompt primitives and one prompter per parameter, built
//!   on top of `core` and the `io` traits.
//!
//! Orchestration modules ([`wizard`], [`update`]) sequence the prompters and
//! hand the collected parameters to a deployment workflow.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod prompt;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod update;
pub mod wizard;
