//! `django-deploy update`: refresh an already-deployed project.
//!
//! Flag values are validated up front and any failure ends the command. Only
//! the keys that were not supplied are prompted for, numbered over the
//! remaining count.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, instrument, warn};

use crate::core::answers::Answers;
use crate::core::keys::{ParamKey, UPDATE_ORDER};
use crate::core::step::Step;
use crate::core::types::Credentials;
use crate::io::auth::AuthService;
use crate::io::console::Console;
use crate::io::deploy_config::{InvalidConfigError, load_deploy_config, require_backend};
use crate::io::requirements::{ToolLocator, check_requirements, missing_tools};
use crate::io::workflow::{UpdateParameters, Workflow};
use crate::prompt::prompter::Prompter;

/// Structured update outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The workflow updated the project.
    Updated,
    /// Required tools are missing; nothing was updated.
    MissingTools(Vec<&'static str>),
}

/// Everything the update flow talks to.
pub struct Updater<'a> {
    pub console: &'a dyn Console,
    pub auth: &'a dyn AuthService,
    pub locator: &'a dyn ToolLocator,
    /// Default project directory.
    pub cwd: PathBuf,
}

impl Updater<'_> {
    fn prompter_for(&self, key: ParamKey) -> Result<Prompter<'_>> {
        match key {
            ParamKey::Credentials => Ok(Prompter::Credentials { auth: self.auth }),
            ParamKey::DatabasePassword => Ok(Prompter::ExistingDatabasePassword),
            ParamKey::DjangoDirectoryPath => Ok(Prompter::ExistingDirectoryPath {
                cwd: self.cwd.clone(),
            }),
            other => Err(anyhow!("{other} is not part of the update flow")),
        }
    }

    /// Validate every supplied flag value. The first invalid one is returned
    /// as the error.
    pub fn validate_supplied(&self, supplied: &Answers) -> Result<Answers> {
        let mut answers = supplied.clone();
        for key in UPDATE_ORDER {
            let Some(value) = supplied.text(key) else {
                continue;
            };
            self.prompter_for(key)?.validate(supplied, value)?;
            if key == ParamKey::Credentials {
                answers = answers.with(key, Credentials::from_file(value));
            }
        }
        Ok(answers)
    }

    /// Prompt for every update key still missing from `answers`.
    pub fn collect(&self, answers: Answers) -> Result<Answers> {
        let remaining: Vec<ParamKey> = UPDATE_ORDER
            .into_iter()
            .filter(|key| !answers.contains(*key))
            .collect();
        if remaining.is_empty() {
            return Ok(answers);
        }

        let total = remaining.len();
        self.console
            .tell(&format!("{total} steps to update your project"));
        self.console.tell("");

        let mut answers = answers;
        for (offset, key) in remaining.into_iter().enumerate() {
            let step = Step::new(offset + 1, total);
            answers = self
                .prompter_for(key)?
                .prompt(self.console, step, &answers)?;
        }
        Ok(answers)
    }

    /// Full update: validate flags, prompt, check the project's backend
    /// requirements, then hand off to `workflow`.
    #[instrument(skip_all)]
    pub fn run(&self, supplied: &Answers, workflow: &dyn Workflow) -> Result<UpdateOutcome> {
        let answers = self.validate_supplied(supplied)?;
        let answers = self.collect(answers)?;

        let project_dir = answers
            .text(ParamKey::DjangoDirectoryPath)
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("django_directory_path was not resolved"))?;
        let backend = project_backend(&project_dir)?;

        let checks = check_requirements(&backend, self.locator).map_err(|err| InvalidConfigError {
            dir: project_dir.clone(),
            reason: err.to_string(),
        })?;
        let missing = missing_tools(&checks);
        if !missing.is_empty() {
            warn!(backend = %backend, ?missing, "missing required tools");
            self.console.error(&format!(
                "The following tools are required to update a {backend} project but were not \
                 found on PATH: {}",
                missing.join(", ")
            ));
            return Ok(UpdateOutcome::MissingTools(missing));
        }

        let params = UpdateParameters::from_answers(&answers)?;
        workflow
            .update_project(&params)
            .context("update project")?;
        info!(backend = %backend, "project updated");
        Ok(UpdateOutcome::Updated)
    }
}

fn project_backend(project_dir: &Path) -> Result<String> {
    let cfg = load_deploy_config(project_dir)?;
    require_backend(project_dir, &cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProjectCreationMode;
    use crate::core::validate::ValidationError;
    use crate::test_support::{FakeAuthService, FixedLocator, ScriptedConsole};

    #[test]
    fn invalid_password_flag_is_a_validation_error() {
        let console = ScriptedConsole::new(&[], &[]);
        let auth = FakeAuthService::new(None, Path::new("/nonexistent/adc.json"));
        let updater = Updater {
            console: &console,
            auth: &auth,
            locator: &FixedLocator::all(),
            cwd: PathBuf::from("/tmp"),
        };
        let supplied = Answers::seeded(
            ProjectCreationMode::CreateNew,
            [(ParamKey::DatabasePassword, "abc".to_string())],
        );

        let err = updater.validate_supplied(&supplied).expect_err("invalid");
        let invalid = err.downcast_ref::<ValidationError>().expect("validation error");
        assert_eq!(
            invalid.message(),
            "Passwords must be at least 6 characters long"
        );
        assert_eq!(console.interaction_count(), 0);
    }

    #[test]
    fn collect_numbers_only_remaining_keys() {
        let temp = tempfile::tempdir().expect("tempdir");
        let console = ScriptedConsole::new(&[], &["dbpass1"]);
        let auth = FakeAuthService::new(None, Path::new("/nonexistent/adc.json"));
        let updater = Updater {
            console: &console,
            auth: &auth,
            locator: &FixedLocator::all(),
            cwd: temp.path().to_path_buf(),
        };
        let answers = Answers::new(ProjectCreationMode::CreateNew)
            .with(ParamKey::Credentials, Credentials::from_file("/tmp/adc.json"))
            .with(ParamKey::DjangoDirectoryPath, "/srv/shop".to_string());

        let next = updater.collect(answers).expect("collect");

        assert_eq!(next.text(ParamKey::DatabasePassword), Some("dbpass1"));
        assert_eq!(
            console.told(),
            vec![
                "1 steps to update your project",
                "",
                "[1/1] Enter the password of the default database user \"postgres\"",
            ]
        );
    }
}
