//! Tagged dispatch over every parameter prompter.

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::core::answers::Answers;
use crate::core::keys::ParamKey;
use crate::core::step::Step;
use crate::io::auth::AuthService;
use crate::io::console::Console;
use crate::io::project::ProjectService;
use crate::prompt::billing::BillingPrompter;
use crate::prompt::credentials::{prompt_credentials, validate_credentials_file};
use crate::prompt::django::{DjangoField, prompt_django_field};
use crate::prompt::filesystem::{
    prompt_directory, prompt_existing_directory, validate_directory, validate_project_directory,
};
use crate::prompt::password::{
    prompt_database_password, prompt_existing_database_password, prompt_superuser_password,
    validate_password_answer,
};
use crate::prompt::primitives::report_invalid;
use crate::prompt::project::{
    ProjectIdSource, prompt_project_id, prompt_project_name, validate_project_id,
    validate_project_name,
};

const SECRET_MASK: &str = "********";

/// One parameter prompter. Each variant owns exactly one [`ParamKey`] and
/// holds nothing but the services it reads from.
pub enum Prompter<'a> {
    Credentials { auth: &'a dyn AuthService },
    ProjectId {
        source: ProjectIdSource,
        projects: &'a dyn ProjectService,
    },
    ProjectName { projects: &'a dyn ProjectService },
    BillingAccount(BillingPrompter<'a>),
    DatabasePassword,
    DirectoryPath { home: PathBuf },
    Django(DjangoField),
    SuperuserPassword,
    /// Update flow: password of an already-deployed database.
    ExistingDatabasePassword,
    /// Update flow: directory of an already-generated project.
    ExistingDirectoryPath { cwd: PathBuf },
}

impl Prompter<'_> {
    pub fn key(&self) -> ParamKey {
        match self {
            Prompter::Credentials { .. } => ParamKey::Credentials,
            Prompter::ProjectId { .. } => ParamKey::ProjectId,
            Prompter::ProjectName { .. } => ParamKey::ProjectName,
            Prompter::BillingAccount(_) => ParamKey::BillingAccountName,
            Prompter::DatabasePassword | Prompter::ExistingDatabasePassword => {
                ParamKey::DatabasePassword
            }
            Prompter::DirectoryPath { .. } | Prompter::ExistingDirectoryPath { .. } => {
                ParamKey::DjangoDirectoryPath
            }
            Prompter::Django(field) => field.key(),
            Prompter::SuperuserPassword => ParamKey::DjangoSuperuserPassword,
        }
    }

    /// Check a value supplied out-of-band exactly as interactive entry would.
    pub fn validate(&self, answers: &Answers, value: &str) -> Result<()> {
        match self {
            Prompter::Credentials { .. } => validate_credentials_file(value),
            Prompter::ProjectId { source, projects } => {
                validate_project_id(*source, *projects, value)
            }
            Prompter::ProjectName { projects } => validate_project_name(
                answers.mode(),
                *projects,
                answers.text(ParamKey::ProjectId),
                value,
            ),
            Prompter::BillingAccount(billing) => billing.validate(value),
            Prompter::DatabasePassword
            | Prompter::ExistingDatabasePassword
            | Prompter::SuperuserPassword => validate_password_answer(value),
            Prompter::DirectoryPath { .. } => validate_directory(value),
            Prompter::Django(field) => Ok(field.validate(value)?),
            Prompter::ExistingDirectoryPath { .. } => validate_project_directory(value),
        }
    }

    /// Resolve this prompter's key and return the extended snapshot.
    pub fn prompt(&self, console: &dyn Console, step: Step, answers: &Answers) -> Result<Answers> {
        let key = self.key();
        debug!(%step, %key, "resolving parameter");
        match self {
            Prompter::Credentials { auth } => prompt_credentials(console, step, answers, *auth),
            Prompter::ProjectId { source, projects } => {
                prompt_project_id(console, step, answers, *source, *projects)
            }
            Prompter::ProjectName { projects } => {
                prompt_project_name(console, step, answers, *projects)
            }
            Prompter::BillingAccount(billing) => billing.prompt(console, step, answers),
            Prompter::DatabasePassword => prompt_database_password(console, step, answers),
            Prompter::DirectoryPath { home } => prompt_directory(console, step, answers, home),
            Prompter::Django(field) => prompt_django_field(console, step, answers, *field),
            Prompter::SuperuserPassword => prompt_superuser_password(console, step, answers),
            Prompter::ExistingDatabasePassword => {
                prompt_existing_database_password(console, step, answers)
            }
            Prompter::ExistingDirectoryPath { cwd } => {
                prompt_existing_directory(console, step, answers, cwd)
            }
        }
    }
}

/// Flag short-circuit shared by all prompters.
///
/// Returns the supplied value when `key` was supplied and passes `validate`,
/// after printing `<step> <key>: <value>`. A rejected value is reported and
/// `None` is returned so the caller prompts interactively.
pub(crate) fn accept_supplied(
    console: &dyn Console,
    step: Step,
    key: ParamKey,
    answers: &Answers,
    validate: impl Fn(&str) -> Result<()>,
) -> Result<Option<String>> {
    let Some(value) = answers.text(key) else {
        return Ok(None);
    };
    if let Err(err) = validate(value) {
        report_invalid(console, err)?;
        debug!(%key, "supplied value rejected, prompting instead");
        return Ok(None);
    }
    let shown = if key.is_secret() { SECRET_MASK } else { value };
    console.tell(&format!("{step} {key}: {shown}"));
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProjectCreationMode;
    use crate::test_support::{FakeProjectService, ScriptedConsole};

    #[test]
    fn valid_supplied_value_needs_no_interaction() {
        let console = ScriptedConsole::new(&[], &[]);
        let answers = Answers::seeded(
            ProjectCreationMode::CreateNew,
            [(ParamKey::DjangoAppName, "blog".to_string())],
        );

        let next = Prompter::Django(DjangoField::AppName)
            .prompt(&console, Step::new(8, 11), &answers)
            .expect("prompt");

        assert_eq!(next, answers);
        assert_eq!(console.interaction_count(), 0);
        assert_eq!(console.told(), vec!["[8/11] django_app_name: blog"]);
    }

    #[test]
    fn invalid_supplied_value_falls_back_to_prompting() {
        let console = ScriptedConsole::new(&["good-project-1"], &[]);
        let projects = FakeProjectService::new();
        let answers = Answers::seeded(
            ProjectCreationMode::CreateNew,
            [(ParamKey::ProjectId, "Bad_Id".to_string())],
        );

        let next = Prompter::ProjectId {
            source: ProjectIdSource::New,
            projects: &projects,
        }
        .prompt(&console, Step::new(2, 11), &answers)
        .expect("prompt");

        assert_eq!(next.text(ParamKey::ProjectId), Some("good-project-1"));
        assert_eq!(console.errors().len(), 1);
        assert!(console.errors()[0].contains("Bad_Id"));
    }

    #[test]
    fn supplied_secrets_are_masked_in_confirmation() {
        let console = ScriptedConsole::new(&[], &[]);
        let answers = Answers::seeded(
            ProjectCreationMode::CreateNew,
            [(ParamKey::DatabasePassword, "hunter22".to_string())],
        );

        Prompter::DatabasePassword
            .prompt(&console, Step::new(5, 11), &answers)
            .expect("prompt");

        assert_eq!(console.told(), vec!["[5/11] database_password: ********"]);
    }

    #[test]
    fn keys_are_unique_per_create_flow_prompter() {
        let projects = FakeProjectService::new();
        let prompters = [
            Prompter::ProjectId {
                source: ProjectIdSource::New,
                projects: &projects,
            },
            Prompter::ProjectName {
                projects: &projects,
            },
            Prompter::DatabasePassword,
            Prompter::DirectoryPath {
                home: PathBuf::from("/home/dev"),
            },
            Prompter::Django(DjangoField::ProjectName),
            Prompter::Django(DjangoField::AppName),
            Prompter::Django(DjangoField::SuperuserLogin),
            Prompter::SuperuserPassword,
            Prompter::Django(DjangoField::SuperuserEmail),
        ];
        let mut keys: Vec<ParamKey> = prompters.iter().map(Prompter::key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), prompters.len());
    }
}
