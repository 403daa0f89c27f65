//! Hand-off of collected parameters to the deployment workflow.
//!
//! The [`Workflow`] trait decouples the wizard from whatever performs the
//! deployment. The default backend spawns a configured command and feeds it
//! the parameters as JSON on stdin.

use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::core::answers::Answers;
use crate::core::keys::ParamKey;
use crate::core::types::{Credentials, ProjectCreationMode};
use crate::io::process::run_command_with_timeout;

const MASK: &str = "********";
const WORKFLOW_TIMEOUT: Duration = Duration::from_secs(6 * 60 * 60);
const WORKFLOW_OUTPUT_LIMIT_BYTES: usize = 1_000_000;

/// Everything the create-and-deploy workflow needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployParameters {
    pub project_creation_mode: ProjectCreationMode,
    pub credentials: Credentials,
    pub project_id: String,
    pub project_name: String,
    pub billing_account_name: String,
    pub database_password: String,
    pub django_directory_path: String,
    pub django_project_name: String,
    pub django_app_name: String,
    pub django_superuser_login: String,
    pub django_superuser_password: String,
    pub django_superuser_email: String,
}

impl DeployParameters {
    /// Build from a finished create-flow snapshot. Every key is required.
    pub fn from_answers(answers: &Answers) -> Result<Self> {
        Ok(Self {
            project_creation_mode: answers.mode(),
            credentials: required_credentials(answers)?,
            project_id: required_text(answers, ParamKey::ProjectId)?,
            project_name: required_text(answers, ParamKey::ProjectName)?,
            billing_account_name: required_text(answers, ParamKey::BillingAccountName)?,
            database_password: required_text(answers, ParamKey::DatabasePassword)?,
            django_directory_path: required_text(answers, ParamKey::DjangoDirectoryPath)?,
            django_project_name: required_text(answers, ParamKey::DjangoProjectName)?,
            django_app_name: required_text(answers, ParamKey::DjangoAppName)?,
            django_superuser_login: required_text(answers, ParamKey::DjangoSuperuserLogin)?,
            django_superuser_password: required_text(answers, ParamKey::DjangoSuperuserPassword)?,
            django_superuser_email: required_text(answers, ParamKey::DjangoSuperuserEmail)?,
        })
    }

    /// Copy safe to print: passwords replaced by a mask.
    pub fn redacted(&self) -> Self {
        Self {
            database_password: MASK.to_string(),
            django_superuser_password: MASK.to_string(),
            ..self.clone()
        }
    }
}

/// Everything the update workflow needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateParameters {
    pub credentials: Credentials,
    pub database_password: String,
    pub django_directory_path: String,
}

impl UpdateParameters {
    pub fn from_answers(answers: &Answers) -> Result<Self> {
        Ok(Self {
            credentials: required_credentials(answers)?,
            database_password: required_text(answers, ParamKey::DatabasePassword)?,
            django_directory_path: required_text(answers, ParamKey::DjangoDirectoryPath)?,
        })
    }

    pub fn redacted(&self) -> Self {
        Self {
            database_password: MASK.to_string(),
            ..self.clone()
        }
    }
}

fn required_text(answers: &Answers, key: ParamKey) -> Result<String> {
    answers
        .text(key)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing parameter '{key}'"))
}

fn required_credentials(answers: &Answers) -> Result<Credentials> {
    answers
        .credentials()
        .cloned()
        .ok_or_else(|| anyhow!("missing parameter '{}'", ParamKey::Credentials))
}

pub trait Workflow {
    fn create_and_deploy(&self, params: &DeployParameters) -> Result<()>;
    fn update_project(&self, params: &UpdateParameters) -> Result<()>;
}

/// Workflow that spawns `command` and writes the parameters to its stdin.
pub struct CommandWorkflow {
    command: Vec<String>,
}

impl CommandWorkflow {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    #[instrument(skip_all, fields(action = %action))]
    fn invoke<T: Serialize>(&self, action: &str, params: &T) -> Result<()> {
        let (program, args) = self.command.split_first().ok_or_else(|| {
            anyhow!("no deployment workflow configured (set workflow.command in the config file or pass --dry-run)")
        })?;

        let payload = serde_json::to_vec(&WorkflowRequest { action, params })
            .context("serialize workflow request")?;

        let mut cmd = Command::new(program);
        cmd.args(args).arg(action);
        info!(program = %program, action, "starting deployment workflow");
        let output = run_command_with_timeout(
            cmd,
            Some(&payload),
            WORKFLOW_TIMEOUT,
            WORKFLOW_OUTPUT_LIMIT_BYTES,
        )
        .context("run deployment workflow")?;

        let stdout = output.stdout_text();
        if !stdout.trim().is_empty() {
            println!("{}", stdout.trim_end());
        }
        if !output.succeeded() {
            warn!(exit_code = ?output.status.code(), timed_out = output.timed_out, "workflow failed");
            return Err(anyhow!(
                "deployment workflow {action} failed with status {:?}: {}",
                output.status.code(),
                output.stderr_text()
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct WorkflowRequest<'a, T: Serialize> {
    action: &'a str,
    params: &'a T,
}

impl Workflow for CommandWorkflow {
    fn create_and_deploy(&self, params: &DeployParameters) -> Result<()> {
        self.invoke("create", params)
    }

    fn update_project(&self, params: &UpdateParameters) -> Result<()> {
        self.invoke("update", params)
    }
}

/// Workflow that only prints what it would have sent, passwords masked.
pub struct DryRunWorkflow;

impl Workflow for DryRunWorkflow {
    fn create_and_deploy(&self, params: &DeployParameters) -> Result<()> {
        print_json(&params.redacted())
    }

    fn update_project(&self, params: &UpdateParameters) -> Result<()> {
        print_json(&params.redacted())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serialize parameters")?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_answers() -> Answers {
        let mut answers = Answers::new(ProjectCreationMode::CreateNew)
            .with(ParamKey::Credentials, Credentials::from_file("/tmp/adc.json"));
        for (key, value) in [
            (ParamKey::ProjectId, "shop-123456"),
            (ParamKey::ProjectName, "Shop"),
            (ParamKey::BillingAccountName, "billingAccounts/1"),
            (ParamKey::DatabasePassword, "dbpass1"),
            (ParamKey::DjangoDirectoryPath, "/home/dev/shop"),
            (ParamKey::DjangoProjectName, "mysite"),
            (ParamKey::DjangoAppName, "home"),
            (ParamKey::DjangoSuperuserLogin, "admin"),
            (ParamKey::DjangoSuperuserPassword, "supass1"),
            (ParamKey::DjangoSuperuserEmail, "test@example.com"),
        ] {
            answers = answers.with(key, value.to_string());
        }
        answers
    }

    #[test]
    fn deploy_parameters_require_every_key() {
        let params = DeployParameters::from_answers(&complete_answers()).expect("complete");
        assert_eq!(params.project_id, "shop-123456");

        let partial = Answers::new(ProjectCreationMode::CreateNew)
            .with(ParamKey::Credentials, Credentials::from_file("/tmp/adc.json"));
        let err = DeployParameters::from_answers(&partial).expect_err("incomplete");
        assert!(err.to_string().contains("missing parameter 'project_id'"));
    }

    #[test]
    fn redacted_masks_passwords_only() {
        let params = DeployParameters::from_answers(&complete_answers()).expect("complete");
        let redacted = params.redacted();
        assert_eq!(redacted.database_password, MASK);
        assert_eq!(redacted.django_superuser_password, MASK);
        assert_eq!(redacted.django_superuser_login, "admin");
    }

    #[test]
    fn command_workflow_without_command_is_an_error() {
        let params = DeployParameters::from_answers(&complete_answers()).expect("complete");
        let err = CommandWorkflow::new(Vec::new())
            .create_and_deploy(&params)
            .expect_err("no command");
        assert!(err.to_string().contains("workflow.command"));
    }

    #[cfg(unix)]
    #[test]
    fn command_workflow_reports_failure_status() {
        let params = UpdateParameters::from_answers(&complete_answers()).expect("complete");
        let workflow = CommandWorkflow::new(vec!["false".to_string()]);
        let err = workflow.update_project(&params).expect_err("false fails");
        assert!(err.to_string().contains("deployment workflow update failed"));

        let workflow = CommandWorkflow::new(vec!["true".to_string()]);
        workflow.update_project(&params).expect("true succeeds");
    }
}
