//! Root sequencer for `django-deploy new`.
//!
//! Credentials are resolved first (step 1), because the project and billing
//! services can only be built from them. The remaining parameters follow
//! [`PROMPT_ORDER`], each prompter receiving the snapshot produced by the one
//! before it.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{info, instrument};

use crate::core::answers::Answers;
use crate::core::keys::{PROMPT_ORDER, ParamKey};
use crate::core::step::Step;
use crate::core::types::ProjectCreationMode;
use crate::io::auth::AuthService;
use crate::io::browser::Browser;
use crate::io::cloud::{CloudServices, Connector};
use crate::io::console::Console;
use crate::io::workflow::{DeployParameters, Workflow};
use crate::prompt::billing::BillingPrompter;
use crate::prompt::django::DjangoField;
use crate::prompt::poll::{CancelToken, PollSettings};
use crate::prompt::project::ProjectIdSource;
use crate::prompt::prompter::Prompter;

/// Billing-account creation settings handed to the billing prompter.
#[derive(Debug, Clone)]
pub struct BillingSettings {
    pub create_url: String,
    pub poll: PollSettings,
}

/// Everything the create flow talks to.
pub struct Wizard<'a> {
    pub console: &'a dyn Console,
    pub auth: &'a dyn AuthService,
    pub connector: &'a dyn Connector,
    pub browser: &'a dyn Browser,
    pub billing: BillingSettings,
    /// Base for the default project directory.
    pub home: PathBuf,
    pub cancel: CancelToken,
}

impl Wizard<'_> {
    /// Number of steps shown to the user: credentials plus every ordered key.
    pub const TOTAL_STEPS: usize = PROMPT_ORDER.len() + 1;

    /// Collect every parameter, starting from flag-supplied values.
    #[instrument(skip_all, fields(supplied = supplied.len()))]
    pub fn run(&self, supplied: &Answers) -> Result<Answers> {
        let credentials_step = Step::new(1, Self::TOTAL_STEPS);
        let mut answers = Prompter::Credentials { auth: self.auth }.prompt(
            self.console,
            credentials_step,
            supplied,
        )?;
        let credentials = answers
            .credentials()
            .ok_or_else(|| anyhow!("credentials were not resolved"))?;
        let services = self
            .connector
            .connect(credentials)
            .context("connect to cloud services")?;

        for (offset, key) in PROMPT_ORDER.iter().copied().enumerate() {
            let step = Step::new(offset + 2, Self::TOTAL_STEPS);
            answers = self
                .prompter_for(key, answers.mode(), &services)
                .prompt(self.console, step, &answers)?;
            info!(%step, %key, "parameter resolved");
        }
        Ok(answers)
    }

    fn prompter_for<'s>(
        &'s self,
        key: ParamKey,
        mode: ProjectCreationMode,
        services: &'s CloudServices,
    ) -> Prompter<'s> {
        match key {
            ParamKey::Credentials => Prompter::Credentials { auth: self.auth },
            ParamKey::ProjectId => Prompter::ProjectId {
                source: ProjectIdSource::for_mode(mode),
                projects: &*services.project,
            },
            ParamKey::ProjectName => Prompter::ProjectName {
                projects: &*services.project,
            },
            ParamKey::BillingAccountName => Prompter::BillingAccount(BillingPrompter {
                billing: &*services.billing,
                browser: self.browser,
                create_url: self.billing.create_url.clone(),
                poll: self.billing.poll,
                cancel: self.cancel.clone(),
            }),
            ParamKey::DatabasePassword => Prompter::DatabasePassword,
            ParamKey::DjangoDirectoryPath => Prompter::DirectoryPath {
                home: self.home.clone(),
            },
            ParamKey::DjangoProjectName => Prompter::Django(DjangoField::ProjectName),
            ParamKey::DjangoAppName => Prompter::Django(DjangoField::AppName),
            ParamKey::DjangoSuperuserLogin => Prompter::Django(DjangoField::SuperuserLogin),
            ParamKey::DjangoSuperuserPassword => Prompter::SuperuserPassword,
            ParamKey::DjangoSuperuserEmail => Prompter::Django(DjangoField::SuperuserEmail),
        }
    }
}

/// Run the wizard and hand the result to `workflow`.
pub fn run_new(wizard: &Wizard<'_>, supplied: &Answers, workflow: &dyn Workflow) -> Result<()> {
    let answers = wizard.run(supplied)?;
    let params = DeployParameters::from_answers(&answers)?;
    workflow
        .create_and_deploy(&params)
        .context("create and deploy project")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_steps_counts_credentials() {
        assert_eq!(Wizard::TOTAL_STEPS, 11);
    }
}
