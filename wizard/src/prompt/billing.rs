//! Billing account selection for `billing_account_name`.

use std::collections::BTreeSet;

use anyhow::{Result, anyhow};
use tracing::{debug, info, instrument, warn};

use crate::core::answers::Answers;
use crate::core::keys::ParamKey;
use crate::core::step::Step;
use crate::core::validate::ValidationError;
use crate::io::billing::{BillingAccount, BillingService};
use crate::io::browser::Browser;
use crate::io::console::Console;
use crate::prompt::poll::{CancelToken, PollSettings, poll_until};
use crate::prompt::primitives::{Choice, multiple_choice_prompt};
use crate::prompt::prompter::accept_supplied;

const MENU_HEADER: &str = "You have the following existing billing accounts:";
const MENU_FOOTER: &str =
    "Please enter your numeric choice or press [Enter] to create a new billing account: ";

/// Picks an existing billing account or waits for the user to create one.
pub struct BillingPrompter<'a> {
    pub billing: &'a dyn BillingService,
    pub browser: &'a dyn Browser,
    /// Page opened to create a billing account.
    pub create_url: String,
    pub poll: PollSettings,
    pub cancel: CancelToken,
}

impl BillingPrompter<'_> {
    /// A supplied account must be one of the user's billing accounts.
    pub fn validate(&self, value: &str) -> Result<()> {
        let accounts = self.billing.list_billing_accounts(false)?;
        if !accounts.iter().any(|account| account.name == value) {
            return Err(ValidationError::new("The provided billing account does not exist.").into());
        }
        Ok(())
    }

    pub fn prompt(&self, console: &dyn Console, step: Step, answers: &Answers) -> Result<Answers> {
        let key = ParamKey::BillingAccountName;
        if let Some(value) = accept_supplied(console, step, key, answers, |value: &str| {
            self.validate(value)
        })? {
            return Ok(answers.with(key, value));
        }

        if !answers.mode().is_new_project()
            && let Some(name) = self.enabled_account(console, step, answers)?
        {
            return Ok(answers.with(key, name));
        }

        let accounts = self.billing.list_billing_accounts(true)?;
        console.tell(&format!(
            "{step} In order to deploy your application, you must enable billing for your \
             Google Cloud Project."
        ));

        let name = if accounts.is_empty() {
            console.tell("You do not have existing billing accounts.");
            console.ask("Press [Enter] to create a new billing account.")?;
            self.create_new(console, &accounts)?
        } else {
            self.choose(console, &accounts)?
        };
        Ok(answers.with(key, name))
    }

    /// Account of an existing project that already has billing enabled.
    fn enabled_account(
        &self,
        console: &dyn Console,
        step: Step,
        answers: &Answers,
    ) -> Result<Option<String>> {
        let project_id = answers
            .text(ParamKey::ProjectId)
            .ok_or_else(|| anyhow!("project_id must be resolved before billing_account_name"))?;
        let info = self.billing.get_billing_account(project_id)?;
        match info.billing_account_name {
            Some(name) if info.billing_enabled => {
                console.tell(&format!("{step} Billing is already enabled on this project."));
                Ok(Some(name))
            }
            _ => Ok(None),
        }
    }

    fn choose(&self, console: &dyn Console, accounts: &[BillingAccount]) -> Result<String> {
        let options: Vec<&str> = accounts
            .iter()
            .map(|account| account.display_name.as_str())
            .collect();
        match multiple_choice_prompt(console, MENU_HEADER, &options, MENU_FOOTER, true)? {
            Choice::Index(index) if index <= accounts.len() => Ok(accounts[index - 1].name.clone()),
            // Blank, or the one-past-the-end index the menu admits.
            Choice::Default | Choice::Index(_) => self.create_new(console, accounts),
        }
    }

    /// Open the creation page and wait until a new open account shows up.
    #[instrument(skip_all, fields(known = existing.len()))]
    fn create_new(&self, console: &dyn Console, existing: &[BillingAccount]) -> Result<String> {
        if let Err(err) = self.browser.open(&self.create_url) {
            warn!(error = %err, "could not open browser");
            console.tell(&format!(
                "Open {} in your browser to create a billing account.",
                self.create_url
            ));
        }
        let known: BTreeSet<&str> = existing.iter().map(|account| account.name.as_str()).collect();
        console.tell("Waiting for billing account to be created.");

        let name = poll_until(self.poll, &self.cancel, || {
            let current = self.billing.list_billing_accounts(true)?;
            if current.len() == existing.len() {
                return Ok(None);
            }
            let created = current
                .into_iter()
                .map(|account| account.name)
                .filter(|name| !known.contains(name.as_str()))
                .min();
            debug!(found = created.is_some(), "billing accounts changed");
            Ok(created)
        })?;
        info!(billing_account = %name, "new billing account detected");
        Ok(name)
    }
}
