//! Credentials resolution. Always the first step of a session.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::core::answers::Answers;
use crate::core::keys::ParamKey;
use crate::core::step::Step;
use crate::core::types::Credentials;
use crate::core::validate::ValidationError;
use crate::io::auth::AuthService;
use crate::io::console::Console;
use crate::prompt::primitives::binary_prompt;
use crate::prompt::prompter::accept_supplied;

/// A supplied credentials value names an existing file.
pub fn validate_credentials_file(value: &str) -> Result<()> {
    if !Path::new(value).is_file() {
        return Err(ValidationError::new(format!("Credentials file \"{value}\" does not exist")).into());
    }
    Ok(())
}

pub fn prompt_credentials(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
    auth: &dyn AuthService,
) -> Result<Answers> {
    let key = ParamKey::Credentials;
    if answers.credentials().is_some() {
        return Ok(answers.clone());
    }
    if let Some(path) = accept_supplied(console, step, key, answers, validate_credentials_file)? {
        return Ok(answers.with(key, Credentials::from_file(path)));
    }

    console.tell(&format!(
        "{step} In order to deploy your application, you must allow Django Deploy to access \
         your Google account."
    ));

    let reuse_active = match auth.get_active_account()? {
        Some(account) => {
            let question =
                format!("You have logged in with account [{account}]. Do you want to use it? [Y/n]: ");
            let answer = binary_prompt(console, &question, Some("Y"))?;
            !answer.eq_ignore_ascii_case("n")
        }
        None => false,
    };

    let credentials = if reuse_active {
        auth.get_default_credentials()?
    } else {
        auth.create_default_credentials()?
    };
    info!(reused = reuse_active, "credentials resolved");
    Ok(answers.with(key, credentials))
}
