//! Password prompters: the database user and the Django superuser.

use anyhow::{Result, anyhow};

use crate::core::answers::Answers;
use crate::core::keys::ParamKey;
use crate::core::step::Step;
use crate::core::validate::validate_password;
use crate::io::console::Console;
use crate::prompt::primitives::{existing_password_prompt, password_prompt};
use crate::prompt::prompter::accept_supplied;

pub fn validate_password_answer(value: &str) -> Result<()> {
    Ok(validate_password(value)?)
}

pub fn prompt_database_password(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
) -> Result<Answers> {
    let key = ParamKey::DatabasePassword;
    if let Some(value) = accept_supplied(console, step, key, answers, validate_password_answer)? {
        return Ok(answers.with(key, value));
    }
    let question = format!("{step} Enter a password for the default database user \"postgres\"");
    let password = password_prompt(console, &question)?;
    Ok(answers.with(key, password))
}

pub fn prompt_superuser_password(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
) -> Result<Answers> {
    let key = ParamKey::DjangoSuperuserPassword;
    if let Some(value) = accept_supplied(console, step, key, answers, validate_password_answer)? {
        return Ok(answers.with(key, value));
    }
    let login = answers.text(ParamKey::DjangoSuperuserLogin).ok_or_else(|| {
        anyhow!("django_superuser_login must be resolved before django_superuser_password")
    })?;
    let question = format!("{step} Enter a password for the Django superuser \"{login}\"");
    let password = password_prompt(console, &question)?;
    Ok(answers.with(key, password))
}

/// Update flow: the password the database was deployed with.
pub fn prompt_existing_database_password(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
) -> Result<Answers> {
    let key = ParamKey::DatabasePassword;
    if let Some(value) = accept_supplied(console, step, key, answers, validate_password_answer)? {
        return Ok(answers.with(key, value));
    }
    let question =
        format!("{step} Enter the password of the default database user \"postgres\"");
    let password = existing_password_prompt(console, &question)?;
    Ok(answers.with(key, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProjectCreationMode;
    use crate::test_support::ScriptedConsole;

    #[test]
    fn superuser_password_names_the_login() {
        let console = ScriptedConsole::new(&[], &["supass1", "supass1"]);
        let answers = Answers::new(ProjectCreationMode::CreateNew)
            .with(ParamKey::DjangoSuperuserLogin, "root".to_string());

        let next = prompt_superuser_password(&console, Step::new(10, 11), &answers).expect("prompt");

        assert_eq!(next.text(ParamKey::DjangoSuperuserPassword), Some("supass1"));
        assert_eq!(
            console.told(),
            vec!["[10/11] Enter a password for the Django superuser \"root\""]
        );
    }

    #[test]
    fn superuser_password_requires_login() {
        let console = ScriptedConsole::new(&[], &[]);
        let answers = Answers::new(ProjectCreationMode::CreateNew);
        let err = prompt_superuser_password(&console, Step::new(10, 11), &answers)
            .expect_err("no login");
        assert!(err.to_string().contains("django_superuser_login"));
    }

    #[test]
    fn database_password_confirms_twice() {
        let console = ScriptedConsole::new(&[], &["dbpass1", "dbpass1"]);
        let next = prompt_database_password(
            &console,
            Step::new(5, 11),
            &Answers::new(ProjectCreationMode::CreateNew),
        )
        .expect("prompt");

        assert_eq!(next.text(ParamKey::DatabasePassword), Some("dbpass1"));
        assert_eq!(console.getpass_count(), 2);
    }

    #[test]
    fn existing_database_password_is_entered_once() {
        let console = ScriptedConsole::new(&[], &["abc", "dbpass1"]);
        let next = prompt_existing_database_password(
            &console,
            Step::new(2, 3),
            &Answers::new(ProjectCreationMode::CreateNew),
        )
        .expect("prompt");

        assert_eq!(next.text(ParamKey::DatabasePassword), Some("dbpass1"));
        assert_eq!(console.getpass_count(), 2);
        assert_eq!(console.errors().len(), 1);
    }
}
