//! Plain-text Django settings with fixed defaults.

use anyhow::Result;

use crate::core::answers::Answers;
use crate::core::keys::ParamKey;
use crate::core::step::Step;
use crate::core::validate::{
    Validation, validate_django_identifier, validate_email, validate_superuser_login,
};
use crate::io::console::Console;
use crate::prompt::primitives::ask_prompt;
use crate::prompt::prompter::accept_supplied;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DjangoField {
    ProjectName,
    AppName,
    SuperuserLogin,
    SuperuserEmail,
}

impl DjangoField {
    pub fn key(self) -> ParamKey {
        match self {
            DjangoField::ProjectName => ParamKey::DjangoProjectName,
            DjangoField::AppName => ParamKey::DjangoAppName,
            DjangoField::SuperuserLogin => ParamKey::DjangoSuperuserLogin,
            DjangoField::SuperuserEmail => ParamKey::DjangoSuperuserEmail,
        }
    }

    fn pretty_name(self) -> &'static str {
        match self {
            DjangoField::ProjectName => "Django project name",
            DjangoField::AppName => "Django app name",
            DjangoField::SuperuserLogin => "Django superuser login name",
            DjangoField::SuperuserEmail => "Django superuser email",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            DjangoField::ProjectName => "mysite",
            DjangoField::AppName => "home",
            DjangoField::SuperuserLogin => "admin",
            DjangoField::SuperuserEmail => "test@example.com",
        }
    }

    pub fn validate(self, value: &str) -> Validation {
        match self {
            DjangoField::ProjectName | DjangoField::AppName => {
                validate_django_identifier(self.pretty_name(), value)
            }
            DjangoField::SuperuserLogin => validate_superuser_login(value),
            DjangoField::SuperuserEmail => validate_email(value),
        }
    }
}

pub fn prompt_django_field(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
    field: DjangoField,
) -> Result<Answers> {
    let key = field.key();
    let validate = |value: &str| -> Result<()> { Ok(field.validate(value)?) };
    if let Some(value) = accept_supplied(console, step, key, answers, validate)? {
        return Ok(answers.with(key, value));
    }

    let default = field.default_value();
    let question = format!(
        "{step} Enter a value for {} or leave blank to use\n[{default}]: ",
        field.pretty_name()
    );
    let answer = ask_prompt(console, &question, validate, Some(default))?;
    Ok(answers.with(key, answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProjectCreationMode;
    use crate::test_support::ScriptedConsole;

    #[test]
    fn blank_answer_takes_field_default() {
        let console = ScriptedConsole::new(&[""], &[]);
        let next = prompt_django_field(
            &console,
            Step::new(7, 11),
            &Answers::new(ProjectCreationMode::CreateNew),
            DjangoField::ProjectName,
        )
        .expect("prompt");

        assert_eq!(next.text(ParamKey::DjangoProjectName), Some("mysite"));
        assert_eq!(
            console.asked(),
            vec!["[7/11] Enter a value for Django project name or leave blank to use\n[mysite]: "]
        );
    }

    #[test]
    fn invalid_identifier_is_reasked() {
        let console = ScriptedConsole::new(&["1app", "class", "blog"], &[]);
        let next = prompt_django_field(
            &console,
            Step::new(8, 11),
            &Answers::new(ProjectCreationMode::CreateNew),
            DjangoField::AppName,
        )
        .expect("prompt");

        assert_eq!(next.text(ParamKey::DjangoAppName), Some("blog"));
        assert_eq!(console.errors().len(), 2);
        assert!(console.errors()[0].contains("Django app name"));
    }

    #[test]
    fn field_defaults_pass_their_own_validation() {
        for field in [
            DjangoField::ProjectName,
            DjangoField::AppName,
            DjangoField::SuperuserLogin,
            DjangoField::SuperuserEmail,
        ] {
            field
                .validate(field.default_value())
                .expect("default must validate");
        }
    }
}
