//! Prompt primitives shared by every prompter.
//!
//! Validation closures return `anyhow::Result<()>` so that validators backed
//! by a cloud service can fail for reasons other than bad input. Only a
//! [`ValidationError`] re-prompts; any other error ends the prompt.

use anyhow::Result;

use crate::core::validate::{ValidationError, validate_binary, validate_choice, validate_password};
use crate::io::console::Console;

const PASSWORD_PROMPT: &str = "Password: ";
const PASSWORD_AGAIN_PROMPT: &str = "Password (again): ";
const PASSWORD_MISMATCH: &str = "Passwords do not match, please try again";

/// Show a [`ValidationError`] and keep going; propagate anything else.
pub fn report_invalid(console: &dyn Console, err: anyhow::Error) -> Result<()> {
    match err.downcast_ref::<ValidationError>() {
        Some(invalid) => {
            console.error(invalid.message());
            Ok(())
        }
        None => Err(err),
    }
}

/// Ask for one value until it validates. A blank answer takes `default`
/// when one is given.
pub fn ask_prompt(
    console: &dyn Console,
    question: &str,
    validate: impl Fn(&str) -> Result<()>,
    default: Option<&str>,
) -> Result<String> {
    loop {
        let mut answer = console.ask(question)?;
        if answer.is_empty()
            && let Some(default) = default.filter(|value| !value.is_empty())
        {
            answer = default.to_string();
        }
        match validate(&answer) {
            Ok(()) => return Ok(answer),
            Err(err) => report_invalid(console, err)?,
        }
    }
}

/// What the user picked from a numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Blank answer on a menu with a default.
    Default,
    /// 1-based index, at most one past the last option.
    Index(usize),
}

/// Render `options` as a 1-indexed list between `header` and `footer` and ask
/// until the answer is an index in range (or blank, when `has_default`).
pub fn multiple_choice_prompt(
    console: &dyn Console,
    header: &str,
    options: &[&str],
    footer: &str,
    has_default: bool,
) -> Result<Choice> {
    let listing = options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}. {}", i + 1, option))
        .collect::<Vec<_>>()
        .join("\n");
    let question = format!("{header}\n{listing}\n{footer}");

    loop {
        let answer = console.ask(&question)?;
        if let Err(invalid) = validate_choice(&answer, has_default, options.len()) {
            console.error(invalid.message());
            continue;
        }
        if answer.is_empty() {
            return Ok(Choice::Default);
        }
        // validate_choice guarantees a number in range.
        let index = answer
            .parse::<usize>()
            .map_err(|_| ValidationError::new("Please enter a numeric value"))?;
        return Ok(Choice::Index(index));
    }
}

/// Yes/no question.
///
/// A blank answer takes `default`, which is then validated. A non-blank
/// answer is returned as typed without validation.
pub fn binary_prompt(console: &dyn Console, question: &str, default: Option<&str>) -> Result<String> {
    loop {
        let answer = console.ask(question)?;
        match default.filter(|value| !value.is_empty()) {
            Some(default) if answer.is_empty() => match validate_binary(default) {
                Ok(()) => return Ok(default.to_string()),
                Err(invalid) => console.error(invalid.message()),
            },
            _ => return Ok(answer),
        }
    }
}

/// New password: masked entry plus confirmation, repeated until both entries
/// match and the first one validates.
pub fn password_prompt(console: &dyn Console, question: &str) -> Result<String> {
    console.tell(question);
    loop {
        let first = console.getpass(PASSWORD_PROMPT)?;
        if let Err(invalid) = validate_password(&first) {
            console.error(invalid.message());
            continue;
        }
        let second = console.getpass(PASSWORD_AGAIN_PROMPT)?;
        if first != second {
            console.error(PASSWORD_MISMATCH);
            continue;
        }
        return Ok(first);
    }
}

/// Existing password: a single masked entry, validated like a new one.
pub fn existing_password_prompt(console: &dyn Console, question: &str) -> Result<String> {
    console.tell(question);
    loop {
        let password = console.getpass(PASSWORD_PROMPT)?;
        match validate_password(&password) {
            Ok(()) => return Ok(password),
            Err(invalid) => console.error(invalid.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::core::validate::validate_email;
    use crate::test_support::{ConsoleEvent, ScriptedConsole};

    #[test]
    fn ask_prompt_substitutes_default_and_reasks_on_invalid() {
        let console = ScriptedConsole::new(&["not-an-email", ""], &[]);
        let answer = ask_prompt(
            &console,
            "Email: ",
            |s| Ok(validate_email(s)?),
            Some("test@example.com"),
        )
        .expect("ask");

        assert_eq!(answer, "test@example.com");
        assert_eq!(console.asked(), vec!["Email: ", "Email: "]);
        assert_eq!(console.errors().len(), 1);
    }

    #[test]
    fn ask_prompt_propagates_non_validation_errors() {
        let console = ScriptedConsole::new(&["anything"], &[]);
        let err = ask_prompt(&console, "Q: ", |_| Err(anyhow!("service down")), None)
            .expect_err("service error");
        assert!(err.to_string().contains("service down"));
        assert!(console.errors().is_empty());
    }

    #[test]
    fn choice_accepts_one_past_last_option() {
        let console = ScriptedConsole::new(&["3"], &[]);
        let choice =
            multiple_choice_prompt(&console, "Pick:", &["a", "b"], "Choice: ", true).expect("choice");
        assert_eq!(choice, Choice::Index(3));
    }

    #[test]
    fn choice_rejects_out_of_range_then_takes_default() {
        let console = ScriptedConsole::new(&["4", "x", ""], &[]);
        let choice =
            multiple_choice_prompt(&console, "Pick:", &["a", "b"], "Choice: ", true).expect("choice");

        assert_eq!(choice, Choice::Default);
        assert_eq!(
            console.errors(),
            vec!["Value is not in range", "Please enter a numeric value"]
        );
        assert!(console.asked()[2].contains("1. a\n2. b"));
    }

    #[test]
    fn binary_prompt_checks_only_the_default_path() {
        let console = ScriptedConsole::new(&["maybe"], &[]);
        let answer = binary_prompt(&console, "Continue? [Y/n]: ", Some("Y")).expect("binary");
        assert_eq!(answer, "maybe");

        let console = ScriptedConsole::new(&[""], &[]);
        let answer = binary_prompt(&console, "Continue? [Y/n]: ", Some("Y")).expect("binary");
        assert_eq!(answer, "Y");
    }

    #[test]
    fn password_prompt_repeats_until_entries_match() {
        let console = ScriptedConsole::new(&[], &["abc", "secret1", "secret2", "secret1", "secret1"]);
        let password = password_prompt(&console, "[4/11] Enter a password").expect("password");

        assert_eq!(password, "secret1");
        assert_eq!(
            console.errors(),
            vec![
                "Passwords must be at least 6 characters long",
                "Passwords do not match, please try again",
            ]
        );
        let told: Vec<_> = console
            .transcript()
            .into_iter()
            .filter(|event| matches!(event, ConsoleEvent::Tell(_)))
            .collect();
        assert_eq!(told.len(), 1);
    }

    #[test]
    fn existing_password_prompt_asks_once() {
        let console = ScriptedConsole::new(&[], &["dbpass1"]);
        let password = existing_password_prompt(&console, "Enter the password").expect("password");
        assert_eq!(password, "dbpass1");
        assert_eq!(console.getpass_count(), 1);
    }
}
