//! Project directory prompters.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::core::answers::Answers;
use crate::core::defaults::default_project_directory;
use crate::core::keys::ParamKey;
use crate::core::step::Step;
use crate::core::validate::{ValidationError, validate_non_empty};
use crate::io::console::Console;
use crate::io::deploy_config::deploy_config_path;
use crate::prompt::primitives::ask_prompt;
use crate::prompt::prompter::accept_supplied;

pub fn validate_directory(value: &str) -> Result<()> {
    Ok(validate_non_empty("Project directory path", value)?)
}

/// Update flow: an existing directory holding a deployment configuration.
pub fn validate_project_directory(value: &str) -> Result<()> {
    let dir = Path::new(value);
    if !dir.is_dir() {
        return Err(ValidationError::new(format!("Directory \"{value}\" does not exist")).into());
    }
    let config = deploy_config_path(dir);
    if !config.is_file() {
        return Err(ValidationError::new(format!(
            "Directory \"{value}\" is not a deployed Django project: missing {}",
            config.display()
        ))
        .into());
    }
    Ok(())
}

/// Where to write the generated project.
///
/// If the directory exists the user is asked whether to replace its
/// contents. The answer is recorded in the log only: either way the path is
/// kept and no new path is asked for.
pub fn prompt_directory(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
    home: &Path,
) -> Result<Answers> {
    let key = ParamKey::DjangoDirectoryPath;
    if let Some(value) = accept_supplied(console, step, key, answers, validate_directory)? {
        return Ok(answers.with(key, value));
    }

    let default = default_project_directory(home, answers.text(ParamKey::ProjectName))
        .display()
        .to_string();
    let question = format!(
        "{step} Enter a new directory path to store project source, or leave blank to use\n[{default}]: "
    );
    let directory = ask_prompt(console, &question, |_: &str| Ok(()), Some(default.as_str()))?;

    if Path::new(&directory).exists() {
        let question =
            format!("The directory '{directory}' already exists, replace its contents [y/N]: ");
        let replace = ask_prompt(console, &question, |_: &str| Ok(()), Some("n"))?;
        debug!(directory = %directory, replace = %replace, "existing directory kept");
    }
    Ok(answers.with(key, directory))
}

/// Update flow: directory of the project to update, defaulting to `cwd`.
pub fn prompt_existing_directory(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
    cwd: &Path,
) -> Result<Answers> {
    let key = ParamKey::DjangoDirectoryPath;
    if let Some(value) = accept_supplied(console, step, key, answers, validate_project_directory)? {
        return Ok(answers.with(key, value));
    }

    let default = cwd.display().to_string();
    let question = format!(
        "{step} Enter the directory of the Django project to update, or leave blank to use\n[{default}]: "
    );
    let directory = ask_prompt(
        console,
        &question,
        validate_project_directory,
        Some(default.as_str()),
    )?;
    Ok(answers.with(key, directory))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::types::ProjectCreationMode;
    use crate::test_support::{ScriptedConsole, write_deploy_config};

    #[test]
    fn default_directory_uses_project_name_slug() {
        let temp = tempfile::tempdir().expect("tempdir");
        let console = ScriptedConsole::new(&[""], &[]);
        let answers = Answers::new(ProjectCreationMode::CreateNew)
            .with(ParamKey::ProjectName, "My Shop".to_string());

        let next = prompt_directory(&console, Step::new(6, 11), &answers, temp.path())
            .expect("prompt");

        let expected = temp.path().join("my-shop").display().to_string();
        assert_eq!(next.text(ParamKey::DjangoDirectoryPath), Some(expected.as_str()));
        assert_eq!(console.asked().len(), 1);
    }

    #[test]
    fn declining_overwrite_keeps_existing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let existing = temp.path().join("django-project");
        fs::create_dir_all(&existing).expect("mkdir");
        let console = ScriptedConsole::new(&["", "n"], &[]);

        let next = prompt_directory(
            &console,
            Step::new(6, 11),
            &Answers::new(ProjectCreationMode::CreateNew),
            temp.path(),
        )
        .expect("prompt");

        let expected = existing.display().to_string();
        assert_eq!(next.text(ParamKey::DjangoDirectoryPath), Some(expected.as_str()));
        assert_eq!(console.asked().len(), 2);
        assert!(console.asked()[1].contains("already exists"));
    }

    #[test]
    fn accepting_overwrite_also_asks_only_once() {
        let temp = tempfile::tempdir().expect("tempdir");
        let existing = temp.path().join("django-project");
        fs::create_dir_all(&existing).expect("mkdir");
        let console = ScriptedConsole::new(&["", "y"], &[]);

        let next = prompt_directory(
            &console,
            Step::new(6, 11),
            &Answers::new(ProjectCreationMode::CreateNew),
            temp.path(),
        )
        .expect("prompt");

        let expected = existing.display().to_string();
        assert_eq!(next.text(ParamKey::DjangoDirectoryPath), Some(expected.as_str()));
        assert_eq!(console.asked().len(), 2);
        assert!(console.errors().is_empty());
        assert!(existing.is_dir());
    }

    #[test]
    fn existing_directory_requires_deploy_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let project = temp.path().join("shop");
        fs::create_dir_all(&project).expect("mkdir");
        let project_text = project.display().to_string();
        let console = ScriptedConsole::new(&["", project_text.as_str()], &[]);
        write_deploy_config(&project, "gke");

        let next = prompt_existing_directory(
            &console,
            Step::new(3, 3),
            &Answers::new(ProjectCreationMode::CreateNew),
            temp.path(),
        )
        .expect("prompt");

        assert_eq!(
            next.text(ParamKey::DjangoDirectoryPath),
            Some(project_text.as_str())
        );
        assert_eq!(console.errors().len(), 1);
        assert!(console.errors()[0].contains(".deploy"));
    }
}
