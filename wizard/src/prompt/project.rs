//! Project identity: `project_id` and `project_name`.
//!
//! Both prompters fork on the session's [`ProjectCreationMode`]: a new project
//! gets generated defaults, an existing one is checked against the project
//! service.

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::core::answers::Answers;
use crate::core::defaults::{DEFAULT_PROJECT_NAME, generate_project_id};
use crate::core::keys::ParamKey;
use crate::core::step::Step;
use crate::core::types::ProjectCreationMode;
use crate::core::validate::{ValidationError, validate_project_id_format, validate_project_name_length};
use crate::io::console::Console;
use crate::io::project::ProjectService;
use crate::prompt::primitives::ask_prompt;
use crate::prompt::prompter::accept_supplied;

/// Where the project id comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectIdSource {
    /// A fresh id for a project that will be created.
    New,
    /// The id of a project that must already exist.
    Existing,
}

impl ProjectIdSource {
    pub fn for_mode(mode: ProjectCreationMode) -> Self {
        match mode {
            ProjectCreationMode::CreateNew => ProjectIdSource::New,
            ProjectCreationMode::MustExist => ProjectIdSource::Existing,
        }
    }
}

pub fn validate_project_id(
    source: ProjectIdSource,
    projects: &dyn ProjectService,
    value: &str,
) -> Result<()> {
    validate_project_id_format(value)?;
    if source == ProjectIdSource::Existing && !projects.project_exists(value)? {
        return Err(ValidationError::new(format!("Project {value} does not exist")).into());
    }
    Ok(())
}

pub fn prompt_project_id(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
    source: ProjectIdSource,
    projects: &dyn ProjectService,
) -> Result<Answers> {
    let validate = |value: &str| validate_project_id(source, projects, value);
    if let Some(value) = accept_supplied(console, step, ParamKey::ProjectId, answers, validate)? {
        return Ok(answers.with(ParamKey::ProjectId, value));
    }

    let project_id = match source {
        ProjectIdSource::New => {
            let default = generate_project_id(answers.text(ParamKey::ProjectName));
            let question = format!(
                "{step} Enter a Google Cloud Platform Project ID, or leave blank to use\n[{default}]: "
            );
            ask_prompt(console, &question, validate, Some(default.as_str()))?
        }
        ProjectIdSource::Existing => {
            let question =
                format!("{step} Enter the existing Google Cloud Platform Project ID to use: ");
            ask_prompt(console, &question, validate, None)?
        }
    };
    debug!(?source, project_id = %project_id, "project id resolved");
    Ok(answers.with(ParamKey::ProjectId, project_id))
}

/// Length rule, plus a match against the name on record when the project
/// must already exist.
pub fn validate_project_name(
    mode: ProjectCreationMode,
    projects: &dyn ProjectService,
    project_id: Option<&str>,
    value: &str,
) -> Result<()> {
    validate_project_name_length(value)?;
    if mode.is_new_project() {
        return Ok(());
    }
    let Some(project_id) = project_id else {
        return Err(ValidationError::new("Project Id must be set").into());
    };
    let project = projects.get_project(project_id)?;
    if project.name != value {
        return Err(ValidationError::new("Wrong project name given for project id.").into());
    }
    Ok(())
}

pub fn prompt_project_name(
    console: &dyn Console,
    step: Step,
    answers: &Answers,
    projects: &dyn ProjectService,
) -> Result<Answers> {
    let mode = answers.mode();
    let project_id = answers.text(ParamKey::ProjectId);
    let validate = |value: &str| validate_project_name(mode, projects, project_id, value);
    if let Some(value) = accept_supplied(console, step, ParamKey::ProjectName, answers, validate)? {
        return Ok(answers.with(ParamKey::ProjectName, value));
    }

    if mode.is_new_project() {
        let question = format!(
            "{step} Enter a Google Cloud Platform project name, or leave blank to use\n[{DEFAULT_PROJECT_NAME}]: "
        );
        let name = ask_prompt(console, &question, validate, Some(DEFAULT_PROJECT_NAME))?;
        return Ok(answers.with(ParamKey::ProjectName, name));
    }

    let project_id =
        project_id.ok_or_else(|| anyhow!("project_id must be resolved before project_name"))?;
    let name = projects.get_project(project_id)?.name;
    console.tell(&format!("{step} {}: {name}", ParamKey::ProjectName));
    Ok(answers.with(ParamKey::ProjectName, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeProjectService, ScriptedConsole};

    #[test]
    fn new_project_id_offers_generated_default() {
        let console = ScriptedConsole::new(&[""], &[]);
        let projects = FakeProjectService::new();
        let answers = Answers::new(ProjectCreationMode::CreateNew);

        let next = prompt_project_id(
            &console,
            Step::new(2, 11),
            &answers,
            ProjectIdSource::New,
            &projects,
        )
        .expect("prompt");

        let project_id = next.text(ParamKey::ProjectId).expect("project id");
        assert!(project_id.starts_with("django-"));
        assert_eq!(project_id.len(), "django-".len() + 6);
        assert!(console.asked()[0].starts_with("[2/11] Enter a Google Cloud Platform Project ID"));
    }

    #[test]
    fn existing_project_id_must_exist() {
        let console = ScriptedConsole::new(&["missing-project", "shop-project"], &[]);
        let projects = FakeProjectService::new().with_project("shop-project", "Shop");
        let answers = Answers::new(ProjectCreationMode::MustExist);

        let next = prompt_project_id(
            &console,
            Step::new(2, 11),
            &answers,
            ProjectIdSource::Existing,
            &projects,
        )
        .expect("prompt");

        assert_eq!(next.text(ParamKey::ProjectId), Some("shop-project"));
        assert_eq!(console.errors(), vec!["Project missing-project does not exist"]);
    }

    #[test]
    fn existing_project_name_is_confirmed_without_question() {
        let console = ScriptedConsole::new(&[], &[]);
        let projects = FakeProjectService::new().with_project("shop-project", "Shop Front");
        let answers = Answers::new(ProjectCreationMode::MustExist)
            .with(ParamKey::ProjectId, "shop-project".to_string());

        let next = prompt_project_name(&console, Step::new(3, 11), &answers, &projects)
            .expect("prompt");

        assert_eq!(next.text(ParamKey::ProjectName), Some("Shop Front"));
        assert_eq!(console.interaction_count(), 0);
        assert_eq!(console.told(), vec!["[3/11] project_name: Shop Front"]);
    }

    #[test]
    fn project_name_must_match_record_for_existing_project() {
        let projects = FakeProjectService::new().with_project("shop-project", "Shop Front");
        let mode = ProjectCreationMode::MustExist;

        let err = validate_project_name(mode, &projects, Some("shop-project"), "Other Name")
            .expect_err("mismatch");
        assert_eq!(err.to_string(), "Wrong project name given for project id.");

        let err = validate_project_name(mode, &projects, None, "Shop Front").expect_err("no id");
        assert_eq!(err.to_string(), "Project Id must be set");

        validate_project_name(mode, &projects, Some("shop-project"), "Shop Front")
            .expect("matching name");
        validate_project_name(ProjectCreationMode::CreateNew, &projects, None, "Anything")
            .expect("new project");
    }

    #[test]
    fn new_project_name_defaults() {
        let console = ScriptedConsole::new(&["abc", ""], &[]);
        let projects = FakeProjectService::new();
        let answers = Answers::new(ProjectCreationMode::CreateNew);

        let next = prompt_project_name(&console, Step::new(3, 11), &answers, &projects)
            .expect("prompt");

        assert_eq!(next.text(ParamKey::ProjectName), Some(DEFAULT_PROJECT_NAME));
        assert_eq!(console.errors().len(), 1);
    }
}
