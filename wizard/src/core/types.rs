//! Shared deterministic types for the wizard core.
//!
//! These types carry no behavior beyond construction and formatting; services
//! that produce them live under `io`.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Whether the session targets a brand-new or an already-existing project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCreationMode {
    #[default]
    CreateNew,
    MustExist,
}

impl ProjectCreationMode {
    pub fn from_use_existing(use_existing_project: bool) -> Self {
        if use_existing_project {
            ProjectCreationMode::MustExist
        } else {
            ProjectCreationMode::CreateNew
        }
    }

    pub fn is_new_project(self) -> bool {
        self == ProjectCreationMode::CreateNew
    }
}

/// Opaque handle to an authenticated session with the cloud identity service.
///
/// Points at an application-default-credentials file; `account` is known when
/// the handle came from an active `gcloud` login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub path: PathBuf,
    pub account: Option<String>,
}

impl Credentials {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            account: None,
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.account {
            Some(account) => write!(f, "{} ({})", account, self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}
