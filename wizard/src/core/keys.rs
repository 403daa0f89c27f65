//! Parameter keys owned by the prompters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for one collected configuration parameter.
///
/// Each key is owned by exactly one prompter in a given flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKey {
    Credentials,
    ProjectId,
    ProjectName,
    BillingAccountName,
    DatabasePassword,
    DjangoDirectoryPath,
    DjangoProjectName,
    DjangoAppName,
    DjangoSuperuserLogin,
    DjangoSuperuserPassword,
    DjangoSuperuserEmail,
}

/// Interactive order of the create flow. Credentials are resolved before
/// this list and are not part of it.
pub const PROMPT_ORDER: [ParamKey; 10] = [
    ParamKey::ProjectId,
    ParamKey::ProjectName,
    ParamKey::BillingAccountName,
    ParamKey::DatabasePassword,
    ParamKey::DjangoDirectoryPath,
    ParamKey::DjangoProjectName,
    ParamKey::DjangoAppName,
    ParamKey::DjangoSuperuserLogin,
    ParamKey::DjangoSuperuserPassword,
    ParamKey::DjangoSuperuserEmail,
];

/// Order of the update flow.
pub const UPDATE_ORDER: [ParamKey; 3] = [
    ParamKey::Credentials,
    ParamKey::DatabasePassword,
    ParamKey::DjangoDirectoryPath,
];

impl ParamKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::Credentials => "credentials",
            ParamKey::ProjectId => "project_id",
            ParamKey::ProjectName => "project_name",
            ParamKey::BillingAccountName => "billing_account_name",
            ParamKey::DatabasePassword => "database_password",
            ParamKey::DjangoDirectoryPath => "django_directory_path",
            ParamKey::DjangoProjectName => "django_project_name",
            ParamKey::DjangoAppName => "django_app_name",
            ParamKey::DjangoSuperuserLogin => "django_superuser_login",
            ParamKey::DjangoSuperuserPassword => "django_superuser_password",
            ParamKey::DjangoSuperuserEmail => "django_superuser_email",
        }
    }

    /// Values that must never be echoed back or logged.
    pub fn is_secret(self) -> bool {
        matches!(
            self,
            ParamKey::DatabasePassword | ParamKey::DjangoSuperuserPassword
        )
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prompt_order_has_unique_keys_and_excludes_credentials() {
        let unique: HashSet<ParamKey> = PROMPT_ORDER.iter().copied().collect();
        assert_eq!(unique.len(), PROMPT_ORDER.len());
        assert!(!unique.contains(&ParamKey::Credentials));
    }

    #[test]
    fn serde_name_matches_as_str() {
        let json = serde_json::to_string(&ParamKey::BillingAccountName).expect("serialize");
        assert_eq!(json, "\"billing_account_name\"");
    }
}
