//! Billing service: billing accounts and per-project billing state.

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::io::gcloud::Gcloud;

/// A billing account visible to the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAccount {
    /// Resource name, e.g. `billingAccounts/0X0X0X-0X0X0X-0X0X0X`.
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub open: bool,
}

/// Billing state of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBillingInfo {
    #[serde(default)]
    pub billing_enabled: bool,
    #[serde(default)]
    pub billing_account_name: Option<String>,
}

pub trait BillingService {
    fn list_billing_accounts(&self, only_open: bool) -> Result<Vec<BillingAccount>>;
    fn get_billing_account(&self, project_id: &str) -> Result<ProjectBillingInfo>;
}

pub struct GcloudBillingService {
    gcloud: Gcloud,
}

impl GcloudBillingService {
    pub fn new(gcloud: Gcloud) -> Self {
        Self { gcloud }
    }
}

impl BillingService for GcloudBillingService {
    #[instrument(skip(self))]
    fn list_billing_accounts(&self, only_open: bool) -> Result<Vec<BillingAccount>> {
        let mut args = vec!["billing", "accounts", "list"];
        if only_open {
            args.push("--filter=open=true");
        }
        let accounts: Vec<BillingAccount> = self.gcloud.json(&args)?;
        debug!(count = accounts.len(), "listed billing accounts");
        Ok(accounts)
    }

    #[instrument(skip(self))]
    fn get_billing_account(&self, project_id: &str) -> Result<ProjectBillingInfo> {
        self.gcloud
            .json(&["billing", "projects", "describe", project_id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gcloud_billing_shapes() {
        let accounts: Vec<BillingAccount> = serde_json::from_str(
            r#"[{"displayName":"My Billing","name":"billingAccounts/01-02-03","open":true,"masterBillingAccount":""}]"#,
        )
        .expect("parse accounts");
        assert_eq!(accounts[0].name, "billingAccounts/01-02-03");
        assert_eq!(accounts[0].display_name, "My Billing");

        let info: ProjectBillingInfo = serde_json::from_str(
            r#"{"billingAccountName":"billingAccounts/01-02-03","billingEnabled":true,"name":"projects/shop/billingInfo","projectId":"shop"}"#,
        )
        .expect("parse billing info");
        assert!(info.billing_enabled);
        assert_eq!(
            info.billing_account_name.as_deref(),
            Some("billingAccounts/01-02-03")
        );

        let disabled: ProjectBillingInfo =
            serde_json::from_str(r#"{"projectId":"shop"}"#).expect("parse empty billing info");
        assert!(!disabled.billing_enabled);
    }
}
