//! Test-only collaborators: a scripted console and in-memory services.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Result, anyhow, bail};

use crate::core::types::Credentials;
use crate::io::auth::AuthService;
use crate::io::billing::{BillingAccount, BillingService, ProjectBillingInfo};
use crate::io::browser::Browser;
use crate::io::cloud::{CloudServices, Connector};
use crate::io::console::Console;
use crate::io::deploy_config::deploy_config_path;
use crate::io::project::{ProjectInfo, ProjectService};
use crate::io::requirements::ToolLocator;
use crate::io::workflow::{DeployParameters, UpdateParameters, Workflow};

/// One console interaction, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Ask(String),
    Tell(String),
    Error(String),
    Getpass(String),
}

/// Console that replays queued answers and records everything shown.
///
/// Running out of queued answers is an error, so a test fails instead of
/// hanging when a flow asks more than expected.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: RefCell<VecDeque<String>>,
    passwords: RefCell<VecDeque<String>>,
    transcript: RefCell<Vec<ConsoleEvent>>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str], passwords: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|s| s.to_string()).collect()),
            passwords: RefCell::new(passwords.iter().map(|s| s.to_string()).collect()),
            transcript: RefCell::new(Vec::new()),
        }
    }

    pub fn transcript(&self) -> Vec<ConsoleEvent> {
        self.transcript.borrow().clone()
    }

    fn collect(&self, pick: impl Fn(&ConsoleEvent) -> Option<&String>) -> Vec<String> {
        self.transcript
            .borrow()
            .iter()
            .filter_map(|event| pick(event).cloned())
            .collect()
    }

    /// Questions passed to `ask`.
    pub fn asked(&self) -> Vec<String> {
        self.collect(|event| match event {
            ConsoleEvent::Ask(text) => Some(text),
            _ => None,
        })
    }

    pub fn told(&self) -> Vec<String> {
        self.collect(|event| match event {
            ConsoleEvent::Tell(text) => Some(text),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.collect(|event| match event {
            ConsoleEvent::Error(text) => Some(text),
            _ => None,
        })
    }

    pub fn getpass_count(&self) -> usize {
        self.transcript
            .borrow()
            .iter()
            .filter(|event| matches!(event, ConsoleEvent::Getpass(_)))
            .count()
    }

    /// Reads from the user: `ask` plus `getpass`.
    pub fn interaction_count(&self) -> usize {
        self.asked().len() + self.getpass_count()
    }
}

impl Console for ScriptedConsole {
    fn ask(&self, prompt: &str) -> Result<String> {
        self.transcript
            .borrow_mut()
            .push(ConsoleEvent::Ask(prompt.to_string()));
        match self.answers.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("scripted console has no answer for: {prompt}"),
        }
    }

    fn tell(&self, message: &str) {
        self.transcript
            .borrow_mut()
            .push(ConsoleEvent::Tell(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.transcript
            .borrow_mut()
            .push(ConsoleEvent::Error(message.to_string()));
    }

    fn getpass(&self, prompt: &str) -> Result<String> {
        self.transcript
            .borrow_mut()
            .push(ConsoleEvent::Getpass(prompt.to_string()));
        match self.passwords.borrow_mut().pop_front() {
            Some(password) => Ok(password),
            None => bail!("scripted console has no password for: {prompt}"),
        }
    }
}

/// Projects keyed by id.
#[derive(Debug, Clone, Default)]
pub struct FakeProjectService {
    projects: HashMap<String, String>,
}

impl FakeProjectService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project_id: &str, name: &str) -> Self {
        self.projects
            .insert(project_id.to_string(), name.to_string());
        self
    }
}

impl ProjectService for FakeProjectService {
    fn get_project(&self, project_id: &str) -> Result<ProjectInfo> {
        let name = self
            .projects
            .get(project_id)
            .ok_or_else(|| anyhow!("project {project_id} not found"))?;
        Ok(ProjectInfo {
            project_id: project_id.to_string(),
            name: name.clone(),
        })
    }

    fn project_exists(&self, project_id: &str) -> Result<bool> {
        Ok(self.projects.contains_key(project_id))
    }
}

impl ProjectService for Rc<FakeProjectService> {
    fn get_project(&self, project_id: &str) -> Result<ProjectInfo> {
        self.as_ref().get_project(project_id)
    }

    fn project_exists(&self, project_id: &str) -> Result<bool> {
        self.as_ref().project_exists(project_id)
    }
}

pub fn billing_account(name: &str, display_name: &str) -> BillingAccount {
    BillingAccount {
        name: name.to_string(),
        display_name: display_name.to_string(),
        open: true,
    }
}

/// Billing service whose account list changes over successive calls.
///
/// Each `list_billing_accounts(true)` call consumes one scripted listing; the
/// last listing repeats forever. Listing all accounts peeks at the current one.
#[derive(Debug, Default)]
pub struct FakeBillingService {
    listings: RefCell<VecDeque<Vec<BillingAccount>>>,
    project_billing: HashMap<String, ProjectBillingInfo>,
}

impl FakeBillingService {
    pub fn new(listings: Vec<Vec<BillingAccount>>) -> Self {
        Self {
            listings: RefCell::new(listings.into()),
            ..Self::default()
        }
    }

    pub fn with_project_billing(mut self, project_id: &str, info: ProjectBillingInfo) -> Self {
        self.project_billing.insert(project_id.to_string(), info);
        self
    }
}

impl BillingService for FakeBillingService {
    fn list_billing_accounts(&self, only_open: bool) -> Result<Vec<BillingAccount>> {
        let mut listings = self.listings.borrow_mut();
        if only_open && listings.len() > 1 {
            return Ok(listings.pop_front().unwrap_or_default());
        }
        Ok(listings.front().cloned().unwrap_or_default())
    }

    fn get_billing_account(&self, project_id: &str) -> Result<ProjectBillingInfo> {
        Ok(self
            .project_billing
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl BillingService for Rc<FakeBillingService> {
    fn list_billing_accounts(&self, only_open: bool) -> Result<Vec<BillingAccount>> {
        self.as_ref().list_billing_accounts(only_open)
    }

    fn get_billing_account(&self, project_id: &str) -> Result<ProjectBillingInfo> {
        self.as_ref().get_billing_account(project_id)
    }
}

/// Auth service backed by a credentials file on disk.
#[derive(Debug)]
pub struct FakeAuthService {
    active_account: Option<String>,
    path: PathBuf,
    logins: Cell<usize>,
}

impl FakeAuthService {
    pub fn new(active_account: Option<&str>, credentials_path: &Path) -> Self {
        Self {
            active_account: active_account.map(str::to_string),
            path: credentials_path.to_path_buf(),
            logins: Cell::new(0),
        }
    }

    /// Interactive logins performed.
    pub fn logins(&self) -> usize {
        self.logins.get()
    }
}

impl AuthService for FakeAuthService {
    fn get_active_account(&self) -> Result<Option<String>> {
        Ok(self.active_account.clone())
    }

    fn create_default_credentials(&self) -> Result<Credentials> {
        self.logins.set(self.logins.get() + 1);
        Ok(Credentials {
            path: self.path.clone(),
            account: Some("new-login@example.com".to_string()),
        })
    }

    fn get_default_credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            path: self.path.clone(),
            account: self.active_account.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct RecordingBrowser {
    opened: RefCell<Vec<String>>,
    fail: bool,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the URL, then reports that no browser could be opened.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Browser for RecordingBrowser {
    fn open(&self, url: &str) -> Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        if self.fail {
            bail!("no browser available");
        }
        Ok(())
    }
}

/// Connector that hands out shared fakes and records the credentials used.
#[derive(Debug)]
pub struct FixedConnector {
    pub project: Rc<FakeProjectService>,
    pub billing: Rc<FakeBillingService>,
    connected: RefCell<Vec<Credentials>>,
}

impl FixedConnector {
    pub fn new(project: FakeProjectService, billing: FakeBillingService) -> Self {
        Self {
            project: Rc::new(project),
            billing: Rc::new(billing),
            connected: RefCell::new(Vec::new()),
        }
    }

    pub fn connected(&self) -> Vec<Credentials> {
        self.connected.borrow().clone()
    }
}

impl Connector for FixedConnector {
    fn connect(&self, credentials: &Credentials) -> Result<CloudServices> {
        self.connected.borrow_mut().push(credentials.clone());
        Ok(CloudServices {
            project: Box::new(Rc::clone(&self.project)),
            billing: Box::new(Rc::clone(&self.billing)),
        })
    }
}

#[derive(Debug, Default)]
pub struct RecordingWorkflow {
    deployed: RefCell<Vec<DeployParameters>>,
    updated: RefCell<Vec<UpdateParameters>>,
}

impl RecordingWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deployed(&self) -> Vec<DeployParameters> {
        self.deployed.borrow().clone()
    }

    pub fn updated(&self) -> Vec<UpdateParameters> {
        self.updated.borrow().clone()
    }
}

impl Workflow for RecordingWorkflow {
    fn create_and_deploy(&self, params: &DeployParameters) -> Result<()> {
        self.deployed.borrow_mut().push(params.clone());
        Ok(())
    }

    fn update_project(&self, params: &UpdateParameters) -> Result<()> {
        self.updated.borrow_mut().push(params.clone());
        Ok(())
    }
}

/// Locator that finds only the listed tools.
#[derive(Debug, Default)]
pub struct FixedLocator {
    found: Vec<String>,
}

impl FixedLocator {
    pub fn all() -> Self {
        Self::with(&["gcloud", "docker", "kubectl", "cloud_sql_proxy"])
    }

    pub fn with(tools: &[&str]) -> Self {
        Self {
            found: tools.iter().map(|tool| tool.to_string()).collect(),
        }
    }
}

impl ToolLocator for FixedLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.found
            .iter()
            .any(|found| found == tool)
            .then(|| PathBuf::from("/usr/local/bin").join(tool))
    }
}

/// Write an application-default-credentials file into `dir`.
pub fn write_credentials_file(dir: &Path) -> PathBuf {
    let path = dir.join("application_default_credentials.json");
    fs::write(&path, r#"{"type":"authorized_user"}"#).expect("write credentials file");
    path
}

/// Write `<dir>/.deploy/config.toml` with the given backend.
pub fn write_deploy_config(dir: &Path, backend: &str) {
    let path = deploy_config_path(dir);
    let parent = path.parent().expect("deploy config parent");
    fs::create_dir_all(parent).expect("create .deploy");
    fs::write(&path, format!("backend = \"{backend}\"\n")).expect("write deploy config");
}

/// Temporary directory holding a deployed project for `backend`.
pub fn deployed_project(backend: &str) -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("tempdir");
    write_deploy_config(temp.path(), backend);
    temp
}
