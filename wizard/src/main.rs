//! `django-deploy`: collect deployment parameters and hand them to the
//! deployment workflow.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use wizard::core::answers::Answers;
use wizard::core::keys::ParamKey;
use wizard::core::types::ProjectCreationMode;
use wizard::exit_codes;
use wizard::io::auth::GcloudAuthService;
use wizard::io::browser::SystemBrowser;
use wizard::io::cloud::GcloudConnector;
use wizard::io::config::{WizardConfig, load_config_or_default};
use wizard::io::console::TerminalConsole;
use wizard::io::gcloud::Gcloud;
use wizard::io::requirements::PathLocator;
use wizard::io::workflow::{CommandWorkflow, DryRunWorkflow, Workflow};
use wizard::logging;
use wizard::prompt::poll::{CancelToken, PollSettings};
use wizard::update::{UpdateOutcome, Updater};
use wizard::wizard::{BillingSettings, Wizard, run_new};

#[derive(Parser, Debug)]
#[command(
    name = "django-deploy",
    version,
    about = "Create and deploy Django projects on Google Cloud Platform"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new Django project and deploy it.
    New(NewArgs),
    /// Update an already-deployed Django project.
    Update(UpdateArgs),
}

/// Options shared by every command.
#[derive(Args, Debug)]
struct CommonArgs {
    /// Print the collected parameters instead of running the workflow.
    #[arg(long)]
    dry_run: bool,
    /// Config file (defaults to the user config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct NewArgs {
    /// Deploy into an existing Google Cloud project instead of creating one.
    #[arg(long)]
    use_existing_project: bool,
    /// Application-default-credentials file to use.
    #[arg(long, value_name = "PATH")]
    credentials: Option<String>,
    #[arg(long)]
    project_id: Option<String>,
    #[arg(long)]
    project_name: Option<String>,
    /// Billing account resource name, e.g. `billingAccounts/0X0X0X-0X0X0X-0X0X0X`.
    #[arg(long)]
    billing_account: Option<String>,
    #[arg(long)]
    database_password: Option<String>,
    /// Directory to store the generated project source.
    #[arg(long, value_name = "PATH")]
    project_path: Option<String>,
    #[arg(long)]
    django_project_name: Option<String>,
    #[arg(long)]
    django_app_name: Option<String>,
    #[arg(long)]
    django_superuser_login: Option<String>,
    #[arg(long)]
    django_superuser_password: Option<String>,
    #[arg(long)]
    django_superuser_email: Option<String>,
    #[command(flatten)]
    common: CommonArgs,
}

impl NewArgs {
    fn supplied(&self) -> Answers {
        let values = [
            (ParamKey::Credentials, &self.credentials),
            (ParamKey::ProjectId, &self.project_id),
            (ParamKey::ProjectName, &self.project_name),
            (ParamKey::BillingAccountName, &self.billing_account),
            (ParamKey::DatabasePassword, &self.database_password),
            (ParamKey::DjangoDirectoryPath, &self.project_path),
            (ParamKey::DjangoProjectName, &self.django_project_name),
            (ParamKey::DjangoAppName, &self.django_app_name),
            (ParamKey::DjangoSuperuserLogin, &self.django_superuser_login),
            (ParamKey::DjangoSuperuserPassword, &self.django_superuser_password),
            (ParamKey::DjangoSuperuserEmail, &self.django_superuser_email),
        ];
        Answers::seeded(
            ProjectCreationMode::from_use_existing(self.use_existing_project),
            supplied_values(values),
        )
    }
}

#[derive(Args, Debug)]
struct UpdateArgs {
    /// Application-default-credentials file to use.
    #[arg(long, value_name = "PATH")]
    credentials: Option<String>,
    #[arg(long)]
    database_password: Option<String>,
    /// Directory of the deployed Django project.
    #[arg(long, value_name = "PATH")]
    project_path: Option<String>,
    #[command(flatten)]
    common: CommonArgs,
}

impl UpdateArgs {
    fn supplied(&self) -> Answers {
        let values = [
            (ParamKey::Credentials, &self.credentials),
            (ParamKey::DatabasePassword, &self.database_password),
            (ParamKey::DjangoDirectoryPath, &self.project_path),
        ];
        Answers::seeded(ProjectCreationMode::MustExist, supplied_values(values))
    }
}

fn supplied_values<'a>(
    values: impl IntoIterator<Item = (ParamKey, &'a Option<String>)>,
) -> impl Iterator<Item = (ParamKey, String)> {
    values
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key, value)))
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::New(args) => cmd_new(&args),
        Command::Update(args) => cmd_update(&args),
    }
}

fn load_config(common: &CommonArgs) -> Result<WizardConfig> {
    let cfg = load_config_or_default(common.config.as_deref())?;
    debug!(?cfg, "config loaded");
    Ok(cfg)
}

fn workflow_for(common: &CommonArgs, cfg: &WizardConfig) -> Box<dyn Workflow> {
    if common.dry_run {
        Box::new(DryRunWorkflow)
    } else {
        Box::new(CommandWorkflow::new(cfg.workflow.command.clone()))
    }
}

fn cmd_new(args: &NewArgs) -> Result<i32> {
    let cfg = load_config(&args.common)?;
    let home = dirs::home_dir().context("could not determine the home directory")?;
    let console = TerminalConsole::new();
    let auth = GcloudAuthService::new(Gcloud::new(cfg.gcloud.clone()));
    let connector = GcloudConnector::new(cfg.gcloud.clone());
    let wizard = Wizard {
        console: &console,
        auth: &auth,
        connector: &connector,
        browser: &SystemBrowser,
        billing: BillingSettings {
            create_url: cfg.billing.create_url.clone(),
            poll: PollSettings::new(cfg.billing.poll_interval(), cfg.billing.poll_timeout()),
        },
        home,
        cancel: CancelToken::new(),
    };
    let workflow = workflow_for(&args.common, &cfg);
    run_new(&wizard, &args.supplied(), workflow.as_ref())?;
    Ok(exit_codes::OK)
}

fn cmd_update(args: &UpdateArgs) -> Result<i32> {
    let cfg = load_config(&args.common)?;
    let cwd = std::env::current_dir().context("read current directory")?;
    let console = TerminalConsole::new();
    let auth = GcloudAuthService::new(Gcloud::new(cfg.gcloud.clone()));
    let updater = Updater {
        console: &console,
        auth: &auth,
        locator: &PathLocator,
        cwd,
    };
    let workflow = workflow_for(&args.common, &cfg);
    match updater.run(&args.supplied(), workflow.as_ref())? {
        UpdateOutcome::Updated => Ok(exit_codes::OK),
        UpdateOutcome::MissingTools(_) => Ok(exit_codes::MISSING_TOOLS),
    }
}
