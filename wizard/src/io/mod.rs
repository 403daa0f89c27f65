//! Side-effecting collaborators for wizard commands.

pub mod auth;
pub mod billing;
pub mod browser;
pub mod cloud;
pub mod config;
pub mod console;
pub mod deploy_config;
pub mod gcloud;
pub mod process;
pub mod project;
pub mod requirements;
pub mod workflow;
