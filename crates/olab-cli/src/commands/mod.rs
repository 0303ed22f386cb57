//! CLI command definitions and dispatch.

pub mod acl;
pub mod config;
pub mod dashboard;
pub mod login;
pub mod reference;
pub mod routes;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use olab_auth::{AuthContext, FileSessionStorage, Page, Router};
use olab_client::HttpAdminApi;
use olab_core::config::AppConfig;
use olab_core::error::AppError;

/// OLab: administration dashboard for the OLab backend
#[derive(Debug, Parser)]
#[command(name = "olab", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login(login::LoginArgs),
    /// Drop the persisted session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List dashboard routes
    Routes,
    /// Resolve a dashboard path under the current session
    Open(routes::OpenArgs),
    /// User management
    Users(user::UserArgs),
    /// List groups
    Groups,
    /// List roles
    Roles,
    /// Access control list management
    Acl(acl::AclArgs),
    /// Interactive dashboard
    Dashboard,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Login(args) => login::login(args, config).await,
            Commands::Logout => login::logout(config).await,
            Commands::Whoami => login::whoami(config, self.format).await,
            Commands::Routes => routes::list(config, self.format),
            Commands::Open(args) => routes::open(args, config).await,
            Commands::Users(args) => user::execute(args, config, self.format).await,
            Commands::Groups => reference::groups(config, self.format).await,
            Commands::Roles => reference::roles(config, self.format).await,
            Commands::Acl(args) => acl::execute(args, config, self.format).await,
            Commands::Dashboard => dashboard::run(config, self.format).await,
            Commands::Config(args) => config::execute(args, config, self.format),
        }
    }
}

/// Helper: build the session context from config and resolve the
/// persisted login.
pub async fn open_context(config: &AppConfig) -> Result<AuthContext, AppError> {
    let api = HttpAdminApi::new(&config.api)?;
    let storage = FileSessionStorage::open(&config.session.storage_path).await?;

    let mut ctx = AuthContext::new(
        Arc::new(api),
        Arc::new(storage),
        config.session.key.clone(),
        Router::new(&config.router),
    );
    ctx.init().await?;
    Ok(ctx)
}

/// Helper: open the context and require a logged-in session for `page`.
pub async fn require_page(config: &AppConfig, page: Page) -> Result<AuthContext, AppError> {
    let ctx = open_context(config).await?;
    ctx.require(page)?;
    Ok(ctx)
}
