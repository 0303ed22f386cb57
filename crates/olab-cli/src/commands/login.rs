//! Login, logout and whoami commands.

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use crate::prompt;
use olab_auth::AuthContext;
use olab_core::config::AppConfig;
use olab_core::error::AppError;
use olab_entity::session::Credentials;

/// Arguments for login
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Read the password from this environment variable instead of prompting
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,
}

/// Session summary shown by whoami
#[derive(Debug, Serialize)]
struct WhoAmI {
    username: String,
    logged_in_at: String,
    expires_in: Option<u64>,
}

/// Log in and persist the session
pub async fn login(args: &LoginArgs, config: &AppConfig) -> Result<(), AppError> {
    let mut ctx = super::open_context(config).await?;

    let username = match &args.username {
        Some(u) => u.clone(),
        None => prompt::input("Username")?,
    };
    let password = match &args.password_env {
        Some(var) => std::env::var(var)
            .map_err(|_| AppError::validation(format!("Environment variable '{}' is not set", var)))?,
        None => prompt::password("Password")?,
    };

    let next = ctx
        .login(&Credentials {
            username: username.clone(),
            password,
        })
        .await?;

    output::print_success(&format!("Logged in as '{}'", username.trim()));
    output::print_kv("Next", &next);
    Ok(())
}

/// Drop the persisted session
pub async fn logout(config: &AppConfig) -> Result<(), AppError> {
    let mut ctx = super::open_context(config).await?;
    if ctx.session().is_none() {
        output::print_warning("Not logged in");
        return Ok(());
    }

    let next = ctx.logout().await?;
    ctx.teardown().await?;
    output::print_success("Logged out");
    output::print_kv("Next", &next);
    Ok(())
}

/// Show the logged-in user
pub async fn whoami(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let ctx = super::open_context(config).await?;
    print_session(&ctx, format)
}

/// Print the session held by `ctx`
pub fn print_session(ctx: &AuthContext, format: OutputFormat) -> Result<(), AppError> {
    let session = ctx
        .session()
        .ok_or_else(|| AppError::authentication("Not logged in"))?;

    let info = WhoAmI {
        username: session.username.clone(),
        logged_in_at: session.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        expires_in: session.auth_info.expires_in,
    };

    match format {
        OutputFormat::Json => output::print_item(&info, format),
        OutputFormat::Table => {
            output::print_kv("Username", &info.username);
            output::print_kv("Logged in at", &info.logged_in_at);
            if let Some(secs) = info.expires_in {
                output::print_kv("Expires in", &format!("{}s", secs));
            }
        }
    }
    Ok(())
}
