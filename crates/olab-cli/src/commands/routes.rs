//! Route table commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use olab_auth::{Navigation, Router};
use olab_core::config::AppConfig;
use olab_core::error::AppError;

/// Arguments for open
#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Dashboard path, e.g. /dashboard/acls
    pub path: String,
}

/// Route display row
#[derive(Debug, Serialize, Tabled)]
struct RouteRow {
    /// Path
    path: String,
    /// Page
    page: String,
    /// Login required
    protected: String,
}

/// List dashboard routes
pub fn list(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let router = Router::new(&config.router);
    let rows: Vec<RouteRow> = router
        .routes()
        .into_iter()
        .map(|(path, page)| RouteRow {
            path,
            page: page.title().to_string(),
            protected: if page.is_protected() { "✓" } else { "✗" }.to_string(),
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}

/// Resolve a path under the current session
pub async fn open(args: &OpenArgs, config: &AppConfig) -> Result<(), AppError> {
    let ctx = super::open_context(config).await?;

    match ctx.navigate(&args.path)? {
        Navigation::Render(page) => output::print_success(&format!("Render: {}", page)),
        Navigation::Redirect(to) => output::print_warning(&format!("Redirect: {}", to)),
        Navigation::Pending => output::print_warning("Session still loading"),
    }
    Ok(())
}
