//! Group and role listings.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use olab_auth::Page;
use olab_core::config::AppConfig;
use olab_core::error::AppError;
use olab_entity::reference::{Group, Role};

/// Group or role display row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct NameRow {
    /// ID
    id: i64,
    /// Name
    name: String,
}

impl From<&Group> for NameRow {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id.get(),
            name: g.name.clone(),
        }
    }
}

impl From<&Role> for NameRow {
    fn from(r: &Role) -> Self {
        Self {
            id: r.id.get(),
            name: r.name.clone(),
        }
    }
}

/// List groups
pub async fn groups(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let ctx = super::require_page(config, Page::Acls).await?;
    let groups = ctx.api().get_groups(ctx.token()?).await?;

    let rows: Vec<NameRow> = groups.iter().map(NameRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

/// List roles
pub async fn roles(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let ctx = super::require_page(config, Page::Acls).await?;
    let roles = ctx.api().get_roles(ctx.token()?).await?;

    let rows: Vec<NameRow> = roles.iter().map(NameRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
