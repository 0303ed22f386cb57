//! User management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use crate::prompt;
use olab_admin::UserEditor;
use olab_auth::Page;
use olab_core::config::AppConfig;
use olab_core::error::AppError;
use olab_core::types::UserId;
use olab_entity::user::User;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Delete users by id
    Delete {
        /// User ids
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<UserId>,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Import users from an .xlsx spreadsheet
    Import {
        /// Spreadsheet path
        file: PathBuf,
    },
    /// Export users as JSON
    Export {
        /// User ids
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<UserId>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct UserRow {
    /// User ID
    id: i64,
    /// Username
    username: String,
    /// Nickname
    nick_name: String,
    /// Email
    email: String,
    /// Group/role memberships
    roles: usize,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.get(),
            username: u.username.clone(),
            nick_name: u.nick_name.clone().unwrap_or_default(),
            email: u.email.clone().unwrap_or_default(),
            roles: u.roles.len(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = super::require_page(config, Page::Users).await?;
    let mut editor = UserEditor::new(ctx.api(), ctx.token()?);
    editor.load().await?;

    let result = match &args.command {
        UserCommand::List => {
            print_users(editor.users(), format);
            Ok(())
        }
        UserCommand::Delete { ids, force } => {
            let confirm = prompt::confirmer(*force);
            let deleted = editor.delete_selected(ids, confirm.as_ref()).await;
            if let Ok(false) = deleted {
                println!("Cancelled.");
            }
            deleted.map(|_| ())
        }
        UserCommand::Import { file } => editor.import_file(file).await.map(|_| ()),
        UserCommand::Export { ids, output: out_path } => {
            if !editor.set_selection(ids.iter().copied()) {
                return Err(AppError::not_found("None of the given users exist"));
            }
            export(&editor, out_path.as_deref())
        }
    };

    // Failures are queued as alerts too; the returned error reports them.
    if result.is_ok() {
        output::print_alerts(editor.alerts_mut());
    }
    result
}

/// Print users in the selected format
pub(crate) fn print_users(users: &[User], format: OutputFormat) {
    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    output::print_list(&rows, format);
}

/// Export the editor's selection to a file or stdout
pub(crate) fn export(
    editor: &UserEditor,
    out_path: Option<&std::path::Path>,
) -> Result<(), AppError> {
    match out_path {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let count = editor.export_selected(file)?;
            output::print_success(&format!(
                "Exported {} user(s) to '{}'",
                count,
                path.display()
            ));
        }
        None => {
            editor.export_selected(std::io::stdout().lock())?;
            println!();
        }
    }
    Ok(())
}
