//! Access control list commands.
//!
//! `acl list` prints the rows matching a filter. `acl edit` opens a small
//! line-oriented editor over the staged table; nothing reaches the backend
//! until `save`.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use crate::prompt::{self, DialoguerConfirm};
use olab_admin::AclEditor;
use olab_admin::confirm::Confirm;
use olab_auth::Page;
use olab_core::config::AppConfig;
use olab_core::error::AppError;
use olab_core::result::AppResult;
use olab_core::types::{AclId, GroupId, MapId, NodeId, RoleId};
use olab_entity::acl::{AclRow, Permission};

/// Arguments for acl commands
#[derive(Debug, Args)]
pub struct AclArgs {
    /// ACL subcommand
    #[command(subcommand)]
    pub command: AclCommand,
}

/// Filter options shared by acl subcommands
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Group id
    #[arg(short, long)]
    pub group: Option<GroupId>,
    /// Role id
    #[arg(short, long)]
    pub role: Option<RoleId>,
    /// Map ids
    #[arg(long, value_delimiter = ',')]
    pub maps: Vec<MapId>,
    /// Node ids
    #[arg(long, value_delimiter = ',')]
    pub nodes: Vec<NodeId>,
}

/// ACL subcommands
#[derive(Debug, Subcommand)]
pub enum AclCommand {
    /// List ACL rows matching a filter
    List(FilterArgs),
    /// Edit ACL rows interactively
    Edit(FilterArgs),
}

/// ACL display row for table output
#[derive(Debug, Serialize, Tabled)]
struct AclDisplayRow {
    /// Row ID
    id: i64,
    /// Object type
    object: String,
    /// Object index
    index: i64,
    /// Group
    group: String,
    /// Role
    role: String,
    /// Permissions
    perms: String,
    /// Staged status
    status: String,
}

impl From<&AclRow> for AclDisplayRow {
    fn from(r: &AclRow) -> Self {
        let status = if r.is_pending_create() && !r.is_pending_delete() {
            "new".to_string()
        } else {
            r.status.to_string()
        };
        Self {
            id: r.id.get(),
            object: r.object_type.as_str().to_string(),
            index: r.object_index,
            group: r.group_name.clone(),
            role: r.role_name.clone(),
            perms: r.permission_string(),
            status,
        }
    }
}

/// One line of input to the ACL editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Choose the group filter (`None` for any).
    Group(Option<GroupId>),
    /// Choose the role filter (`None` for any).
    Role(Option<RoleId>),
    /// Replace the map selection.
    Maps(Vec<MapId>),
    /// Replace the node selection.
    Nodes(Vec<NodeId>),
    /// Reload rows for the filter.
    Load,
    /// Print the table.
    Show,
    /// Create rows for the selected objects.
    New,
    /// Flip one permission on a row.
    Toggle(AclId, Permission),
    /// Select rows.
    Select(Vec<AclId>),
    /// Toggle deletion on the selected rows.
    Delete,
    /// Send staged changes.
    Save,
    /// Empty the table.
    Clear,
    /// Print the command list.
    Help,
    /// Leave the editor.
    Quit,
}

const HELP: &str = "\
  group <id|any>          choose the group filter
  role <id|any>           choose the role filter
  maps [ids]              select maps (comma separated, empty clears)
  nodes [ids]             select nodes (comma separated, empty clears)
  load                    reload rows for the filter
  show                    print the table
  new                     create rows for the selected nodes or maps
  toggle <id> <r|w|x>     flip a permission
  select [ids]            select rows
  delete                  toggle deletion on the selected rows
  save                    send staged changes
  clear                   empty the table
  quit                    leave the editor";

fn parse_ids<T: std::str::FromStr>(raw: &str) -> AppResult<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| AppError::validation(format!("Invalid id: '{}'", s)))
        })
        .collect()
}

fn parse_optional_id<T: std::str::FromStr>(raw: Option<&str>) -> AppResult<Option<T>> {
    match raw {
        None | Some("any") | Some("*") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid id: '{}'", s))),
    }
}

/// Parse one editor line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> AppResult<Option<EditCommand>> {
    let line = line.trim();
    let Some((word, rest)) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .or(Some((line, "")))
        .filter(|(w, _)| !w.is_empty())
    else {
        return Ok(None);
    };
    let arg = Some(rest).filter(|r| !r.is_empty());

    let command = match word.to_lowercase().as_str() {
        "group" => EditCommand::Group(parse_optional_id(arg)?),
        "role" => EditCommand::Role(parse_optional_id(arg)?),
        "maps" => EditCommand::Maps(parse_ids(rest)?),
        "nodes" => EditCommand::Nodes(parse_ids(rest)?),
        "load" => EditCommand::Load,
        "show" | "ls" => EditCommand::Show,
        "new" => EditCommand::New,
        "toggle" => {
            let mut parts = rest.split_whitespace();
            let (Some(id), Some(perm), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(AppError::validation("Usage: toggle <id> <r|w|x>"));
            };
            let id = id
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid id: '{}'", id)))?;
            EditCommand::Toggle(id, perm.parse()?)
        }
        "select" => EditCommand::Select(parse_ids(rest)?),
        "delete" | "del" => EditCommand::Delete,
        "save" => EditCommand::Save,
        "clear" => EditCommand::Clear,
        "help" | "?" => EditCommand::Help,
        "quit" | "exit" | "q" => EditCommand::Quit,
        other => {
            return Err(AppError::validation(format!(
                "Unknown command '{}'. Type 'help' for the list.",
                other
            )));
        }
    };
    Ok(Some(command))
}

/// Execute acl commands
pub async fn execute(
    args: &AclArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = super::require_page(config, Page::Acls).await?;
    let mut editor = AclEditor::new(ctx.api(), ctx.token()?);

    match &args.command {
        AclCommand::List(filter) => {
            apply_filter(&mut editor, filter);
            editor.load().await?;
            print_table(&editor, format);
        }
        AclCommand::Edit(filter) => {
            editor.init().await?;
            apply_filter(&mut editor, filter);
            editor.load().await?;
            run_editor(&mut editor, format, &DialoguerConfirm).await?;
        }
    }

    Ok(())
}

fn apply_filter(editor: &mut AclEditor, args: &FilterArgs) {
    let filter = editor.filter_mut();
    filter.set_group(args.group);
    filter.set_role(args.role);
    filter.select_maps(args.maps.iter().copied());
    filter.select_nodes(args.nodes.iter().copied());
}

fn print_table(editor: &AclEditor, format: OutputFormat) {
    let rows: Vec<AclDisplayRow> = editor.table().rows().iter().map(AclDisplayRow::from).collect();
    output::print_list(&rows, format);
}

/// Apply one parsed command. Returns `false` when the editor should close.
pub async fn apply(
    editor: &mut AclEditor,
    command: EditCommand,
    format: OutputFormat,
    confirm: &dyn Confirm,
) -> AppResult<bool> {
    match command {
        EditCommand::Group(id) => editor.filter_mut().set_group(id),
        EditCommand::Role(id) => editor.filter_mut().set_role(id),
        EditCommand::Maps(ids) => editor.filter_mut().select_maps(ids),
        EditCommand::Nodes(ids) => editor.filter_mut().select_nodes(ids),
        EditCommand::Load => {
            if editor.table().has_pending_changes() {
                output::print_warning("Reloading discards staged changes");
            }
            editor.load().await?;
            print_table(editor, format);
        }
        EditCommand::Show => print_table(editor, format),
        EditCommand::New => {
            let created = editor.create_rows();
            if created.is_empty() {
                output::print_warning("Select nodes or maps first");
            } else {
                output::print_success(&format!("Added {} row(s)", created.len()));
            }
        }
        EditCommand::Toggle(id, permission) => {
            editor.cell_clicked(id, permission.as_str())?;
        }
        EditCommand::Select(ids) => {
            let count = editor.select(ids);
            output::print_success(&format!("{} row(s) selected", count));
        }
        EditCommand::Delete => editor.mark_selected_deleted(),
        EditCommand::Save => {
            if editor.save(confirm).await?.is_none() {
                println!("Cancelled.");
            }
        }
        EditCommand::Clear => {
            if !editor.clear(confirm)? {
                println!("Cancelled.");
            }
        }
        EditCommand::Help => println!("{}", HELP),
        EditCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Read commands until `quit`. Command errors are printed and the loop
/// continues.
pub async fn run_editor(
    editor: &mut AclEditor,
    format: OutputFormat,
    confirm: &dyn Confirm,
) -> AppResult<()> {
    print_table(editor, format);
    println!("Type 'help' for commands.");

    loop {
        let line = prompt::input("acl")?;
        let keep_going = match parse_line(&line) {
            Ok(Some(command)) => match apply(editor, command, format, confirm).await {
                Ok(keep_going) => keep_going,
                Err(e) => {
                    // Load and save failures are already queued as alerts.
                    if editor.alerts_mut().is_empty() {
                        output::print_error(&e.to_string());
                    }
                    true
                }
            },
            Ok(None) => true,
            Err(e) => {
                output::print_error(&e.to_string());
                true
            }
        };
        output::print_alerts(editor.alerts_mut());

        if !keep_going {
            if editor.table().has_pending_changes() {
                output::print_warning("Leaving with unsaved ACL changes");
            }
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olab_admin::confirm::AutoConfirm;
    use olab_client::{ApiCall, MemoryAdminApi};
    use std::sync::Arc;

    #[test]
    fn test_parse_filter_commands() {
        assert_eq!(
            parse_line("group 3").unwrap(),
            Some(EditCommand::Group(Some(GroupId(3))))
        );
        assert_eq!(parse_line("role any").unwrap(), Some(EditCommand::Role(None)));
        assert_eq!(
            parse_line("  nodes 4, 5 ,6 ").unwrap(),
            Some(EditCommand::Nodes(vec![NodeId(4), NodeId(5), NodeId(6)]))
        );
        assert_eq!(parse_line("maps").unwrap(), Some(EditCommand::Maps(vec![])));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_toggle() {
        assert_eq!(
            parse_line("toggle -2 w").unwrap(),
            Some(EditCommand::Toggle(AclId(-2), Permission::Write))
        );
        assert!(parse_line("toggle 1").is_err());
        assert!(parse_line("toggle 1 z").is_err());
        assert!(parse_line("toggle x r").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = parse_line("frobnicate").unwrap_err();
        assert!(err.message.contains("frobnicate"));
        assert!(parse_line("select 1,two").is_err());
    }

    #[tokio::test]
    async fn test_script_creates_and_saves_rows() {
        let api = MemoryAdminApi::new();
        let mut editor = AclEditor::new(Arc::new(api.clone()), MemoryAdminApi::TOKEN);
        let confirm = AutoConfirm(true);

        for line in ["nodes 7,8", "new", "toggle -1 r", "select -2", "delete", "save"] {
            let command = parse_line(line).unwrap().unwrap();
            assert!(apply(&mut editor, command, OutputFormat::Json, &confirm)
                .await
                .unwrap());
        }

        assert_eq!(api.calls().await, vec![ApiCall::PostAcl(AclId(-1))]);
        let rows = editor.table().rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, AclId(1000));
        assert!(rows[0].read);

        let quit = parse_line("quit").unwrap().unwrap();
        assert!(!apply(&mut editor, quit, OutputFormat::Json, &confirm)
            .await
            .unwrap());
    }
}
