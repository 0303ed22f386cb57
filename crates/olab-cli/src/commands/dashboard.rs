//! Interactive dashboard: a menu over the dashboard pages.

use std::path::PathBuf;

use crate::output::{self, OutputFormat};
use crate::prompt::{self, DialoguerConfirm};
use olab_admin::{AclEditor, UserEditor};
use olab_auth::{AuthContext, Navigation, Page};
use olab_core::config::AppConfig;
use olab_core::error::AppError;
use olab_core::result::AppResult;
use olab_core::types::UserId;
use olab_entity::session::Credentials;

const MENU: [Page; 5] = [Page::Home, Page::Users, Page::Acls, Page::Profile, Page::Settings];

/// Run the dashboard until the operator quits or logs out
pub async fn run(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let mut ctx = super::open_context(config).await?;

    if let Navigation::Redirect(_) = ctx.navigate(&ctx.router().path_for(Page::Login))? {
        tracing::debug!("Restored persisted session");
    } else {
        login_page(&mut ctx).await?;
    }

    let mut entries: Vec<String> = MENU.iter().map(|p| p.title().to_string()).collect();
    entries.push("Logout".to_string());
    entries.push("Quit".to_string());

    loop {
        let choice = prompt::select("Dashboard", &entries)?;
        let Some(page) = MENU.get(choice).copied() else {
            if choice == MENU.len() {
                let next = ctx.logout().await?;
                output::print_success("Logged out");
                tracing::debug!(next = %next, "Left dashboard");
            }
            break;
        };

        let page = ctx.require(page)?;
        let result = match page {
            Page::Home => {
                home_page(&ctx);
                Ok(())
            }
            Page::Users => users_page(&ctx, format).await,
            Page::Acls => acls_page(&ctx, format).await,
            Page::Profile => super::login::print_session(&ctx, format),
            Page::Settings => {
                super::config::print_summary(config);
                Ok(())
            }
            Page::Login => Ok(()),
        };

        if let Err(e) = result {
            output::print_error(&e.to_string());
        }
    }

    ctx.teardown().await
}

async fn login_page(ctx: &mut AuthContext) -> AppResult<()> {
    const ATTEMPTS: usize = 3;

    for _ in 0..ATTEMPTS {
        let credentials = Credentials {
            username: prompt::input("Username")?,
            password: prompt::password("Password")?,
        };
        match ctx.login(&credentials).await {
            Ok(_) => {
                output::print_success(&format!("Welcome, {}", credentials.username.trim()));
                return Ok(());
            }
            Err(e) => output::print_error(&e.to_string()),
        }
    }
    Err(AppError::authentication("Too many failed login attempts"))
}

fn home_page(ctx: &AuthContext) {
    if let Some(session) = ctx.session() {
        println!("Logged in as {}.", session.username);
    }
    println!("Choose Users to manage accounts or ACLs to edit access control lists.");
}

async fn users_page(ctx: &AuthContext, format: OutputFormat) -> AppResult<()> {
    let mut editor = UserEditor::new(ctx.api(), ctx.token()?);
    editor.load().await?;

    const ACTIONS: [&str; 6] = [
        "List users",
        "Edit user",
        "Delete users",
        "Import spreadsheet",
        "Export users",
        "Back",
    ];

    loop {
        let result = match prompt::select("Users", &ACTIONS)? {
            0 => {
                super::user::print_users(editor.users(), format);
                Ok(())
            }
            1 => edit_user(&mut editor).await,
            2 => {
                let ids = read_user_ids()?;
                editor
                    .delete_selected(&ids, &DialoguerConfirm)
                    .await
                    .map(|_| ())
            }
            3 => {
                let path = PathBuf::from(prompt::input("Spreadsheet (.xlsx)")?);
                editor.import_file(&path).await.map(|_| ())
            }
            4 => {
                let ids = read_user_ids()?;
                if editor.set_selection(ids) {
                    super::user::export(&editor, None)
                } else {
                    Err(AppError::not_found("None of the given users exist"))
                }
            }
            _ => return Ok(()),
        };

        // Editor failures were queued as alerts; anything else is printed here.
        if let Err(e) = result {
            if editor.alerts_mut().is_empty() {
                output::print_error(&e.to_string());
            }
        }
        output::print_alerts(editor.alerts_mut());
    }
}

fn read_user_ids() -> AppResult<Vec<UserId>> {
    prompt::input("User ids (comma separated)")?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| AppError::validation(format!("Invalid id: '{}'", s)))
        })
        .collect()
}

async fn edit_user(editor: &mut UserEditor) -> AppResult<()> {
    let id: UserId = prompt::input("User id")?
        .parse()
        .map_err(|_| AppError::validation("Invalid user id"))?;
    let mut detail = editor.select_row(id)?.clone();

    println!("Leave a field empty to keep its current value.");
    let username = prompt::input(&format!("Username [{}]", detail.user.username))?;
    if !username.trim().is_empty() {
        detail.user.username = username.trim().to_string();
    }
    let email = prompt::input(&format!(
        "Email [{}]",
        detail.user.email.as_deref().unwrap_or("")
    ))?;
    if !email.trim().is_empty() {
        detail.user.email = Some(email.trim().to_string());
    }
    let password = prompt::optional_password("New password (empty keeps current)")?;
    if !password.is_empty() {
        detail.verify_password = prompt::password("Verify password")?;
        detail.password = password;
    }

    editor.save_detail(detail).await.map(|_| ())
}

async fn acls_page(ctx: &AuthContext, format: OutputFormat) -> AppResult<()> {
    let mut editor = AclEditor::new(ctx.api(), ctx.token()?);
    editor.init().await?;
    editor.load().await?;
    super::acl::run_editor(&mut editor, format, &DialoguerConfirm).await
}
