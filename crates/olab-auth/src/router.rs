//! Route table splitting the public login page from the protected
//! dashboard pages.

use std::fmt;

use olab_core::config::router::RouterConfig;
use olab_core::error::AppError;
use olab_core::result::AppResult;

use crate::gate::AuthState;

/// A page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Login form.
    Login,
    /// Landing page after login.
    Home,
    /// User list and detail.
    Users,
    /// ACL editor.
    Acls,
    /// Current user's profile.
    Profile,
    /// Client settings.
    Settings,
}

impl Page {
    /// Every page, login first.
    pub const ALL: [Page; 6] = [
        Self::Login,
        Self::Home,
        Self::Users,
        Self::Acls,
        Self::Profile,
        Self::Settings,
    ];

    /// Whether the page needs a logged-in user.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Title shown in menus.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Home => "Home",
            Self::Users => "Users",
            Self::Acls => "Access Control Lists (ACL)",
            Self::Profile => "Profile",
            Self::Settings => "Settings",
        }
    }

    fn segment(&self) -> Option<&'static str> {
        match self {
            Self::Login => None,
            Self::Home => Some("home"),
            Self::Users => Some("users"),
            Self::Acls => Some("acls"),
            Self::Profile => Some("profile"),
            Self::Settings => Some("settings"),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Outcome of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The session lookup has not settled; show a loading indicator.
    Pending,
    /// Show the page.
    Render(Page),
    /// Go to another path instead.
    Redirect(String),
}

/// Path templates under a configurable base path.
#[derive(Debug, Clone)]
pub struct Router {
    base_path: String,
}

impl Router {
    /// Create a router from configuration.
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            base_path: normalize_base(&config.base_path),
        }
    }

    /// The normalized base path (empty for the root).
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Path of the given page.
    pub fn path_for(&self, page: Page) -> String {
        match page.segment() {
            None if self.base_path.is_empty() => "/".to_string(),
            None => self.base_path.clone(),
            Some(segment) => format!("{}/dashboard/{}", self.base_path, segment),
        }
    }

    /// Every route with its page, in menu order.
    pub fn routes(&self) -> Vec<(String, Page)> {
        Page::ALL.iter().map(|p| (self.path_for(*p), *p)).collect()
    }

    /// Map a path to its page.
    pub fn resolve(&self, path: &str) -> AppResult<Page> {
        let wanted = normalize_path(path);
        Page::ALL
            .iter()
            .copied()
            .find(|p| self.path_for(*p) == wanted)
            .ok_or_else(|| AppError::not_found(format!("No route for '{path}'")))
    }

    /// Decide what to show for `path` given the auth state.
    pub fn navigate(&self, path: &str, state: &AuthState) -> AppResult<Navigation> {
        let page = self.resolve(path)?;
        Ok(match state {
            AuthState::Loading => Navigation::Pending,
            AuthState::Unauthenticated if page.is_protected() => {
                Navigation::Redirect(self.path_for(Page::Login))
            }
            AuthState::Authenticated(_) if !page.is_protected() => {
                Navigation::Redirect(self.path_for(Page::Home))
            }
            _ => Navigation::Render(page),
        })
    }
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
