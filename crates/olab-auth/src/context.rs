//! The session object injected into every page.
//!
//! Replaces a global "current user" with an explicit value that owns the
//! gate, the route table and the API handle, with `init`/`teardown`
//! bracketing its lifetime.

use std::sync::Arc;

use tracing::info;

use olab_client::AdminApi;
use olab_core::error::AppError;
use olab_core::result::AppResult;
use olab_entity::session::{Credentials, UserSession};

use crate::gate::{AuthGate, AuthState};
use crate::router::{Navigation, Page, Router};
use crate::storage::SessionStorage;

/// Login state and navigation shared by all pages.
pub struct AuthContext {
    api: Arc<dyn AdminApi>,
    gate: AuthGate,
    router: Router,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("gate", &self.gate)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Create a context; call [`AuthContext::init`] before use.
    pub fn new(
        api: Arc<dyn AdminApi>,
        storage: Arc<dyn SessionStorage>,
        session_key: impl Into<String>,
        router: Router,
    ) -> Self {
        Self {
            api,
            gate: AuthGate::new(storage, session_key),
            router,
        }
    }

    /// Resolve the persisted session.
    pub async fn init(&mut self) -> AppResult<&AuthState> {
        self.gate.resolve().await
    }

    /// Flush storage and return to the unresolved state.
    pub async fn teardown(&mut self) -> AppResult<()> {
        self.gate.reset().await
    }

    /// Current auth state.
    pub fn state(&self) -> &AuthState {
        self.gate.state()
    }

    /// The logged-in session, if any.
    pub fn session(&self) -> Option<&UserSession> {
        self.gate.state().session()
    }

    /// Bearer token of the logged-in session.
    pub fn token(&self) -> AppResult<&str> {
        self.session()
            .map(UserSession::token)
            .ok_or_else(|| AppError::authentication("Not logged in"))
    }

    /// The API handle pages use.
    pub fn api(&self) -> Arc<dyn AdminApi> {
        Arc::clone(&self.api)
    }

    /// The route table.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Log in, persist the session and return the path to show next.
    pub async fn login(&mut self, credentials: &Credentials) -> AppResult<String> {
        if credentials.username.trim().is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if credentials.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let auth_info = self.api.login(credentials).await?;
        self.gate
            .store(UserSession::new(credentials.username.trim(), auth_info))
            .await?;

        info!(username = %credentials.username.trim(), "Logged in");
        Ok(self.router.path_for(Page::Home))
    }

    /// Drop the session and return the login path.
    pub async fn logout(&mut self) -> AppResult<String> {
        if let Some(session) = self.session() {
            info!(username = %session.username, "Logged out");
        }
        self.gate.clear().await?;
        Ok(self.router.path_for(Page::Login))
    }

    /// Navigate to `path` under the current auth state.
    pub fn navigate(&self, path: &str) -> AppResult<Navigation> {
        self.router.navigate(path, self.gate.state())
    }

    /// Navigate to `page`, returning the page to render or an error when
    /// the gate redirects elsewhere.
    pub fn require(&self, page: Page) -> AppResult<Page> {
        match self.navigate(&self.router.path_for(page))? {
            Navigation::Render(page) => Ok(page),
            Navigation::Pending => Err(AppError::session("Session is still loading")),
            Navigation::Redirect(to) if page.is_protected() => Err(AppError::authentication(
                format!("Login required (redirecting to {to})"),
            )),
            Navigation::Redirect(to) => Err(AppError::session(format!(
                "Already logged in (redirecting to {to})"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionStorage;
    use olab_client::MemoryAdminApi;
    use olab_core::config::router::RouterConfig;
    use olab_core::error::ErrorKind;

    async fn context(storage: Arc<MemorySessionStorage>) -> AuthContext {
        let api = MemoryAdminApi::new();
        api.add_account("admin", "secret").await;
        AuthContext::new(
            Arc::new(api),
            storage,
            "user",
            Router::new(&RouterConfig::default()),
        )
    }

    fn creds(password: &str) -> Credentials {
        Credentials {
            username: "admin".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_and_logout_clears() {
        let storage = Arc::new(MemorySessionStorage::new());
        let mut ctx = context(storage.clone()).await;
        ctx.init().await.unwrap();
        assert!(ctx.token().is_err());

        let next = ctx.login(&creds("secret")).await.unwrap();
        assert_eq!(next, "/dashboard/home");
        assert_eq!(ctx.token().unwrap(), MemoryAdminApi::TOKEN);
        assert!(storage.get("user").await.unwrap().is_some());

        let next = ctx.logout().await.unwrap();
        assert_eq!(next, "/");
        assert_eq!(storage.get("user").await.unwrap(), None);
        assert_eq!(ctx.state(), &AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_failed_login_stays_unauthenticated() {
        let mut ctx = context(Arc::new(MemorySessionStorage::new())).await;
        ctx.init().await.unwrap();

        let err = ctx.login(&creds("wrong")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(ctx.state(), &AuthState::Unauthenticated);

        let err = ctx.login(&creds("")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_session_restored_on_next_init() {
        let storage = Arc::new(MemorySessionStorage::new());
        let mut first = context(storage.clone()).await;
        first.init().await.unwrap();
        first.login(&creds("secret")).await.unwrap();
        first.teardown().await.unwrap();
        assert!(first.state().is_loading());

        let mut second = context(storage).await;
        assert!(second.require(Page::Users).is_err());
        second.init().await.unwrap();
        assert_eq!(second.require(Page::Users).unwrap(), Page::Users);
        assert!(second.require(Page::Login).is_err());
    }
}
