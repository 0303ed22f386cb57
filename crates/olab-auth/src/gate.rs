//! Auth gate: resolves the persisted session before protected pages render.

use std::sync::Arc;

use tracing::{debug, info, warn};

use olab_core::result::AppResult;
use olab_entity::session::UserSession;

use crate::storage::SessionStorage;

/// Where the gate is in resolving the current user.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// The persisted session has not been read yet.
    Loading,
    /// A session was found.
    Authenticated(UserSession),
    /// No usable session exists.
    Unauthenticated,
}

impl AuthState {
    /// The session, when authenticated.
    pub fn session(&self) -> Option<&UserSession> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Whether the lookup is still outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Gate over the persisted session.
///
/// Starts in [`AuthState::Loading`] and settles once
/// [`AuthGate::resolve`] has read the store.
#[derive(Debug)]
pub struct AuthGate {
    storage: Arc<dyn SessionStorage>,
    key: String,
    state: AuthState,
}

impl AuthGate {
    /// Create a gate reading the session stored under `key`.
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            state: AuthState::Loading,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Read the persisted session and settle the state.
    ///
    /// A value that does not parse as a session is removed and the gate
    /// settles as unauthenticated. A storage failure also settles the gate
    /// as unauthenticated before the error is returned.
    pub async fn resolve(&mut self) -> AppResult<&AuthState> {
        let raw = match self.storage.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                self.state = AuthState::Unauthenticated;
                return Err(e);
            }
        };

        let Some(raw) = raw else {
            debug!(key = %self.key, "No persisted session");
            self.state = AuthState::Unauthenticated;
            return Ok(&self.state);
        };

        match serde_json::from_str::<UserSession>(&raw) {
            Ok(session) => {
                info!(username = %session.username, "Restored persisted session");
                self.state = AuthState::Authenticated(session);
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Persisted session is unreadable, discarding");
                self.state = AuthState::Unauthenticated;
                self.storage.remove(&self.key).await?;
            }
        }

        Ok(&self.state)
    }

    /// Persist a new session and mark the gate authenticated.
    pub async fn store(&mut self, session: UserSession) -> AppResult<()> {
        let raw = serde_json::to_string(&session)?;
        self.storage.set(&self.key, &raw).await?;
        self.state = AuthState::Authenticated(session);
        Ok(())
    }

    /// Remove the persisted session and mark the gate unauthenticated.
    pub async fn clear(&mut self) -> AppResult<()> {
        self.storage.remove(&self.key).await?;
        self.state = AuthState::Unauthenticated;
        Ok(())
    }

    /// Flush the store and return to [`AuthState::Loading`].
    pub async fn reset(&mut self) -> AppResult<()> {
        self.storage.flush().await?;
        self.state = AuthState::Loading;
        Ok(())
    }
}
