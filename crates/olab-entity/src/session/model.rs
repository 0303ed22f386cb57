//! Session value types exchanged with the login endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials submitted on login.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authorization data returned by the backend on login.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    /// Bearer token sent with every request.
    pub token: String,
    /// Seconds until the token expires, if reported.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInfo")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// The persisted, logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// Login name.
    pub username: String,
    /// Token data.
    pub auth_info: AuthInfo,
    /// When the login happened.
    pub logged_in_at: DateTime<Utc>,
}

impl UserSession {
    /// Create a session for a fresh login.
    pub fn new(username: impl Into<String>, auth_info: AuthInfo) -> Self {
        Self {
            username: username.into(),
            auth_info,
            logged_in_at: Utc::now(),
        }
    }

    /// The bearer token.
    pub fn token(&self) -> &str {
        &self.auth_info.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));

        let info = AuthInfo {
            token: "abc.def".into(),
            expires_in: None,
        };
        assert!(!format!("{info:?}").contains("abc.def"));
    }

    #[test]
    fn test_session_roundtrip() {
        let session = UserSession::new(
            "admin",
            AuthInfo {
                token: "t".into(),
                expires_in: Some(3600),
            },
        );
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("authInfo"));
        let back: UserSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
