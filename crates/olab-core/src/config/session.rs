//! Persisted session configuration.

use serde::{Deserialize, Serialize};

/// Where and under which key the logged-in session is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path to the JSON key-value file holding persisted values.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Key the session is stored under.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            key: default_key(),
        }
    }
}

fn default_storage_path() -> String {
    "data/session.json".to_string()
}

fn default_key() -> String {
    "user".to_string()
}
