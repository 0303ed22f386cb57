//! Backend API configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Connection settings for the OLab backend API.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto.
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5001/olab/api/v3/".to_string()
}

fn default_timeout() -> u64 {
    30
}
