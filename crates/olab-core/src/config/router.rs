//! Route table configuration.

use serde::{Deserialize, Serialize};

/// Route table settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Prefix every route lives under (empty for the root).
    #[serde(default)]
    pub base_path: String,
}
