//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section has defaults so a missing file still yields
//! a usable configuration.

pub mod api;
pub mod logging;
pub mod router;
pub mod session;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::router::RouterConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay + `OLAB__`
/// environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Backend API settings.
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiConfig,
    /// Persisted session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Route table settings.
    #[serde(default)]
    pub router: RouterConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file at `path` is optional. When `OLAB_ENV` is set, a sibling
    /// `{env}.toml` overlay is merged on top, followed by environment
    /// variables prefixed with `OLAB__` (e.g. `OLAB__API__BASE_URL`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));

        if let Ok(env) = std::env::var("OLAB_ENV") {
            let overlay = std::path::Path::new(path)
                .with_file_name(format!("{env}.toml"))
                .to_string_lossy()
                .into_owned();
            builder = builder.add_source(config::File::with_name(&overlay).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("OLAB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }
}
