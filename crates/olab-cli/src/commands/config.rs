//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use olab_core::config::AppConfig;
use olab_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_item(config, format),
            OutputFormat::Table => print_summary(config),
        },
    }

    Ok(())
}

/// Print the configuration as key-value pairs
pub fn print_summary(config: &AppConfig) {
    output::print_kv("API base URL", &config.api.base_url);
    output::print_kv("API timeout", &format!("{}s", config.api.timeout_seconds));
    output::print_kv("Session file", &config.session.storage_path);
    output::print_kv("Session key", &config.session.key);
    let base = if config.router.base_path.is_empty() {
        "/"
    } else {
        config.router.base_path.as_str()
    };
    output::print_kv("Router base path", base);
    output::print_kv("Log level", &config.logging.level);
    output::print_kv("Log format", &config.logging.format);
}
