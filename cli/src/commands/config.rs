//! `launcher config` — show and set configuration values.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, validated or saved.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;

    if app.is_json() {
        let obj = serde_json::json!({
            "path": path,
            "config": config,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    let out = &app.output;
    out.header("Configuration");
    out.kv("file", &path.display().to_string());
    out.kv("install.progress", &config.install.progress.to_string());
    out.kv(
        "runtime.import_timeout_secs",
        &config.runtime.import_timeout_secs.to_string(),
    );
    out.kv(
        "runtime.install_root",
        &config
            .runtime
            .install_root
            .as_ref()
            .map_or_else(|| "(launcher directory)".to_string(), |p| p.display().to_string()),
    );
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    config_service::set_value(&app.config_store, key, value)?;
    app.output.success(&format!("Set {key} = {value}"));
    Ok(ExitCode::SUCCESS)
}
