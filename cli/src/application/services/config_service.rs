//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{LauncherConfig, apply_config_value};

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<LauncherConfig> {
    store.load()
}

/// Validate and persist a single setting, returning the updated configuration.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the store fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<LauncherConfig> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    tracing::debug!(key, value, "configuration updated");
    Ok(config)
}
