//! Domain types and validators for launcher configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "install.progress",
    "runtime.import_timeout_secs",
    "runtime.install_root",
];

/// Default timeout for registering a distribution (large archives are slow).
pub const DEFAULT_IMPORT_TIMEOUT_SECS: u64 = 30 * 60;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `<config dir>/distro-launcher/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Install behaviour.
    pub install: InstallConfig,
    /// Virtualization runtime settings.
    pub runtime: RuntimeConfig,
}

/// Install behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallConfig {
    /// Show progress unless `--no-progress` or `--quiet` is given.
    pub progress: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self { progress: true }
    }
}

/// Virtualization runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Seconds to wait for a registration before killing it.
    pub import_timeout_secs: u64,
    /// Storage root passed to the runtime. Defaults to the launcher's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_root: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            import_timeout_secs: DEFAULT_IMPORT_TIMEOUT_SECS,
            install_root: None,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let expected = match key {
        "install.progress" if parse_bool(value).is_none() => "Valid values: true, false",
        "runtime.import_timeout_secs" if !matches!(value.parse::<u64>(), Ok(n) if n > 0) => {
            "Expected a positive number of seconds"
        }
        "runtime.install_root" if value.trim().is_empty() => "Expected a directory path",
        _ => return Ok(()),
    };
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .into())
}

/// Apply a validated key/value pair to `config`.
///
/// # Errors
///
/// Returns an error if the key or value fails validation.
pub fn apply_config_value(config: &mut LauncherConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "install.progress" => config.install.progress = parse_bool(value).unwrap_or(true),
        "runtime.import_timeout_secs" => {
            config.runtime.import_timeout_secs = value.parse().unwrap_or(DEFAULT_IMPORT_TIMEOUT_SECS);
        }
        "runtime.install_root" => config.runtime.install_root = Some(PathBuf::from(value.trim())),
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
