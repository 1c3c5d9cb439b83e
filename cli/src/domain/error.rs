//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Errors are attached to `anyhow::Error` as context so the underlying cause
//! stays in the chain and callers can still `downcast_ref::<InstallError>()`.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::install::InstallPhase;

// ── Install errors ────────────────────────────────────────────────────────────

/// Failures of the install pipeline, one variant per stage.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("cannot acquire install artifact: {location}")]
    Acquisition { location: String },

    #[error("checksum mismatch\n\nExpected: {expected}\nActual:   {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("cannot register distribution '{name}' (phase: {phase})")]
    Registration { name: String, phase: InstallPhase },

    #[error("cannot resolve storage location of '{name}' (phase: {phase})")]
    ProfileLookup { name: String, phase: InstallPhase },

    #[error("cannot unregister placeholder '{name}' (phase: {phase})")]
    Unregistration { name: String, phase: InstallPhase },

    #[error("cannot write disk image {} (phase: {phase})", path.display())]
    Io { path: PathBuf, phase: InstallPhase },

    #[error("cannot decompress disk image into {} (phase: {phase})", path.display())]
    Decompression { path: PathBuf, phase: InstallPhase },

    #[error("cannot write profile of '{name}' (phase: {phase})")]
    ProfileWrite { name: String, phase: InstallPhase },

    #[error(
        "Invalid distribution name '{0}': use 1-64 ASCII letters, digits, '.', '_' or '-'"
    )]
    InvalidName(String),

    #[error("Invalid SHA-256 digest '{0}': expected 64 hex characters")]
    InvalidDigest(String),
}

impl InstallError {
    /// Disk-image protocol phase reached when the error occurred, if any.
    #[must_use]
    pub fn phase(&self) -> Option<InstallPhase> {
        match self {
            Self::Registration { phase, .. }
            | Self::ProfileLookup { phase, .. }
            | Self::Unregistration { phase, .. }
            | Self::Io { phase, .. }
            | Self::Decompression { phase, .. }
            | Self::ProfileWrite { phase, .. } => Some(*phase),
            Self::Acquisition { .. }
            | Self::IntegrityMismatch { .. }
            | Self::InvalidName(_)
            | Self::InvalidDigest(_) => None,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
