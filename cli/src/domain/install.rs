//! Install request, outcome and disk-image protocol phases.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::domain::artifact::InstallStrategy;
use crate::domain::error::InstallError;

/// Longest distribution name accepted by the launcher.
pub const MAX_DISTRO_NAME_LEN: usize = 64;

/// One install invocation. Immutable once built.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Name to register the instance under.
    pub name: String,
    /// Local path or `http(s)://` URL of the install artifact.
    pub source: String,
    /// Expected SHA-256 of the artifact, lowercase hex.
    pub expected_sha256: Option<String>,
    /// Report progress (download bar, checksum, phase messages).
    pub show_progress: bool,
}

/// What a successful install did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Registered instance name.
    pub name: String,
    /// Strategy chosen by classification.
    pub strategy: InstallStrategy,
    /// SHA-256 of the artifact, when it was computed.
    pub sha256: Option<String>,
}

/// Progress through the disk-image install protocol.
///
/// Every failure records the last phase reached. There is no rollback across
/// phases: a failure after [`InstallPhase::PlaceholderRegistered`] may leave
/// an instance behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InstallPhase {
    Start,
    PlaceholderRegistered,
    ProfileRead,
    PlaceholderRemoved,
    ImageWritten,
    ConfigPatched,
}

impl InstallPhase {
    /// Returns `true` when a failure in this phase leaves runtime state behind.
    #[must_use]
    pub fn leaves_residue(self) -> bool {
        self >= Self::PlaceholderRegistered && self < Self::ConfigPatched
    }
}

impl fmt::Display for InstallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::PlaceholderRegistered => "placeholder registered",
            Self::ProfileRead => "profile read",
            Self::PlaceholderRemoved => "placeholder removed",
            Self::ImageWritten => "image written",
            Self::ConfigPatched => "config patched",
        };
        f.write_str(s)
    }
}

/// Validates a distribution name.
///
/// Names are 1..=64 characters of ASCII alphanumerics, `.`, `_` or `-`.
///
/// # Errors
///
/// Returns [`InstallError::InvalidName`] if the name is empty, too long, or
/// contains other characters.
pub fn validate_distro_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_DISTRO_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid {
        return Err(InstallError::InvalidName(name.to_string()).into());
    }
    Ok(())
}

/// Distribution name implied by the launcher's executable name.
///
/// A launcher renamed to `Ubuntu.exe` installs `Ubuntu`.
#[must_use]
pub fn distro_name_from_exe(exe: &Path) -> Option<String> {
    exe.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}
