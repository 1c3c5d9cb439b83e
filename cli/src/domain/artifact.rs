//! Install artifact classification and naming tables.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use std::path::Path;

use anyhow::Result;

use crate::domain::error::InstallError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Conventional artifact names probed next to the launcher, in priority order.
///
/// Archives come first, disk images last.
pub const DEFAULT_ROOTFS_FILES: &[&str] = &[
    "install.tar",
    "install.tar.gz",
    "install.tgz",
    "install.tar.zst",
    "install.tar.xz",
    "rootfs.tar",
    "rootfs.tar.gz",
    "rootfs.tgz",
    "rootfs.tar.zst",
    "rootfs.tar.xz",
    "install.ext4.vhdx",
    "install.ext4.vhdx.gz",
];

/// Returned by the locator when none of [`DEFAULT_ROOTFS_FILES`] exist.
pub const FALLBACK_ROOTFS_FILE: &str = "rootfs.tar.gz";

/// Name of the disk image inside an instance's base path.
pub const DISK_IMAGE_FILENAME: &str = "ext4.vhdx";

/// Lowercase suffixes that select the disk-image strategy.
///
/// Longest suffix first so `.ext4.vhdx.gz` is not shadowed.
pub const DISK_IMAGE_SUFFIXES: &[(&str, InstallStrategy)] = &[
    (".ext4.vhdx.gz", InstallStrategy::DiskImage { compressed: true }),
    (".ext4.vhdx", InstallStrategy::DiskImage { compressed: false }),
];

const REMOTE_SCHEMES: &[&str] = &["http://", "https://"];

// ── Classification ───────────────────────────────────────────────────────────

/// How an artifact is handed to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Archive passed unmodified to the runtime's registration primitive.
    Tar,
    /// Raw block-device image placed directly as the instance's disk.
    DiskImage {
        /// Payload is gzip-compressed.
        compressed: bool,
    },
}

impl InstallStrategy {
    /// Short label used in progress output and logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Tar => "archive",
            Self::DiskImage { compressed: false } => "disk image",
            Self::DiskImage { compressed: true } => "compressed disk image",
        }
    }
}

/// Classify an artifact by its file name (case-insensitive suffix match).
///
/// Everything that is not a recognised disk image is treated as an archive;
/// archive parsing is left to the runtime. A file named exactly `ext4.vhdx`
/// (the name the runtime itself uses) also counts as a disk image.
#[must_use]
pub fn classify(path: &Path) -> InstallStrategy {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    DISK_IMAGE_SUFFIXES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix) || name == suffix[1..])
        .map_or(InstallStrategy::Tar, |(_, strategy)| *strategy)
}

/// Returns `true` when `location` has an `http://` or `https://` scheme.
///
/// The location is matched as given; leading whitespace makes it a local path.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    REMOTE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Last path segment of a URL, without query string or fragment.
///
/// Falls back to `"download"` when the URL has no usable segment.
#[must_use]
pub fn url_file_name(url: &str) -> &str {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    let after_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    match after_scheme.split_once('/') {
        Some((_, path)) => path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("download"),
        None => "download",
    }
}

// ── Digests ──────────────────────────────────────────────────────────────────

/// Case-insensitive comparison of two hex digests.
#[must_use]
pub fn digests_match(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

/// Normalise a user-supplied SHA-256 digest.
///
/// Accepts an optional `sha256:` prefix and surrounding whitespace; the
/// result is 64 lowercase hex characters.
///
/// # Errors
///
/// Returns [`InstallError::InvalidDigest`] if the value is not 64 hex characters.
pub fn normalize_sha256(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let hex = trimmed
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("sha256:"))
        .map_or(trimmed, |_| &trimmed[7..]);
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InstallError::InvalidDigest(value.to_string()).into());
    }
    Ok(hex.to_ascii_lowercase())
}

/// Lowercase hex encoding of a byte slice.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
