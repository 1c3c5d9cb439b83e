//! Artifact acquisition: resolve an install source into a readable local file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempPath;

use super::Progress;
use crate::application::ports::{ArtifactFetcher, LocalFs, ProgressReporter};
use crate::domain::InstallError;
use crate::domain::artifact::{is_remote, url_file_name};

/// A local install artifact ready for verification and installation.
///
/// A downloaded artifact owns its temporary file; dropping the value deletes
/// it.
#[derive(Debug)]
pub struct ResolvedArtifact {
    /// Path handed to the installers.
    pub local_path: PathBuf,
    /// SHA-256 computed while downloading.
    pub sha256: Option<String>,
    temp: Option<TempPath>,
}

impl ResolvedArtifact {
    /// Returns `true` when the artifact lives in a temporary download file.
    #[must_use]
    pub fn is_downloaded(&self) -> bool {
        self.temp.is_some()
    }
}

/// Resolve `location` into a local file.
///
/// URLs are downloaded into a uniquely named file under `temp_dir` whose name
/// ends with the URL's base name, so classification still sees the original
/// suffix. Local paths are used as-is after a readability check.
///
/// # Errors
///
/// Returns [`InstallError::Acquisition`] if the temporary file cannot be
/// created, the download fails, or the local file is missing or unreadable.
pub fn acquire(
    location: &str,
    fetcher: &impl ArtifactFetcher,
    fs: &impl LocalFs,
    progress: &Progress<'_, impl ProgressReporter>,
    temp_dir: &Path,
) -> Result<ResolvedArtifact> {
    let failed = || InstallError::Acquisition {
        location: location.to_string(),
    };

    if !is_remote(location) {
        let local_path = PathBuf::from(location);
        fs.ensure_readable_file(&local_path).with_context(failed)?;
        return Ok(ResolvedArtifact {
            local_path,
            sha256: None,
            temp: None,
        });
    }

    progress.step("Downloading...");
    let temp = tempfile::Builder::new()
        .prefix("")
        .suffix(&format!("-{}", url_file_name(location)))
        .tempfile_in(temp_dir)
        .with_context(|| format!("creating temporary file in {}", temp_dir.display()))
        .with_context(failed)?
        .into_temp_path();
    tracing::debug!(url = location, dest = %temp.display(), "downloading artifact");

    // `temp` is dropped (and the partial file deleted) if the fetch fails.
    let sha256 = fetcher
        .fetch(location, &temp, progress.enabled())
        .with_context(failed)?;

    Ok(ResolvedArtifact {
        local_path: temp.to_path_buf(),
        sha256: Some(sha256),
        temp: Some(temp),
    })
}
