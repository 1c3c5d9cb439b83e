//! Integrity verification of an acquired artifact.

use anyhow::{Context, Result};

use super::Progress;
use super::acquire::ResolvedArtifact;
use crate::application::ports::{FileHasher, ProgressReporter};
use crate::domain::InstallError;
use crate::domain::artifact::digests_match;

/// Reconcile the expected digest with the artifact's actual digest.
///
/// A downloaded artifact already carries its digest. A local artifact is
/// hashed only when an expected digest was given. Returns the actual digest
/// when one is known.
///
/// # Errors
///
/// Returns [`InstallError::IntegrityMismatch`] if both digests are known and
/// differ, or [`InstallError::Acquisition`] if the local file cannot be read.
pub fn verify(
    artifact: &ResolvedArtifact,
    expected: Option<&str>,
    hasher: &impl FileHasher,
    progress: &Progress<'_, impl ProgressReporter>,
) -> Result<Option<String>> {
    let actual = match (&artifact.sha256, expected) {
        (Some(known), _) => Some(known.clone()),
        (None, Some(_)) => {
            progress.step("Calculating checksum...");
            let digest = hasher
                .sha256_file(&artifact.local_path)
                .with_context(|| InstallError::Acquisition {
                    location: artifact.local_path.display().to_string(),
                })?;
            Some(digest)
        }
        (None, None) => None,
    };

    if let Some(actual) = &actual {
        progress.step(&format!("Checksum(SHA256): {actual}"));
    }

    if let (Some(expected), Some(actual)) = (expected, &actual)
        && !digests_match(expected, actual)
    {
        tracing::debug!(expected, actual = %actual, "checksum mismatch");
        return Err(InstallError::IntegrityMismatch {
            expected: expected.to_string(),
            actual: actual.clone(),
        }
        .into());
    }

    Ok(actual)
}
