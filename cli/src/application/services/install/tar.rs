//! Archive install: hand the artifact straight to the runtime.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::DistroRegistrar;
use crate::domain::{InstallError, InstallPhase};

/// Register `name` from the archive at `path`, passed through unmodified.
///
/// # Errors
///
/// Returns [`InstallError::Registration`] wrapping the runtime's error.
pub async fn install_tar(registrar: &impl DistroRegistrar, name: &str, path: &Path) -> Result<()> {
    tracing::debug!(distro = name, artifact = %path.display(), "registering from archive");
    registrar
        .register(name, path)
        .await
        .with_context(|| InstallError::Registration {
            name: name.to_string(),
            phase: InstallPhase::Start,
        })
}
