//! Application service — install use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The pipeline runs strictly in order: acquire, verify, classify, install.
//! Any failure aborts the remaining stages. A downloaded artifact is deleted
//! on every exit path once acquisition has created it.

pub mod acquire;
pub mod disk_image;
pub mod tar;
pub mod verify;

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{
    ArtifactFetcher, DistroRuntime, FileHasher, LocalFs, ProgressReporter,
};
use crate::domain::install::validate_distro_name;
use crate::domain::{InstallOutcome, InstallRequest, InstallStrategy, classify};

/// Progress gate shared by the pipeline stages.
///
/// Messages only reach the reporter when progress display is enabled.
pub struct Progress<'a, R> {
    reporter: &'a R,
    enabled: bool,
}

impl<'a, R: ProgressReporter> Progress<'a, R> {
    pub fn new(reporter: &'a R, enabled: bool) -> Self {
        Self { reporter, enabled }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn step(&self, message: &str) {
        if self.enabled {
            self.reporter.step(message);
        }
    }
}

pub struct InstallOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    /// Directory for downloads and the disk-image placeholder archive.
    pub temp_dir: &'a Path,
}

/// Install a distribution instance from `request.source`.
///
/// # Errors
///
/// Returns the first stage failure with an [`crate::domain::InstallError`]
/// in its context chain.
pub async fn install(
    runtime: &impl DistroRuntime,
    fetcher: &impl ArtifactFetcher,
    hasher: &impl FileHasher,
    fs: &impl LocalFs,
    request: &InstallRequest,
    opts: InstallOptions<'_, impl ProgressReporter>,
) -> Result<InstallOutcome> {
    validate_distro_name(&request.name)?;
    let progress = Progress::new(opts.reporter, request.show_progress);
    progress.step(&format!("Using: {}", request.source));

    let artifact = acquire::acquire(&request.source, fetcher, fs, &progress, opts.temp_dir)?;
    let sha256 = verify::verify(
        &artifact,
        request.expected_sha256.as_deref(),
        hasher,
        &progress,
    )?;

    progress.step("Installing...");
    let strategy = classify(&artifact.local_path);
    tracing::info!(
        distro = %request.name,
        strategy = strategy.label(),
        artifact = %artifact.local_path.display(),
        "installing"
    );
    match strategy {
        InstallStrategy::Tar => {
            tar::install_tar(runtime, &request.name, &artifact.local_path).await?;
        }
        InstallStrategy::DiskImage { compressed } => {
            disk_image::install_disk_image(
                runtime,
                &request.name,
                &artifact.local_path,
                compressed,
                opts.temp_dir,
            )
            .await?;
        }
    }

    Ok(InstallOutcome {
        name: request.name.clone(),
        strategy,
        sha256,
    })
}
