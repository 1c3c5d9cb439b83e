//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{InstanceProfile, LauncherConfig};

// ── Virtualization Runtime Ports ──────────────────────────────────────────────

/// Instance registration primitives of the virtualization runtime.
#[allow(async_fn_in_trait)]
pub trait DistroRegistrar {
    /// Register a new instance whose root filesystem is `root_artifact`.
    ///
    /// The artifact may be a real tar stream or a zero-byte placeholder.
    /// Fails if `name` is already registered.
    async fn register(&self, name: &str, root_artifact: &Path) -> Result<()>;
    /// Remove an instance's registration.
    async fn unregister(&self, name: &str) -> Result<()>;
}

/// Persisted per-instance profile store of the virtualization runtime.
#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Read the profile of the instance registered as `name`.
    async fn profile_by_name(&self, name: &str) -> Result<InstanceProfile>;
    /// Persist `profile`, replacing the stored record with the same id.
    async fn write_profile(&self, profile: &InstanceProfile) -> Result<()>;
}

/// Composite trait — any type implementing both sub-traits is a `DistroRuntime`.
pub trait DistroRuntime: DistroRegistrar + ProfileStore {}

/// Blanket implementation: any type implementing both sub-traits is a `DistroRuntime`.
impl<T> DistroRuntime for T where T: DistroRegistrar + ProfileStore {}

// ── Artifact Ports ────────────────────────────────────────────────────────────

/// Downloads remote install artifacts.
pub trait ArtifactFetcher {
    /// Stream `url` into `dest` and return the lowercase hex SHA-256 of the body.
    ///
    /// `dest` already exists; implementations truncate it.
    fn fetch(&self, url: &str, dest: &Path, show_progress: bool) -> Result<String>;
}

/// Abstracts file hashing operations.
pub trait FileHasher {
    /// Compute the SHA-256 hash of a file.
    fn sha256_file(&self, path: &Path) -> Result<String>;
}

/// Abstracts the local filesystem queries the launcher makes.
pub trait LocalFs {
    /// Path of the running launcher executable.
    fn executable_path(&self) -> Option<PathBuf>;
    /// Returns `true` when `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Check that `path` is a regular file that can be opened for reading.
    fn ensure_readable_file(&self, path: &Path) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts launcher configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when none is stored.
    fn load(&self) -> Result<LauncherConfig>;
    /// Persist the configuration.
    fn save(&self, config: &LauncherConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
