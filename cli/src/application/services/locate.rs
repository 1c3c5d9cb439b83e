//! Application service — default install artifact lookup.
//!
//! Used only when `install` is given no source.

use std::path::{Path, PathBuf};

use crate::application::ports::LocalFs;
use crate::domain::artifact::{DEFAULT_ROOTFS_FILES, FALLBACK_ROOTFS_FILE};

/// Find the default install artifact next to the running launcher.
///
/// Never fails: when the executable directory cannot be determined the
/// current directory is probed, and when nothing matches the bare fallback
/// name is returned unverified.
pub fn locate_default_artifact(paths: &impl LocalFs) -> PathBuf {
    let dir = paths
        .executable_path()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    locate_in(paths, &dir)
}

/// Probe `dir` for the first existing name from [`DEFAULT_ROOTFS_FILES`].
pub fn locate_in(paths: &impl LocalFs, dir: &Path) -> PathBuf {
    DEFAULT_ROOTFS_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| paths.exists(candidate))
        .inspect(|found| tracing::debug!(path = %found.display(), "default artifact found"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_ROOTFS_FILE))
}
