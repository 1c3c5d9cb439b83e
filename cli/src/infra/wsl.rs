//! Infrastructure implementation of the `DistroRegistrar` port.
//!
//! `WslRuntime<R>` routes every runtime call through a `CommandRunner`:
//! registration goes through `wsl.exe`, profile access through `reg.exe`
//! (see `infra::registry`).

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, DistroRegistrar};

pub(crate) const WSL_EXE: &str = "wsl.exe";

/// Runtime adapter for the Windows Subsystem for Linux.
///
/// Generic over `R: CommandRunner` so tests can script process output.
pub struct WslRuntime<R: CommandRunner> {
    pub(crate) runner: R,
    install_root: PathBuf,
    import_timeout: Duration,
}

impl<R: CommandRunner> WslRuntime<R> {
    /// `install_root` is the storage root handed to `wsl --import`.
    pub fn new(runner: R, install_root: PathBuf, import_timeout: Duration) -> Self {
        Self {
            runner,
            install_root,
            import_timeout,
        }
    }
}

impl<R: CommandRunner> DistroRegistrar for WslRuntime<R> {
    async fn register(&self, name: &str, root_artifact: &Path) -> Result<()> {
        let root = self.install_root.to_string_lossy();
        let artifact = root_artifact.to_string_lossy();
        tracing::debug!(distro = name, install_root = %root, artifact = %artifact, "wsl --import");
        let output = self
            .runner
            .run_with_timeout(
                WSL_EXE,
                &["--import", name, &*root, &*artifact],
                self.import_timeout,
            )
            .await
            .context("wsl --import")?;
        check(&output, "wsl --import")
    }

    async fn unregister(&self, name: &str) -> Result<()> {
        tracing::debug!(distro = name, "wsl --unregister");
        let output = self
            .runner
            .run(WSL_EXE, &["--unregister", name])
            .await
            .context("wsl --unregister")?;
        check(&output, "wsl --unregister")
    }
}

/// Turn a non-zero exit into an error carrying the tool's own message.
fn check(output: &Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = decode_output(&output.stderr);
    let message = if stderr.trim().is_empty() {
        decode_output(&output.stdout)
    } else {
        stderr
    };
    let message = message.trim();
    match output.status.code() {
        Some(code) => anyhow::bail!("{what} failed (exit {code}): {message}"),
        None => anyhow::bail!("{what} failed: {message}"),
    }
}

/// Decode `wsl.exe` or `reg.exe` console output.
///
/// `wsl.exe` writes UTF-16LE unless `WSL_UTF8` is set, so a buffer that looks
/// like UTF-16LE (even length, NUL high bytes in ASCII range) is decoded as
/// such; anything else is treated as UTF-8.
pub fn decode_output(bytes: &[u8]) -> String {
    let looks_utf16 = bytes.len() >= 2
        && bytes.len() % 2 == 0
        && bytes.chunks_exact(2).any(|pair| pair[1] == 0 && pair[0] != 0);
    if looks_utf16 {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text = String::from_utf16_lossy(&units);
        return text.trim_start_matches('\u{feff}').replace('\0', "");
    }
    String::from_utf8_lossy(bytes).into_owned()
}
