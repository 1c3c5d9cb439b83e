//! `launcher install` — register a distribution from an archive or disk image.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{LocalFs, ProgressReporter};
use crate::application::services::config_service;
use crate::application::services::install::{self, InstallOptions};
use crate::application::services::locate::locate_default_artifact;
use crate::domain::artifact::normalize_sha256;
use crate::domain::install::distro_name_from_exe;
use crate::domain::{InstallError, InstallPhase, InstallRequest, LauncherConfig};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::download::UreqFetcher;
use crate::infra::fs::StdFs;
use crate::infra::wsl::WslRuntime;
use crate::output::TerminalReporter;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Local path or http(s) URL of a rootfs archive or `.ext4.vhdx[.gz]` image
    /// (defaults to the first install/rootfs file next to the launcher)
    pub source: Option<String>,

    /// Distribution name (defaults to the launcher's executable name)
    #[arg(long)]
    pub name: Option<String>,

    /// Expected SHA-256 of the artifact, hex with optional `sha256:` prefix
    #[arg(long, value_name = "HEX", value_parser = parse_sha256)]
    pub sha256: Option<String>,

    /// Do not print progress messages or the download bar
    #[arg(long)]
    pub no_progress: bool,
}

fn parse_sha256(value: &str) -> Result<String, String> {
    normalize_sha256(value).map_err(|e| e.to_string())
}

/// Run the install command.
///
/// # Errors
///
/// Returns the first failing install stage's error.
pub async fn run(app: &AppContext, args: InstallArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let fs = StdFs;
    let exe = fs.executable_path();

    let name = match args.name {
        Some(name) => name,
        None => exe
            .as_deref()
            .and_then(distro_name_from_exe)
            .ok_or_else(|| anyhow::anyhow!("cannot determine distribution name; pass --name"))?,
    };
    let source = args
        .source
        .unwrap_or_else(|| locate_default_artifact(&fs).display().to_string());
    let request = InstallRequest {
        name,
        source,
        expected_sha256: args.sha256,
        show_progress: config.install.progress && !args.no_progress && !app.output.quiet,
    };

    let runtime = WslRuntime::new(
        TokioCommandRunner::default(),
        install_root(&config, exe.as_deref()),
        Duration::from_secs(config.runtime.import_timeout_secs),
    );
    let reporter = TerminalReporter::new(&app.output);
    let temp_dir = std::env::temp_dir();

    let result = install::install(
        &runtime,
        &UreqFetcher::new().with_terminal_bar(app.output.show_progress()),
        &fs,
        &fs,
        &request,
        InstallOptions {
            reporter: &reporter,
            temp_dir: &temp_dir,
        },
    )
    .await;

    match result {
        Ok(outcome) => {
            tracing::info!(distro = %outcome.name, strategy = outcome.strategy.label(), "installed");
            reporter.success(&format!("Installed {}", outcome.name));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if let Some(hint) = e
                .downcast_ref::<InstallError>()
                .and_then(InstallError::phase)
                .and_then(|phase| residue_hint(&request.name, phase))
            {
                reporter.warn(&hint);
            }
            Err(e)
        }
    }
}

/// Storage root for `wsl --import`: configured, else the launcher's directory.
fn install_root(config: &LauncherConfig, exe: Option<&Path>) -> PathBuf {
    config
        .runtime
        .install_root
        .clone()
        .or_else(|| exe.and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// What a failed disk-image install left behind.
fn residue_hint(name: &str, phase: InstallPhase) -> Option<String> {
    if !phase.leaves_residue() {
        return None;
    }
    Some(if phase < InstallPhase::PlaceholderRemoved {
        format!("'{name}' is still registered. Remove it with: wsl.exe --unregister {name}")
    } else {
        format!("A partial disk image for '{name}' may remain in its install directory")
    })
}
