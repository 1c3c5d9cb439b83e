//! Infrastructure implementation of the `ArtifactFetcher` port.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::application::ports::ArtifactFetcher;
use crate::domain::artifact::hex_encode;

const CHUNK_SIZE: usize = 64 * 1024;

/// Streams artifacts over HTTP(S) with `ureq`, hashing while writing.
pub struct UreqFetcher {
    agent: ureq::Agent,
    terminal_bar: bool,
}

impl UreqFetcher {
    #[must_use]
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("distro-launcher/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            terminal_bar: true,
        }
    }

    /// Whether the output terminal can show a progress bar at all.
    #[must_use]
    pub fn with_terminal_bar(mut self, enabled: bool) -> Self {
        self.terminal_bar = enabled;
        self
    }

    fn draws_bar(&self, show_progress: bool) -> bool {
        show_progress && self.terminal_bar
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactFetcher for UreqFetcher {
    fn fetch(&self, url: &str, dest: &Path, show_progress: bool) -> Result<String> {
        let response = match self.agent.get(url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => anyhow::bail!("Download failed: HTTP {code}"),
            Err(e) => return Err(anyhow::Error::new(e).context("Download failed")),
        };

        let total = response
            .header("Content-Length")
            .and_then(|v| v.parse::<u64>().ok());
        tracing::debug!(url, ?total, "download started");

        let file = File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
        let pb = make_progress_bar(!self.draws_bar(show_progress), total);
        let mut hasher = Sha256::new();
        let mut written = 0u64;

        let mut reader = response.into_reader();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf).context("Download interrupted")?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).context("Download interrupted")?;
            hasher.update(&buf[..n]);
            written += n as u64;
            pb.inc(n as u64);
        }
        pb.finish_and_clear();
        writer
            .flush()
            .with_context(|| format!("writing {}", dest.display()))?;

        if let Some(total) = total {
            anyhow::ensure!(
                written == total,
                "Download interrupted: received {written} of {total} bytes"
            );
        }
        tracing::debug!(url, bytes = written, "download finished");
        Ok(hex_encode(&hasher.finalize()))
    }
}

fn make_progress_bar(quiet: bool, total: Option<u64>) -> indicatif::ProgressBar {
    if quiet {
        return indicatif::ProgressBar::hidden();
    }
    if let Some(t) = total {
        let pb = indicatif::ProgressBar::new(t);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("[{bar:40}] {percent}% {bytes}/{total_bytes}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    } else {
        indicatif::ProgressBar::new_spinner()
    }
}
