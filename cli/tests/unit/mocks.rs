//! Shared mock infrastructure for unit tests.
//!
//! `RecordingRuntime` keeps the registered-instance set in memory and logs
//! every runtime call as a short event string. Like the real runtime,
//! unregistering drops the stored profile and writing a profile recreates it.

#![allow(clippy::expect_used, dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use distro_launcher::application::ports::{
    ArtifactFetcher, DistroRegistrar, ProfileStore, ProgressReporter,
};
use distro_launcher::domain::{DistroFlags, InstanceProfile};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

// ── Runtime ───────────────────────────────────────────────────────────────────

pub struct RecordingRuntime {
    base_path: PathBuf,
    pub events: Mutex<Vec<String>>,
    registered: Mutex<BTreeMap<String, InstanceProfile>>,
}

impl RecordingRuntime {
    pub fn new(base_path: &Path) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            events: Mutex::new(Vec::new()),
            registered: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }

    pub fn registered_profile(&self, name: &str) -> Option<InstanceProfile> {
        self.registered.lock().expect("lock").get(name).cloned()
    }

    pub fn registered_names(&self) -> Vec<String> {
        self.registered.lock().expect("lock").keys().cloned().collect()
    }

    fn log(&self, event: String) {
        self.events.lock().expect("lock").push(event);
    }
}

impl DistroRegistrar for RecordingRuntime {
    async fn register(&self, name: &str, root_artifact: &Path) -> Result<()> {
        let len = std::fs::metadata(root_artifact)?.len();
        self.log(format!("register {name} ({len} bytes)"));
        let mut registered = self.registered.lock().expect("lock");
        anyhow::ensure!(!registered.contains_key(name), "'{name}' already exists");
        registered.insert(
            name.to_string(),
            InstanceProfile {
                id: format!("{{{name}}}"),
                name: name.to_string(),
                base_path: self.base_path.clone(),
                flags: DistroFlags::DEFAULT,
                version: Some(2),
                default_uid: Some(0),
                state: Some(InstanceProfile::STATE_INSTALLED),
            },
        );
        Ok(())
    }

    async fn unregister(&self, name: &str) -> Result<()> {
        self.log(format!("unregister {name}"));
        self.registered
            .lock()
            .expect("lock")
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| anyhow::anyhow!("'{name}' not registered"))
    }
}

impl ProfileStore for RecordingRuntime {
    async fn profile_by_name(&self, name: &str) -> Result<InstanceProfile> {
        self.log(format!("profile {name}"));
        self.registered
            .lock()
            .expect("lock")
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("'{name}' not registered"))
    }

    async fn write_profile(&self, profile: &InstanceProfile) -> Result<()> {
        self.log(format!("write {} flags={}", profile.name, profile.flags));
        self.registered
            .lock()
            .expect("lock")
            .insert(profile.name.clone(), profile.clone());
        Ok(())
    }
}

// ── Fetcher ───────────────────────────────────────────────────────────────────

/// Writes a fixed body; optionally fails after writing part of it.
pub struct StaticFetcher {
    pub body: Vec<u8>,
    pub cut_at: Option<usize>,
}

impl ArtifactFetcher for StaticFetcher {
    fn fetch(&self, _url: &str, dest: &Path, _show_progress: bool) -> Result<String> {
        use sha2::{Digest, Sha256};
        if let Some(cut) = self.cut_at {
            std::fs::write(dest, &self.body[..cut])?;
            anyhow::bail!("Download interrupted");
        }
        std::fs::write(dest, &self.body)?;
        Ok(distro_launcher::domain::artifact::hex_encode(&Sha256::digest(&self.body)))
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CollectingReporter {
    pub lines: Mutex<Vec<String>>,
}

impl ProgressReporter for CollectingReporter {
    fn step(&self, message: &str) {
        self.lines.lock().expect("lock").push(message.to_string());
    }
    fn success(&self, message: &str) {
        self.lines.lock().expect("lock").push(message.to_string());
    }
    fn warn(&self, message: &str) {
        self.lines.lock().expect("lock").push(message.to_string());
    }
}

// ── Data helpers ──────────────────────────────────────────────────────────────

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    distro_launcher::domain::artifact::hex_encode(&Sha256::digest(bytes))
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}
