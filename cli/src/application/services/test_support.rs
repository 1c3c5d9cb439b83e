//! Shared test doubles for install service tests.
//!
//! `FakeRuntime` models the runtime's registered-instance set and profile
//! store in memory and records every call in order. Unregistering drops the
//! stored profile; writing a profile recreates the instance's record.

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{
    ArtifactFetcher, DistroRegistrar, FileHasher, LocalFs, ProfileStore, ProgressReporter,
};
use crate::domain::{DistroFlags, InstanceProfile};

/// One recorded runtime call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Register { name: String, artifact: PathBuf, artifact_len: Option<u64> },
    ProfileByName(String),
    Unregister(String),
    WriteProfile(InstanceProfile),
}

/// Which runtime call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailAt {
    #[default]
    Nothing,
    Register,
    ProfileByName,
    Unregister,
    WriteProfile,
}

pub struct FakeRuntime {
    pub base_path: PathBuf,
    pub fail_at: FailAt,
    pub calls: RefCell<Vec<Call>>,
    pub registered: RefCell<BTreeMap<String, InstanceProfile>>,
    pub written: RefCell<Vec<InstanceProfile>>,
}

impl FakeRuntime {
    pub fn new(base_path: &Path) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            fail_at: FailAt::Nothing,
            calls: RefCell::new(Vec::new()),
            registered: RefCell::new(BTreeMap::new()),
            written: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(base_path: &Path, fail_at: FailAt) -> Self {
        Self {
            fail_at,
            ..Self::new(base_path)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.borrow().contains_key(name)
    }

    pub fn registered_profile(&self, name: &str) -> Option<InstanceProfile> {
        self.registered.borrow().get(name).cloned()
    }
}

impl DistroRegistrar for FakeRuntime {
    async fn register(&self, name: &str, root_artifact: &Path) -> Result<()> {
        self.calls.borrow_mut().push(Call::Register {
            name: name.to_string(),
            artifact: root_artifact.to_path_buf(),
            artifact_len: std::fs::metadata(root_artifact).ok().map(|m| m.len()),
        });
        if self.fail_at == FailAt::Register {
            anyhow::bail!("access denied");
        }
        if self.is_registered(name) {
            anyhow::bail!("distribution '{name}' already exists");
        }
        self.registered.borrow_mut().insert(
            name.to_string(),
            InstanceProfile {
                id: "{6a1e2e4c-0000-4000-8000-000000000001}".to_string(),
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
        self.calls
            .borrow_mut()
            .push(Call::Unregister(name.to_string()));
        if self.fail_at == FailAt::Unregister {
            anyhow::bail!("instance is busy");
        }
        self.registered
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| anyhow::anyhow!("distribution '{name}' not found"))
    }
}

impl ProfileStore for FakeRuntime {
    async fn profile_by_name(&self, name: &str) -> Result<InstanceProfile> {
        self.calls
            .borrow_mut()
            .push(Call::ProfileByName(name.to_string()));
        if self.fail_at == FailAt::ProfileByName {
            anyhow::bail!("registry unavailable");
        }
        self.registered
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("distribution '{name}' not found"))
    }

    async fn write_profile(&self, profile: &InstanceProfile) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::WriteProfile(profile.clone()));
        if self.fail_at == FailAt::WriteProfile {
            anyhow::bail!("registry write denied");
        }
        self.written.borrow_mut().push(profile.clone());
        self.registered
            .borrow_mut()
            .insert(profile.name.clone(), profile.clone());
        Ok(())
    }
}

/// Fetcher that writes fixed bytes, or writes them and then fails.
pub struct FakeFetcher {
    pub body: Vec<u8>,
    pub fail_after_write: bool,
    pub fetched: RefCell<Vec<PathBuf>>,
}

impl FakeFetcher {
    pub fn serving(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            fail_after_write: false,
            fetched: RefCell::new(Vec::new()),
        }
    }

    pub fn interrupted(partial: &[u8]) -> Self {
        Self {
            fail_after_write: true,
            ..Self::serving(partial)
        }
    }
}

impl ArtifactFetcher for FakeFetcher {
    fn fetch(&self, _url: &str, dest: &Path, _show_progress: bool) -> Result<String> {
        self.fetched.borrow_mut().push(dest.to_path_buf());
        std::fs::write(dest, &self.body)?;
        if self.fail_after_write {
            anyhow::bail!("Download interrupted");
        }
        Ok(sha256_hex(&self.body))
    }
}

/// Hasher that counts how often it is asked to hash.
#[derive(Default)]
pub struct CountingHasher {
    pub calls: RefCell<usize>,
}

impl FileHasher for CountingHasher {
    fn sha256_file(&self, path: &Path) -> Result<String> {
        *self.calls.borrow_mut() += 1;
        Ok(sha256_hex(&std::fs::read(path)?))
    }
}

/// Real filesystem checks without an executable path.
pub struct TestFs;

impl LocalFs for TestFs {
    fn executable_path(&self) -> Option<PathBuf> {
        None
    }
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
    fn ensure_readable_file(&self, path: &Path) -> Result<()> {
        anyhow::ensure!(path.is_file(), "{} is not a file", path.display());
        std::fs::File::open(path)?;
        Ok(())
    }
}

/// Reporter that records messages.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    crate::domain::artifact::hex_encode(&Sha256::digest(bytes))
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}
