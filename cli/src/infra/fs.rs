//! Filesystem infrastructure — implements `LocalFs` and `FileHasher`.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::application::ports::{FileHasher, LocalFs};
use crate::domain::artifact::hex_encode;

/// Production filesystem adapter.
pub struct StdFs;

impl LocalFs for StdFs {
    fn executable_path(&self) -> Option<PathBuf> {
        std::env::current_exe().ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_readable_file(&self, path: &Path) -> Result<()> {
        let meta =
            std::fs::metadata(path).with_context(|| format!("{} not found", path.display()))?;
        anyhow::ensure!(meta.is_file(), "{} is not a regular file", path.display());
        std::fs::File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        Ok(())
    }
}

impl FileHasher for StdFs {
    fn sha256_file(&self, path: &Path) -> Result<String> {
        sha256_file(path)
    }
}

/// SHA-256 of a file as lowercase hex, read in 64 KiB chunks.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 65536];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex_encode(&hasher.finalize()))
}
