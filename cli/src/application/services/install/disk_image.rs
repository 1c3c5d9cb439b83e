//! Disk-image install: placeholder registration, relocation and profile patch.
//!
//! The runtime only allocates a storage directory when an instance is
//! registered from an archive. The protocol therefore registers a zero-byte
//! placeholder archive, reads back the allocated base path, unregisters the
//! placeholder, writes the image as `<base_path>/ext4.vhdx` and finally sets
//! the VM-backed flag on the stored profile.
//!
//! There is no rollback between phases. A failure after the placeholder is
//! registered leaves whatever runtime state the failed phase produced.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::application::ports::DistroRuntime;
use crate::domain::artifact::DISK_IMAGE_FILENAME;
use crate::domain::{InstallError, InstallPhase, InstanceProfile};

/// Chunk size for streaming the image into place.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Install the disk image at `image` as instance `name`.
///
/// Returns the profile as written back to the runtime.
///
/// # Errors
///
/// Each phase fails with its own [`InstallError`] variant carrying the phase
/// reached: `Registration`, `ProfileLookup`, `Unregistration`,
/// `Io`/`Decompression`, `ProfileWrite`.
pub async fn install_disk_image(
    runtime: &impl DistroRuntime,
    name: &str,
    image: &Path,
    compressed: bool,
    temp_dir: &Path,
) -> Result<InstanceProfile> {
    let mut phase = enter(name, InstallPhase::Start);

    // Placeholder registration. The empty archive is deleted as soon as the
    // runtime has consumed it, or on the error path when `placeholder` drops.
    let placeholder = tempfile::Builder::new()
        .prefix("em-vhdx-temp")
        .suffix(".tar")
        .tempfile_in(temp_dir)
        .with_context(|| format!("creating placeholder archive in {}", temp_dir.display()))
        .with_context(|| InstallError::Registration {
            name: name.to_string(),
            phase,
        })?
        .into_temp_path();
    runtime
        .register(name, &placeholder)
        .await
        .with_context(|| InstallError::Registration {
            name: name.to_string(),
            phase,
        })?;
    drop(placeholder);
    phase = enter(name, InstallPhase::PlaceholderRegistered);

    // Location discovery.
    let mut profile = runtime
        .profile_by_name(name)
        .await
        .with_context(|| InstallError::ProfileLookup {
            name: name.to_string(),
            phase,
        })?;
    if !profile.has_base_path() {
        return Err(InstallError::ProfileLookup {
            name: name.to_string(),
            phase,
        }
        .into());
    }
    phase = enter(name, InstallPhase::ProfileRead);

    // Placeholder teardown. Only the registration goes; the base path stays.
    runtime
        .unregister(name)
        .await
        .with_context(|| InstallError::Unregistration {
            name: name.to_string(),
            phase,
        })?;
    phase = enter(name, InstallPhase::PlaceholderRemoved);

    let dest = profile.base_path.join(DISK_IMAGE_FILENAME);
    let written = materialize(image, &dest, compressed, phase)?;
    tracing::debug!(dest = %dest.display(), bytes = written, "disk image written");
    phase = enter(name, InstallPhase::ImageWritten);

    profile.enable_vm_disk_image();
    runtime
        .write_profile(&profile)
        .await
        .with_context(|| InstallError::ProfileWrite {
            name: name.to_string(),
            phase,
        })?;
    enter(name, InstallPhase::ConfigPatched);

    Ok(profile)
}

fn enter(name: &str, phase: InstallPhase) -> InstallPhase {
    tracing::debug!(distro = name, %phase, "disk image install phase");
    phase
}

/// Stream `image` (gunzipped when `compressed`) into `dest`.
///
/// A partially written `dest` is left in place on failure.
fn materialize(image: &Path, dest: &Path, compressed: bool, phase: InstallPhase) -> Result<u64> {
    let io_error = || InstallError::Io {
        path: dest.to_path_buf(),
        phase,
    };

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))
            .with_context(io_error)?;
    }
    let source = File::open(image)
        .with_context(|| format!("opening {}", image.display()))
        .with_context(io_error)?;
    let target = File::create(dest)
        .with_context(|| format!("creating {}", dest.display()))
        .with_context(io_error)?;

    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, source);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, target);
    let copy = CopyTarget {
        dest: dest.to_path_buf(),
        phase,
        compressed,
    };
    let written = if compressed {
        copy.stream(&mut MultiGzDecoder::new(reader), &mut writer)?
    } else {
        copy.stream(&mut reader, &mut writer)?
    };

    writer
        .into_inner()
        .map_err(std::io::IntoInnerError::into_error)
        .and_then(|file| file.sync_all())
        .with_context(|| format!("flushing {}", dest.display()))
        .with_context(io_error)?;
    Ok(written)
}

struct CopyTarget {
    dest: PathBuf,
    phase: InstallPhase,
    compressed: bool,
}

impl CopyTarget {
    fn stream(&self, reader: &mut impl Read, writer: &mut impl Write) -> Result<u64> {
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(anyhow::Error::new(e).context(self.read_error())),
            };
            writer
                .write_all(&buf[..n])
                .with_context(|| InstallError::Io {
                    path: self.dest.clone(),
                    phase: self.phase,
                })?;
            total += n as u64;
        }
        Ok(total)
    }

    fn read_error(&self) -> InstallError {
        if self.compressed {
            InstallError::Decompression {
                path: self.dest.clone(),
                phase: self.phase,
            }
        } else {
            InstallError::Io {
                path: self.dest.clone(),
                phase: self.phase,
            }
        }
    }
}
