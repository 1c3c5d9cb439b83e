//! Instance profile as persisted by the virtualization runtime.
//!
//! Pure data only. Reading and writing the record lives behind the
//! `ProfileStore` port.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;

/// Behaviour flag bitset stored in an instance profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DistroFlags(u32);

impl DistroFlags {
    /// Windows interop (launching Windows binaries from Linux).
    pub const ENABLE_INTEROP: Self = Self(0x1);
    /// Append the Windows `PATH` to `$PATH`.
    pub const APPEND_NT_PATH: Self = Self(0x2);
    /// Automount Windows drives under `/mnt`.
    pub const ENABLE_DRIVE_MOUNTING: Self = Self(0x4);
    /// Version-2 instance backed by a VM disk image.
    pub const ENABLE_WSL2: Self = Self(0x8);

    /// Flags the runtime assigns to a freshly registered instance.
    pub const DEFAULT: Self = Self(0x7);

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DistroFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DistroFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for DistroFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The runtime's persisted record for a named instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceProfile {
    /// Identifier of the record in the runtime's store (a GUID subkey).
    pub id: String,
    /// Distribution name.
    pub name: String,
    /// Storage directory assigned by the runtime. Empty when unresolved.
    pub base_path: PathBuf,
    /// Behaviour flags.
    pub flags: DistroFlags,
    /// Instance format version (2 for VM-backed instances).
    pub version: Option<u32>,
    /// Default Linux user id.
    pub default_uid: Option<u32>,
    /// Registration state. `None` when the record carries no state value.
    pub state: Option<u32>,
}

impl InstanceProfile {
    /// Registration state of a fully installed instance.
    pub const STATE_INSTALLED: u32 = 0x1;

    /// Returns `true` when the runtime has assigned a storage directory.
    #[must_use]
    pub fn has_base_path(&self) -> bool {
        !self.base_path.as_os_str().is_empty()
    }

    /// Mark the instance as booting directly from its disk image.
    pub fn enable_vm_disk_image(&mut self) {
        self.flags |= DistroFlags::ENABLE_WSL2;
    }
}
