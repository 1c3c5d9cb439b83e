//! Infrastructure implementation of the `ProfileStore` port.
//!
//! Instance profiles live under the per-user `Lxss` registry key, one subkey
//! per instance named by its GUID. They are read with `reg.exe query /s` and
//! written back value by value with `reg.exe add`, which recreates the subkey
//! when the runtime has already dropped it.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProfileStore};
use crate::domain::{DistroFlags, InstanceProfile};
use crate::infra::wsl::{WslRuntime, decode_output};

const REG_EXE: &str = "reg.exe";

/// Root key holding one subkey per registered instance.
pub const LXSS_KEY: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Lxss";

/// Extended-length prefix the runtime stores on some base paths.
const VERBATIM_PREFIX: &str = r"\\?\";

impl<R: CommandRunner> ProfileStore for WslRuntime<R> {
    async fn profile_by_name(&self, name: &str) -> Result<InstanceProfile> {
        let output = self
            .runner
            .run(REG_EXE, &["query", LXSS_KEY, "/s"])
            .await
            .context("reg query")?;
        if !output.status.success() {
            anyhow::bail!(
                "reg query {LXSS_KEY} failed: {}",
                decode_output(&output.stderr).trim()
            );
        }
        let profiles = parse_query(&decode_output(&output.stdout));
        tracing::debug!(count = profiles.len(), "registry profiles read");
        profiles
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("distribution '{name}' not found under {LXSS_KEY}"))
    }

    async fn write_profile(&self, profile: &InstanceProfile) -> Result<()> {
        anyhow::ensure!(
            !profile.id.is_empty(),
            "profile of '{}' has no registry id",
            profile.name
        );
        let subkey = format!(r"{LXSS_KEY}\{}", profile.id);
        tracing::debug!(subkey = %subkey, flags = %profile.flags, "writing profile");
        for value in profile_values(profile) {
            let output = self
                .runner
                .run(
                    REG_EXE,
                    &["add", &subkey, "/v", value.name, "/t", value.kind, "/d", &value.data, "/f"],
                )
                .await
                .context("reg add")?;
            if !output.status.success() {
                anyhow::bail!(
                    "reg add {subkey} /v {} failed: {}",
                    value.name,
                    decode_output(&output.stderr).trim()
                );
            }
        }
        Ok(())
    }
}

/// One named registry value of an instance subkey.
struct RegValue {
    name: &'static str,
    kind: &'static str,
    data: String,
}

impl RegValue {
    fn sz(name: &'static str, data: String) -> Self {
        Self {
            name,
            kind: "REG_SZ",
            data,
        }
    }

    fn dword(name: &'static str, data: u32) -> Self {
        Self {
            name,
            kind: "REG_DWORD",
            data: data.to_string(),
        }
    }
}

/// Every value that makes up a complete instance record.
///
/// A missing state is written as installed; absent version and default uid
/// are left for the runtime to default.
fn profile_values(profile: &InstanceProfile) -> Vec<RegValue> {
    let mut values = vec![
        RegValue::sz("DistributionName", profile.name.clone()),
        RegValue::sz("BasePath", profile.base_path.display().to_string()),
        RegValue::dword(
            "State",
            profile.state.unwrap_or(InstanceProfile::STATE_INSTALLED),
        ),
    ];
    values.extend(profile.version.map(|v| RegValue::dword("Version", v)));
    values.extend(profile.default_uid.map(|uid| RegValue::dword("DefaultUid", uid)));
    values.push(RegValue::dword("Flags", profile.flags.bits()));
    values
}

/// Parse `reg query <LXSS_KEY> /s` output into instance profiles.
///
/// Subkeys without a `DistributionName` are skipped.
pub fn parse_query(text: &str) -> Vec<InstanceProfile> {
    let mut profiles = Vec::new();
    let mut current: Option<InstanceProfile> = None;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HKEY_") {
            profiles.extend(current.take().filter(|p| !p.name.is_empty()));
            current = instance_id(line).map(|id| InstanceProfile {
                id: id.to_string(),
                name: String::new(),
                base_path: PathBuf::new(),
                flags: DistroFlags::DEFAULT,
                version: None,
                default_uid: None,
                state: None,
            });
            continue;
        }
        let Some(profile) = current.as_mut() else {
            continue;
        };
        let mut fields = line.trim_start().splitn(3, "    ");
        let (Some(value_name), Some(kind)) = (fields.next(), fields.next()) else {
            continue;
        };
        let data = fields.next().unwrap_or("").trim();
        match (value_name, kind) {
            ("DistributionName", "REG_SZ") => profile.name = data.to_string(),
            ("BasePath", "REG_SZ" | "REG_EXPAND_SZ") => {
                profile.base_path = PathBuf::from(data.strip_prefix(VERBATIM_PREFIX).unwrap_or(data));
            }
            ("Flags", "REG_DWORD") => {
                if let Some(bits) = parse_dword(data) {
                    profile.flags = DistroFlags::from_bits(bits);
                }
            }
            ("Version", "REG_DWORD") => profile.version = parse_dword(data),
            ("DefaultUid", "REG_DWORD") => profile.default_uid = parse_dword(data),
            ("State", "REG_DWORD") => profile.state = parse_dword(data),
            _ => {}
        }
    }
    profiles.extend(current.filter(|p| !p.name.is_empty()));
    profiles
}

/// GUID of an instance subkey, or `None` for the root key and deeper keys.
fn instance_id(key_line: &str) -> Option<&str> {
    let (_, tail) = key_line.rsplit_once(r"\Lxss\")?;
    (!tail.is_empty() && !tail.contains('\\')).then_some(tail)
}

/// Parse `reg.exe`'s `0x`-prefixed hexadecimal DWORD rendering.
fn parse_dword(data: &str) -> Option<u32> {
    let hex = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))?;
    u32::from_str_radix(hex, 16).ok()
}
