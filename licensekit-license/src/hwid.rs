//! Hardware id of the running machine.
//!
//! The configured `MyHWID` wins. Without it the id is a fingerprint of
//! identifiers that survive reboots but change when the license is copied
//! to a different computer.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sha2::{Digest, Sha256};
use std::process::Command;
use std::sync::OnceLock;

/// Bytes of the digest kept in the fingerprint.
const FINGERPRINT_LEN: usize = 16;

/// Identifiers describing one machine, in hashing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MachineIds {
    pub os: String,
    pub arch: String,
    pub host: Option<String>,
    pub platform_id: Option<String>,
    pub user: Option<String>,
}

impl MachineIds {
    /// Reads the identifiers of the running machine.
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            host: hostname::get().ok().and_then(|h| h.into_string().ok()),
            platform_id: platform_id(),
            user: std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .ok(),
        }
    }

    /// Base64 of the leading bytes of a SHA-256 over every identifier.
    ///
    /// Each identifier is NUL-terminated so adjacent values cannot run
    /// together; a missing one hashes as empty.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            Some(self.os.as_str()),
            Some(self.arch.as_str()),
            self.host.as_deref(),
            self.platform_id.as_deref(),
            self.user.as_deref(),
        ] {
            hasher.update(part.unwrap_or_default().as_bytes());
            hasher.update([0u8]);
        }
        BASE64.encode(&hasher.finalize()[..FINGERPRINT_LEN])
    }
}

/// Returns a stable fingerprint of this machine.
#[must_use]
pub fn machine_fingerprint() -> String {
    MachineIds::current().fingerprint()
}

/// `configured` if set, otherwise this machine's fingerprint, computed once
/// per `cache`.
pub(crate) fn resolve_hwid(configured: Option<&str>, cache: &OnceLock<String>) -> String {
    match configured {
        Some(hwid) => hwid.to_string(),
        None => cache.get_or_init(machine_fingerprint).clone(),
    }
}

#[cfg(target_os = "linux")]
fn platform_id() -> Option<String> {
    ["/etc/machine-id", "/var/lib/dbus/machine-id"]
        .into_iter()
        .find_map(|path| non_empty(std::fs::read_to_string(path).ok()?))
}

#[cfg(target_os = "macos")]
fn platform_id() -> Option<String> {
    let out = command_output("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"])?;
    out.lines()
        .find(|line| line.contains("\"IOPlatformUUID\""))
        .and_then(|line| line.rsplit('"').nth(1))
        .and_then(|id| non_empty(id.to_string()))
}

#[cfg(target_os = "windows")]
fn platform_id() -> Option<String> {
    let out = command_output(
        "reg",
        &[
            "query",
            r"HKLM\SOFTWARE\Microsoft\Cryptography",
            "/v",
            "MachineGuid",
        ],
    )?;
    out.lines()
        .find(|line| line.trim_start().starts_with("MachineGuid"))
        .and_then(|line| line.split_whitespace().last())
        .and_then(|id| non_empty(id.to_string()))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_id() -> Option<String> {
    None
}

#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MachineIds {
        MachineIds {
            os: "linux".into(),
            arch: "x86_64".into(),
            host: Some("build-01".into()),
            platform_id: Some("0123abcd".into()),
            user: Some("jane".into()),
        }
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(machine_fingerprint(), machine_fingerprint());
        assert_eq!(sample().fingerprint(), sample().fingerprint());
    }

    #[test]
    fn fingerprint_is_base64_of_16_bytes() {
        let fp = machine_fingerprint();
        assert_eq!(BASE64.decode(&fp).unwrap().len(), FINGERPRINT_LEN);
    }

    #[test]
    fn fingerprint_tracks_each_identifier() {
        let base = sample().fingerprint();
        let moved = MachineIds {
            host: Some("build-02".into()),
            ..sample()
        };
        let no_platform = MachineIds {
            platform_id: None,
            ..sample()
        };
        assert_ne!(moved.fingerprint(), base);
        assert_ne!(no_platform.fingerprint(), base);
    }

    #[test]
    fn identifiers_do_not_run_together() {
        let a = MachineIds {
            host: Some("ab".into()),
            platform_id: Some("c".into()),
            ..sample()
        };
        let b = MachineIds {
            host: Some("a".into()),
            platform_id: Some("bc".into()),
            ..sample()
        };
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn configured_hwid_wins() {
        let cache = OnceLock::new();
        assert_eq!(resolve_hwid(Some("machine-7"), &cache), "machine-7");
        assert!(cache.get().is_none());
        assert_eq!(resolve_hwid(None, &cache), machine_fingerprint());
        assert!(cache.get().is_some());
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty(" id \n".into()), Some("id".into()));
        assert_eq!(non_empty("  ".into()), None);
    }
}
