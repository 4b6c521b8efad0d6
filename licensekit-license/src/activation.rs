//! Activation code exchange.
//!
//! An activation code is a short, one-time code that the vendor's server
//! trades for a serial number bound to this machine. Three paths exist:
//!
//! - **Local**: the code is checked against the store. This is the
//!   contract every build supports.
//! - **Offline**: the request is packed into an opaque string that the
//!   user submits through a browser-based manager when the machine has no
//!   connectivity.
//! - **Online** (feature `online`): the request is sent to the server and
//!   its reply mapped onto [`ActivationError`].
//!
//! # Request Format
//!
//! Requests are query strings. Activation sends `code`, `hwid` (base64 of
//! the hardware id), and `hash` (base64 SHA-256 of the product code).
//! Deactivation sends only `hash`, the base64 SHA-256 of the canonical
//! serial. Offline strings are the base64 of the same query prefixed with
//! `type=activation&` or `type=deactivation&`.

use crate::error::{ActivationError, ActivationResult};
use crate::facts::{keys, LicenseFacts};
use crate::serial::normalize;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use licensekit_config::ConfigStore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

/// Longest accepted activation code.
pub const MAX_CODE_LEN: usize = 32;

/// Shortest serial number a server reply may carry.
pub const MIN_REPLY_SERIAL_LEN: usize = 64;

/// Default timeout for remote activation requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and as what product to activate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationSettings {
    /// Base URL of the activation server. `None` disables remote activation.
    pub server_url: Option<String>,
    /// Identifies the product to the server.
    pub product_code: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            server_url: None,
            product_code: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ActivationSettings {
    /// Reads `ActivationUrl` and `ProductCode` from the store.
    #[must_use]
    pub fn from_store(store: &ConfigStore) -> Self {
        Self {
            server_url: store.lookup(keys::ACTIVATION_URL).map(str::to_string),
            product_code: store
                .lookup(keys::PRODUCT_CODE)
                .unwrap_or_default()
                .to_string(),
            ..Self::default()
        }
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base64 SHA-256 of the product code, sent as `hash`.
    #[must_use]
    pub fn product_hash(&self) -> String {
        BASE64.encode(Sha256::digest(self.product_code.as_bytes()))
    }

    /// Full URL of a server page.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::NotAvailable`] if no server is configured.
    pub fn endpoint(&self, page: &str) -> ActivationResult<String> {
        let base = self
            .server_url
            .as_deref()
            .ok_or(ActivationError::NotAvailable)?;
        Ok(format!("{}/{page}", base.trim_end_matches('/')))
    }
}

/// Returns true if `code` is a well-formed activation code.
///
/// Codes are 1 to [`MAX_CODE_LEN`] characters of `[0-9a-z-]`, any case.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Base64 SHA-256 of the canonical form of `serial`.
#[must_use]
pub fn serial_hash(serial: &str) -> String {
    BASE64.encode(Sha256::digest(normalize(serial).as_bytes()))
}

/// Packs an activation request for manual submission.
///
/// # Errors
///
/// Returns [`ActivationError::BadCode`] if `code` is malformed.
pub fn offline_activation_string(
    code: &str,
    hwid: &str,
    settings: &ActivationSettings,
) -> ActivationResult<String> {
    if !is_valid_code(code) {
        return Err(ActivationError::BadCode);
    }
    let query = format!(
        "type=activation&code={}&hwid={}&hash={}",
        escape(code),
        escape(&BASE64.encode(hwid.as_bytes())),
        escape(&settings.product_hash()),
    );
    debug!("built offline activation string");
    Ok(BASE64.encode(query))
}

/// Packs a deactivation request for manual submission.
///
/// # Errors
///
/// Returns [`ActivationError::BadCode`] if `serial` has no canonical content.
pub fn offline_deactivation_string(serial: &str) -> ActivationResult<String> {
    if normalize(serial).is_empty() {
        return Err(ActivationError::BadCode);
    }
    let query = format!("type=deactivation&hash={}", escape(&serial_hash(serial)));
    debug!("built offline deactivation string");
    Ok(BASE64.encode(query))
}

/// Maps the body of an activation reply.
///
/// The server answers `OK` followed by a newline and the serial, or one of
/// `BAD`, `BANNED`, `USED`, `EXPIRED`.
///
/// # Errors
///
/// Returns the outcome named by the server, or
/// [`ActivationError::BadReply`] for anything unrecognized.
pub fn parse_activation_reply(body: &str) -> ActivationResult<String> {
    let body = body.trim_end();
    match body {
        "" => Err(ActivationError::BadReply),
        "BAD" => Err(ActivationError::BadCode),
        "BANNED" => Err(ActivationError::Banned),
        "USED" => Err(ActivationError::AlreadyUsed),
        "EXPIRED" => Err(ActivationError::Expired),
        _ => match body.split_once('\n') {
            Some(("OK", serial)) if serial.len() >= MIN_REPLY_SERIAL_LEN => Ok(serial.to_string()),
            _ => Err(ActivationError::BadReply),
        },
    }
}

/// Maps the body of a deactivation reply: `OK`, `ERROR`, or `UNKNOWN`.
///
/// # Errors
///
/// `ERROR` maps to [`ActivationError::Corrupted`], `UNKNOWN` to
/// [`ActivationError::SerialUnknown`], anything else to
/// [`ActivationError::BadReply`].
pub fn parse_deactivation_reply(body: &str) -> ActivationResult<()> {
    match body.trim_end() {
        "OK" => Ok(()),
        "ERROR" => Err(ActivationError::Corrupted),
        "UNKNOWN" => Err(ActivationError::SerialUnknown),
        _ => Err(ActivationError::BadReply),
    }
}

/// Activation against the facts in the local store.
#[derive(Debug, Clone, Copy)]
pub struct LocalActivation<'a> {
    facts: &'a LicenseFacts,
}

impl<'a> LocalActivation<'a> {
    pub fn new(facts: &'a LicenseFacts) -> Self {
        Self { facts }
    }

    /// Trades `code` for the accepted serial number.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::BadCode`] unless `code` equals the
    /// accepted activation code.
    pub fn activate(&self, code: &str) -> ActivationResult<String> {
        if code != self.facts.accepted_activation_code() {
            debug!("activation code rejected");
            return Err(ActivationError::BadCode);
        }
        info!("license activated");
        Ok(self.facts.accepted_serial().to_string())
    }

    /// Releases `serial`. Always succeeds locally.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the online client.
    pub fn deactivate(&self, _serial: &str) -> ActivationResult<()> {
        info!("license deactivated");
        Ok(())
    }
}

/// Form-url escaping: unreserved characters pass, space becomes `+`,
/// everything else `%xx`.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(b));
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02x}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_reserved() {
        assert_eq!(escape("a b+/="), "a+b%2b%2f%3d");
        assert_eq!(escape("Az09-_.~"), "Az09-_.~");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let settings = ActivationSettings {
            server_url: Some("https://example.com/act/".into()),
            ..Default::default()
        };
        assert_eq!(
            settings.endpoint("activation.php").unwrap(),
            "https://example.com/act/activation.php"
        );
    }
}
