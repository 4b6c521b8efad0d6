//! The license store and its typed lookups.

use crate::error::{ConfigError, ConfigResult};
use crate::ini::IniDocument;
use chrono::NaiveDate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up next to the running executable.
pub const DEFAULT_FILE_NAME: &str = "license.ini";

/// Section holding the license facts.
pub const DEFAULT_SECTION: &str = "TestLicense";

/// A read-only view over one section of a license store.
///
/// A store whose backing file is missing behaves as if every key is unset.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    document: Option<IniDocument>,
    section: String,
    source: Option<PathBuf>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigStore {
    /// A store with no backing data.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            document: None,
            section: DEFAULT_SECTION.to_string(),
            source: None,
        }
    }

    /// Builds a store from INI text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            document: Some(IniDocument::parse(text)),
            section: DEFAULT_SECTION.to_string(),
            source: None,
        }
    }

    /// Loads a store from `path`.
    ///
    /// A missing file yields an empty store. Invalid UTF-8 is replaced
    /// rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => {
                debug!(path = %path.display(), "loaded license store");
                let text = String::from_utf8_lossy(&bytes);
                Ok(Self {
                    source: Some(path.to_path_buf()),
                    ..Self::parse(&text)
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no license store, no facts configured");
                Ok(Self {
                    source: Some(path.to_path_buf()),
                    ..Self::empty()
                })
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads [`DEFAULT_FILE_NAME`] from the directory of the running executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable path is unknown or the store
    /// exists but cannot be read.
    pub fn beside_executable() -> ConfigResult<Self> {
        let exe = std::env::current_exe().map_err(ConfigError::ExecutablePath)?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Self::load(dir.join(DEFAULT_FILE_NAME))
    }

    /// Like [`ConfigStore::beside_executable`], but falls back to an empty
    /// store on failure.
    #[must_use]
    pub fn beside_executable_or_empty() -> Self {
        Self::beside_executable().unwrap_or_else(|e| {
            warn!("license store unavailable, no facts configured: {e}");
            Self::empty()
        })
    }

    /// Rebinds the store to another section.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// The section consulted by [`ConfigStore::lookup`].
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Path the store was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns true if a backing document was loaded.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.document.is_some()
    }

    /// Looks up `key` in the bound section.
    ///
    /// Empty values are reported as unset.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.lookup_in(&self.section, key)
    }

    /// Looks up `key` in an arbitrary section.
    #[must_use]
    pub fn lookup_in(&self, section: &str, key: &str) -> Option<&str> {
        self.document
            .as_ref()?
            .section(section)?
            .get(key)
            .filter(|v| !v.is_empty())
    }

    /// Looks up a `YYYYMMDD` date.
    ///
    /// Anything other than eight ASCII digits forming a real calendar date
    /// is reported as unset.
    #[must_use]
    pub fn lookup_date(&self, key: &str) -> Option<NaiveDate> {
        let value = self.lookup(key)?;
        let date = parse_compact_date(value);
        if date.is_none() {
            debug!(key, "ignoring malformed date");
        }
        date
    }

    /// Looks up an integer clamped into `[lo, hi]`.
    ///
    /// `None` means the key is absent or empty. Any present value yields
    /// `Some`: text that is not a number reads as 0 and is clamped like
    /// any other value. Bounds given in either order describe the same range.
    #[must_use]
    pub fn lookup_bounded_int(&self, key: &str, lo: i64, hi: i64) -> Option<i64> {
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        self.lookup(key)
            .map(|v| parse_leading_int(v).clamp(lo, hi))
    }
}

fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses the leading integer of `s` the way C `atoi` does.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit, and text without digits reads as 0. Saturates on overflow.
#[must_use]
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_date() {
        assert_eq!(
            parse_compact_date("20240229"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_compact_date("20230229"), None);
        assert_eq!(parse_compact_date("2024-1-1"), None);
        assert_eq!(parse_compact_date("202401011"), None);
    }

    #[test]
    fn leading_int() {
        assert_eq!(parse_leading_int("42"), 42);
        assert_eq!(parse_leading_int("  -7x"), -7);
        assert_eq!(parse_leading_int("12abc"), 12);
        assert_eq!(parse_leading_int("abc"), 0);
        assert_eq!(parse_leading_int("+"), 0);
        assert_eq!(parse_leading_int("99999999999999999999999"), i64::MAX);
    }
}
