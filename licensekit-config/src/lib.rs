//! Sectioned key/value store backing the licensekit license facts.
//!
//! The store is a small INI-style file that lives next to the running
//! executable. Only one section is consulted by the licensing layer, and
//! every lookup is total:
//!
//! - A missing file, section, or key yields `None`
//! - An empty value is treated the same as a missing key
//! - Malformed dates are reported as unset
//! - Malformed integers are clamped into range, never rejected
//!
//! # File Format
//!
//! ```text
//! [TestLicense]
//! AcceptedSerialNumber=ABC123
//! ExpDate=20301231 ; inline comment
//! TimeLimit=10
//! ```

mod error;
mod ini;
mod store;

pub use error::{ConfigError, ConfigResult};
pub use ini::{IniDocument, Section};
pub use store::{parse_leading_int, ConfigStore, DEFAULT_FILE_NAME, DEFAULT_SECTION};
