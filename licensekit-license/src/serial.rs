//! Serial number normalization.
//!
//! Serial numbers are base64 text. End users paste them with line breaks,
//! spaces, and dashes mixed in, so comparison happens on the canonical form:
//! the input with everything outside the base64 alphabet removed.

/// Returns true if `c` belongs to the serial alphabet `[A-Za-z0-9+/=]`.
#[must_use]
pub const fn is_serial_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

/// Filters `raw` down to the serial alphabet, preserving order.
///
/// Total and idempotent; the result may be empty.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|&c| is_serial_char(c)).collect()
}
