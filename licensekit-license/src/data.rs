//! Structured view of an evaluated serial number.

use crate::facts::LicenseFacts;
use crate::state::SerialState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest user payload, in bytes.
pub const MAX_USER_DATA_LEN: usize = 256;

/// Everything known about the current serial number.
///
/// Produced on demand and never cached. For a rejected serial only
/// `state` is filled in; every other field keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialNumberData {
    /// Verdict at the time the data was produced.
    pub state: SerialState,
    /// Licensee name.
    pub user_name: String,
    /// Licensee e-mail.
    pub email: String,
    /// Expiration date, or `None` for no limit.
    pub expires: Option<NaiveDate>,
    /// Latest build date the serial accepts, or `None` for no limit.
    pub max_build: Option<NaiveDate>,
    /// Running-time limit in minutes, 0 if unlimited.
    pub running_time: u8,
    /// Opaque payload attached to the serial.
    pub user_data: Vec<u8>,
}

impl SerialNumberData {
    /// Data for a rejected serial: the verdict and nothing else.
    #[must_use]
    pub fn rejected(state: SerialState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Projects the licensed data out of `facts`.
    #[must_use]
    pub fn project(state: SerialState, facts: &LicenseFacts) -> Self {
        Self {
            state,
            user_name: facts.user_name.clone().unwrap_or_default(),
            email: facts.email.clone().unwrap_or_default(),
            expires: facts.expiration_date,
            max_build: facts.max_build_date,
            running_time: facts.running_time_limit.unwrap_or(0),
            user_data: facts
                .user_data
                .as_deref()
                .map(decode_user_data)
                .unwrap_or_default(),
        }
    }
}

/// Decodes stored hex user data.
///
/// Anything but a positive, even length of at most
/// `2 * MAX_USER_DATA_LEN` digits, or any non-hex digit, yields an empty
/// payload. Decoding is all or nothing.
fn decode_user_data(hex_text: &str) -> Vec<u8> {
    let len = hex_text.len();
    if len == 0 || len % 2 != 0 || len > MAX_USER_DATA_LEN * 2 {
        debug!(len, "ignoring user data with bad length");
        return Vec::new();
    }
    hex::decode(hex_text).unwrap_or_else(|e| {
        debug!("ignoring malformed user data: {e}");
        Vec::new()
    })
}
