//! License facts read from the store.

use chrono::NaiveDate;
use licensekit_config::ConfigStore;

/// Key names consulted in the license section.
pub mod keys {
    pub const ACCEPTED_SERIAL_NUMBER: &str = "AcceptedSerialNumber";
    pub const BLACKLISTED_SERIAL_NUMBER: &str = "BlackListedSerialNumber";
    pub const ACCEPTED_ACTIVATION_CODE: &str = "AcceptedActivationCode";
    pub const USER_NAME: &str = "UserName";
    pub const EMAIL: &str = "EMail";
    pub const EXP_DATE: &str = "ExpDate";
    pub const MAX_BUILD_DATE: &str = "MaxBuildDate";
    pub const TIME_LIMIT: &str = "TimeLimit";
    pub const KEY_HWID: &str = "KeyHWID";
    pub const MY_HWID: &str = "MyHWID";
    pub const USER_DATA: &str = "UserData";
    pub const ACTIVATION_URL: &str = "ActivationUrl";
    pub const PRODUCT_CODE: &str = "ProductCode";
}

/// Serial accepted when the store does not name one.
pub const DEFAULT_ACCEPTED_SERIAL: &str = "serialnumber";

/// Activation code accepted when the store does not name one.
pub const DEFAULT_ACTIVATION_CODE: &str = "activationcode";

/// Upper bound of the running-time limit, in minutes.
pub const MAX_RUNNING_TIME: i64 = 255;

/// Snapshot of every license fact in the store.
///
/// `None` always means "not configured", which is never the same as an
/// empty or zero value: an absent expiration date enforces no expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseFacts {
    pub accepted_serial: Option<String>,
    pub blacklisted_serial: Option<String>,
    pub accepted_activation_code: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub max_build_date: Option<NaiveDate>,
    /// Minutes, already clamped to `0..=255`.
    pub running_time_limit: Option<u8>,
    pub key_hwid: Option<String>,
    pub my_hwid: Option<String>,
    /// Hex text exactly as stored; decoded on demand.
    pub user_data: Option<String>,
}

impl LicenseFacts {
    /// Reads every fact from the store's bound section.
    #[must_use]
    pub fn from_store(store: &ConfigStore) -> Self {
        let text = |key: &str| store.lookup(key).map(str::to_string);
        Self {
            accepted_serial: text(keys::ACCEPTED_SERIAL_NUMBER),
            blacklisted_serial: text(keys::BLACKLISTED_SERIAL_NUMBER),
            accepted_activation_code: text(keys::ACCEPTED_ACTIVATION_CODE),
            user_name: text(keys::USER_NAME),
            email: text(keys::EMAIL),
            expiration_date: store.lookup_date(keys::EXP_DATE),
            max_build_date: store.lookup_date(keys::MAX_BUILD_DATE),
            running_time_limit: store
                .lookup_bounded_int(keys::TIME_LIMIT, 0, MAX_RUNNING_TIME)
                .and_then(|v| u8::try_from(v).ok()),
            key_hwid: text(keys::KEY_HWID),
            my_hwid: text(keys::MY_HWID),
            user_data: text(keys::USER_DATA),
        }
    }

    /// The serial that counts as accepted.
    #[must_use]
    pub fn accepted_serial(&self) -> &str {
        self.accepted_serial
            .as_deref()
            .unwrap_or(DEFAULT_ACCEPTED_SERIAL)
    }

    /// The activation code that counts as accepted.
    #[must_use]
    pub fn accepted_activation_code(&self) -> &str {
        self.accepted_activation_code
            .as_deref()
            .unwrap_or(DEFAULT_ACTIVATION_CODE)
    }

    /// Returns true if the key is bound to a hardware id other than this
    /// machine's.
    ///
    /// A key without `KeyHWID` is not bound and never mismatches. A bound
    /// key mismatches when `MyHWID` is unset.
    #[must_use]
    pub fn hwid_mismatch(&self) -> bool {
        self.key_hwid
            .as_deref()
            .is_some_and(|key| Some(key) != self.my_hwid.as_deref())
    }
}
