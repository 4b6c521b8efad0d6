//! Serial number validation and activation for licensekit.
//!
//! This crate handles:
//! - Normalizing end-user serial numbers into their canonical alphabet
//! - Evaluating a serial against the stored license facts (expiry,
//!   running-time budget, build-date ceiling, hardware binding, blacklist)
//! - Projecting the licensed user data once a serial is accepted
//! - Exchanging activation codes for serial numbers, online or offline
//!
//! # Verdicts
//!
//! Evaluation produces a [`SerialState`], a set of [`SerialFlag`]s. An empty
//! set means success. `Invalid` and `Blacklisted` are terminal: when either
//! is reported no other fact is evaluated and no user data is exposed.
//! The remaining flags describe a serial that is accepted but restricted,
//! and may be combined freely.
//!
//! # Session State
//!
//! The "is the current serial accepted" state lives in a
//! [`LicenseEvaluator`] value rather than in process globals, so
//! independent evaluations can coexist. The evaluator serializes every
//! read and write of that state behind one lock.

mod activation;
mod clock;
mod data;
mod error;
mod evaluator;
mod facts;
mod hwid;
mod licensing;
mod probe;
mod serial;
mod state;

#[cfg(feature = "online")]
mod online;

pub use activation::{
    is_valid_code, offline_activation_string, offline_deactivation_string,
    parse_activation_reply, parse_deactivation_reply, serial_hash, ActivationSettings,
    LocalActivation, DEFAULT_TIMEOUT_SECS, MAX_CODE_LEN, MIN_REPLY_SERIAL_LEN,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use data::{SerialNumberData, MAX_USER_DATA_LEN};
pub use error::{ActivationError, ActivationResult, ACTIVATION_OK, ACTIVATION_SMALL_BUFFER};
pub use evaluator::{LicenseEvaluator, SessionState};
pub use facts::{keys, LicenseFacts, DEFAULT_ACCEPTED_SERIAL, DEFAULT_ACTIVATION_CODE, MAX_RUNNING_TIME};
pub use hwid::machine_fingerprint;
pub use licensing::Licensing;
pub use probe::{ProtectionProbe, Unprotected};
pub use serial::{is_serial_char, normalize};
pub use state::{SerialFlag, SerialState};

#[cfg(feature = "online")]
pub use online::OnlineActivation;
