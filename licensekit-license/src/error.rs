//! Error types for activation.

use thiserror::Error;

/// Wire value for a successful activation call.
pub const ACTIVATION_OK: i32 = 0;

/// Wire value reported by the C ABI when an output buffer is too small.
pub const ACTIVATION_SMALL_BUFFER: i32 = 1;

/// Ways an activation or deactivation request can fail.
///
/// Every variant is a business outcome rather than a fault; callers are
/// expected to branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ActivationError {
    /// The activation server could not be reached or timed out.
    #[error("no connection to activation server")]
    NoConnection,

    /// The server answered with something unrecognizable.
    #[error("bad reply from activation server")]
    BadReply,

    /// The activation code has been banned.
    #[error("activation code is banned")]
    Banned,

    /// Local activation state is inconsistent.
    #[error("activation data is corrupted")]
    Corrupted,

    /// The activation code is malformed or unknown.
    #[error("bad activation code")]
    BadCode,

    /// The activation code has already been used.
    #[error("activation code already used")]
    AlreadyUsed,

    /// The server does not know the serial being deactivated.
    #[error("serial number unknown to server")]
    SerialUnknown,

    /// The activation code has expired.
    #[error("activation code expired")]
    Expired,

    /// Activation is not available in this build or configuration.
    #[error("activation not available")]
    NotAvailable,
}

impl ActivationError {
    /// Returns the numeric wire value for this outcome.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::NoConnection => 2,
            Self::BadReply => 3,
            Self::Banned => 4,
            Self::Corrupted => 5,
            Self::BadCode => 6,
            Self::AlreadyUsed => 7,
            Self::SerialUnknown => 8,
            Self::Expired => 9,
            Self::NotAvailable => 10,
        }
    }

    /// Maps a wire value back to an outcome.
    ///
    /// Returns `None` for [`ACTIVATION_OK`], [`ACTIVATION_SMALL_BUFFER`],
    /// and unknown values.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            2 => Some(Self::NoConnection),
            3 => Some(Self::BadReply),
            4 => Some(Self::Banned),
            5 => Some(Self::Corrupted),
            6 => Some(Self::BadCode),
            7 => Some(Self::AlreadyUsed),
            8 => Some(Self::SerialUnknown),
            9 => Some(Self::Expired),
            10 => Some(Self::NotAvailable),
            _ => None,
        }
    }
}

/// Result type for activation operations.
pub type ActivationResult<T> = Result<T, ActivationError>;
