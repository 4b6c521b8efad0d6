//! Serial number verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// One independent condition reported about a serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialFlag {
    /// Stored license data failed an integrity check.
    Corrupted,
    /// The serial is not the accepted one.
    Invalid,
    /// The serial is on the blacklist.
    Blacklisted,
    /// The expiration date has passed.
    DateExpired,
    /// The running-time budget for this session is used up.
    RunningTimeOver,
    /// The serial is bound to another machine.
    BadHwid,
    /// This build is newer than the serial allows.
    MaxBuildExpired,
}

impl SerialFlag {
    /// Every flag, in wire-bit order.
    pub const ALL: [Self; 7] = [
        Self::Corrupted,
        Self::Invalid,
        Self::Blacklisted,
        Self::DateExpired,
        Self::RunningTimeOver,
        Self::BadHwid,
        Self::MaxBuildExpired,
    ];

    /// The flag's bit in the C ABI representation.
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Corrupted => 0x01,
            Self::Invalid => 0x02,
            Self::Blacklisted => 0x04,
            Self::DateExpired => 0x08,
            Self::RunningTimeOver => 0x10,
            Self::BadHwid => 0x20,
            Self::MaxBuildExpired => 0x40,
        }
    }

    /// Short lowercase name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Corrupted => "corrupted",
            Self::Invalid => "invalid",
            Self::Blacklisted => "blacklisted",
            Self::DateExpired => "date_expired",
            Self::RunningTimeOver => "running_time_over",
            Self::BadHwid => "bad_hwid",
            Self::MaxBuildExpired => "max_build_expired",
        }
    }
}

impl fmt::Display for SerialFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verdict for a serial number: a set of [`SerialFlag`]s.
///
/// The empty set is success. Flags are additive and order-independent.
/// Serializes as a list of flag names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<SerialFlag>", from = "Vec<SerialFlag>")]
pub struct SerialState {
    bits: u32,
}

impl SerialState {
    /// The verdict with no flags set.
    pub const SUCCESS: Self = Self { bits: 0 };

    /// A verdict holding exactly `flag`.
    #[must_use]
    pub const fn only(flag: SerialFlag) -> Self {
        Self { bits: flag.bit() }
    }

    /// Builds a verdict from C ABI bits, dropping unknown bits.
    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        SerialFlag::ALL
            .into_iter()
            .filter(|f| bits & f.bit() != 0)
            .collect()
    }

    /// The C ABI representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Adds `flag` to the set.
    pub fn insert(&mut self, flag: SerialFlag) {
        self.bits |= flag.bit();
    }

    /// Returns true if `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: SerialFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Returns true if no flag is set.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.bits == 0
    }

    /// Returns true if the serial was rejected outright (`Invalid` or
    /// `Blacklisted`), as opposed to accepted with restrictions.
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        self.contains(SerialFlag::Invalid) || self.contains(SerialFlag::Blacklisted)
    }

    /// Number of flags set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterates over the set flags in wire-bit order.
    pub fn iter(self) -> impl Iterator<Item = SerialFlag> {
        SerialFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<SerialFlag> for SerialState {
    fn from(flag: SerialFlag) -> Self {
        Self::only(flag)
    }
}

impl FromIterator<SerialFlag> for SerialState {
    fn from_iter<I: IntoIterator<Item = SerialFlag>>(iter: I) -> Self {
        let mut state = Self::SUCCESS;
        for flag in iter {
            state.insert(flag);
        }
        state
    }
}

impl From<Vec<SerialFlag>> for SerialState {
    fn from(flags: Vec<SerialFlag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<SerialState> for Vec<SerialFlag> {
    fn from(state: SerialState) -> Self {
        state.iter().collect()
    }
}

impl BitOr<SerialFlag> for SerialState {
    type Output = Self;

    fn bitor(mut self, flag: SerialFlag) -> Self {
        self.insert(flag);
        self
    }
}

impl BitOr for SerialFlag {
    type Output = SerialState;

    fn bitor(self, other: Self) -> SerialState {
        SerialState::only(self) | other
    }
}

impl BitOrAssign<SerialFlag> for SerialState {
    fn bitor_assign(&mut self, flag: SerialFlag) {
        self.insert(flag);
    }
}

impl fmt::Display for SerialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return f.write_str("success");
        }
        for (i, flag) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{flag}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_distinct() {
        let all: u32 = SerialFlag::ALL.iter().map(|f| f.bit()).sum();
        assert_eq!(all, 0x7f);
    }

    #[test]
    fn display() {
        assert_eq!(SerialState::SUCCESS.to_string(), "success");
        let state = SerialFlag::DateExpired | SerialFlag::BadHwid;
        assert_eq!(state.to_string(), "date_expired|bad_hwid");
    }
}
