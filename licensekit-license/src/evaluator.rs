//! The serial number state machine.

use crate::clock::{Clock, SystemClock};
use crate::data::SerialNumberData;
use crate::facts::LicenseFacts;
use crate::serial::normalize;
use crate::state::{SerialFlag, SerialState};
use licensekit_config::ConfigStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// What the evaluator remembers about the last serial it was given.
///
/// Written only by [`LicenseEvaluator::set_serial_number`]; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The canonical serial equals the accepted serial.
    pub serial_accepted: bool,
    /// The canonical serial equals the blacklisted serial.
    pub serial_blacklisted: bool,
}

/// Evaluates serial numbers against a snapshot of license facts.
///
/// Session state sits behind a single mutex that is held for the whole of
/// [`set_serial_number`](Self::set_serial_number), so concurrent readers
/// never see a half-updated session.
pub struct LicenseEvaluator {
    facts: LicenseFacts,
    clock: Arc<dyn Clock>,
    session: Mutex<SessionState>,
}

impl std::fmt::Debug for LicenseEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseEvaluator")
            .field("facts", &self.facts)
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}

impl LicenseEvaluator {
    /// Creates an evaluator whose running time starts now.
    #[must_use]
    pub fn new(facts: LicenseFacts) -> Self {
        Self::with_clock(facts, Arc::new(SystemClock::start()))
    }

    /// Creates an evaluator over the facts in `store`.
    #[must_use]
    pub fn from_store(store: &ConfigStore) -> Self {
        Self::new(LicenseFacts::from_store(store))
    }

    /// Creates an evaluator with an explicit time source.
    #[must_use]
    pub fn with_clock(facts: LicenseFacts, clock: Arc<dyn Clock>) -> Self {
        Self {
            facts,
            clock,
            session: Mutex::new(SessionState::default()),
        }
    }

    /// The facts this evaluator checks against.
    #[must_use]
    pub fn facts(&self) -> &LicenseFacts {
        &self.facts
    }

    /// A copy of the current session state.
    #[must_use]
    pub fn session(&self) -> SessionState {
        *self.lock_session()
    }

    /// Replaces the current serial number and evaluates it.
    ///
    /// An empty serial resets the session and is `Invalid`.
    pub fn set_serial_number(&self, serial: &str) -> SerialState {
        let mut session = self.lock_session();
        *session = SessionState::default();

        if serial.is_empty() {
            debug!("empty serial number");
            return SerialState::only(SerialFlag::Invalid);
        }

        let canonical = normalize(serial);
        session.serial_accepted = canonical == self.facts.accepted_serial();
        session.serial_blacklisted =
            self.facts.blacklisted_serial.as_deref() == Some(canonical.as_str());

        let state = self.evaluate(&session);
        info!(
            accepted = session.serial_accepted,
            blacklisted = session.serial_blacklisted,
            %state,
            "serial number set"
        );
        state
    }

    /// Re-evaluates the current session against the facts and clock.
    ///
    /// Safe to call periodically; running time and dates are read fresh.
    #[must_use]
    pub fn serial_number_state(&self) -> SerialState {
        let session = self.lock_session();
        self.evaluate(&session)
    }

    /// Evaluates the session and projects the licensed data.
    ///
    /// A rejected serial yields only its verdict, so no licensee data leaks
    /// even when stale facts are present.
    #[must_use]
    pub fn serial_number_data(&self) -> SerialNumberData {
        let state = self.serial_number_state();
        if state.is_rejected() {
            return SerialNumberData::rejected(state);
        }
        SerialNumberData::project(state, &self.facts)
    }

    fn evaluate(&self, session: &SessionState) -> SerialState {
        if !session.serial_accepted {
            return SerialState::only(SerialFlag::Invalid);
        }
        if session.serial_blacklisted {
            return SerialState::only(SerialFlag::Blacklisted);
        }

        let mut state = SerialState::SUCCESS;

        if let Some(limit) = self.facts.running_time_limit {
            let minutes = self.clock.elapsed().as_secs() / 60;
            if minutes >= u64::from(limit) {
                state |= SerialFlag::RunningTimeOver;
            }
        }

        let today = self.clock.today();
        if self.facts.expiration_date.is_some_and(|d| today > d) {
            state |= SerialFlag::DateExpired;
        }
        if self.facts.max_build_date.is_some_and(|d| today > d) {
            state |= SerialFlag::MaxBuildExpired;
        }

        if self.facts.hwid_mismatch() {
            state |= SerialFlag::BadHwid;
        }

        debug!(%state, "evaluated serial number");
        state
    }

    fn lock_session(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
