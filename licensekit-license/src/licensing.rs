//! One-stop licensing API over a license store.

use crate::activation::{self, ActivationSettings, LocalActivation};
use crate::clock::Clock;
use crate::data::SerialNumberData;
use crate::error::ActivationResult;
use crate::evaluator::LicenseEvaluator;
use crate::facts::LicenseFacts;
use crate::hwid::resolve_hwid;
use crate::state::SerialState;
use licensekit_config::ConfigStore;
use std::sync::{Arc, OnceLock};

/// Serial evaluation and activation for one license store.
///
/// Activation here is the local contract: codes are checked against the
/// store. Remote activation lives in `OnlineActivation` behind the
/// `online` feature, built from [`Licensing::activation_settings`].
#[derive(Debug)]
pub struct Licensing {
    evaluator: LicenseEvaluator,
    settings: ActivationSettings,
    fingerprint: OnceLock<String>,
}

impl Licensing {
    /// Builds licensing over `store`, counting running time from now.
    #[must_use]
    pub fn new(store: &ConfigStore) -> Self {
        Self::from_parts(
            LicenseEvaluator::from_store(store),
            ActivationSettings::from_store(store),
        )
    }

    /// Builds licensing over `store` with an explicit time source.
    #[must_use]
    pub fn with_clock(store: &ConfigStore, clock: Arc<dyn Clock>) -> Self {
        Self::from_parts(
            LicenseEvaluator::with_clock(LicenseFacts::from_store(store), clock),
            ActivationSettings::from_store(store),
        )
    }

    /// Assembles licensing from an evaluator and activation settings.
    #[must_use]
    pub fn from_parts(evaluator: LicenseEvaluator, settings: ActivationSettings) -> Self {
        Self {
            evaluator,
            settings,
            fingerprint: OnceLock::new(),
        }
    }

    /// The underlying evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &LicenseEvaluator {
        &self.evaluator
    }

    /// Settings for remote and offline activation.
    #[must_use]
    pub fn activation_settings(&self) -> &ActivationSettings {
        &self.settings
    }

    /// See [`LicenseEvaluator::set_serial_number`].
    pub fn set_serial_number(&self, serial: &str) -> SerialState {
        self.evaluator.set_serial_number(serial)
    }

    /// See [`LicenseEvaluator::serial_number_state`].
    #[must_use]
    pub fn serial_number_state(&self) -> SerialState {
        self.evaluator.serial_number_state()
    }

    /// See [`LicenseEvaluator::serial_number_data`].
    #[must_use]
    pub fn serial_number_data(&self) -> SerialNumberData {
        self.evaluator.serial_number_data()
    }

    /// Hardware id of this machine: `MyHWID` from the store, otherwise a
    /// fingerprint of the hardware.
    #[must_use]
    pub fn current_hwid(&self) -> String {
        resolve_hwid(self.evaluator.facts().my_hwid.as_deref(), &self.fingerprint)
    }

    /// Trades an activation code for a serial number.
    ///
    /// The returned serial is meant to be passed to
    /// [`set_serial_number`](Self::set_serial_number).
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::BadCode`](crate::ActivationError::BadCode)
    /// if the code is not the accepted one.
    pub fn activate_license(&self, code: &str) -> ActivationResult<String> {
        LocalActivation::new(self.evaluator.facts()).activate(code)
    }

    /// Releases a serial number.
    ///
    /// # Errors
    ///
    /// Never fails locally.
    pub fn deactivate_license(&self, serial: &str) -> ActivationResult<()> {
        LocalActivation::new(self.evaluator.facts()).deactivate(serial)
    }

    /// Activation request for manual submission, bound to this machine.
    ///
    /// # Errors
    ///
    /// Returns `BadCode` if the code is malformed.
    pub fn offline_activation_string(&self, code: &str) -> ActivationResult<String> {
        activation::offline_activation_string(code, &self.current_hwid(), &self.settings)
    }

    /// Deactivation request for manual submission.
    ///
    /// # Errors
    ///
    /// Returns `BadCode` if the serial is empty.
    pub fn offline_deactivation_string(&self, serial: &str) -> ActivationResult<String> {
        activation::offline_deactivation_string(serial)
    }

    /// A remote activation client for this machine.
    ///
    /// # Errors
    ///
    /// Returns `NotAvailable` if no activation server is configured.
    #[cfg(feature = "online")]
    pub fn online(&self) -> ActivationResult<crate::online::OnlineActivation> {
        crate::online::OnlineActivation::new(self.settings.clone(), self.current_hwid())
    }
}
