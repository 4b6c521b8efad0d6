//! Shared test helpers for licensing tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use licensekit_config::ConfigStore;
use licensekit_license::{LicenseEvaluator, LicenseFacts, Licensing, ManualClock};
use std::sync::Arc;
use std::time::Duration;

/// The calendar date every test runs on.
pub fn today() -> NaiveDate {
    date(2026, 6, 15)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds a store whose license section holds `body`.
pub fn store(body: &str) -> ConfigStore {
    ConfigStore::parse(&format!("[TestLicense]\n{body}\n"))
}

/// An evaluator over `body` with a manual clock fixed at [`today`].
pub fn evaluator(body: &str) -> (LicenseEvaluator, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(today()));
    let facts = LicenseFacts::from_store(&store(body));
    (LicenseEvaluator::with_clock(facts, clock.clone()), clock)
}

/// Licensing over `body` with a manual clock fixed at [`today`].
pub fn licensing(body: &str) -> (Licensing, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(today()));
    (Licensing::with_clock(&store(body), clock.clone()), clock)
}

pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}
