//! Time sources for license evaluation.

use chrono::{Local, NaiveDate};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Supplies the two notions of time evaluation depends on.
pub trait Clock: Send + Sync {
    /// Monotonic time elapsed since the session started.
    fn elapsed(&self) -> Duration;

    /// Today's calendar date in local time.
    fn today(&self) -> NaiveDate;
}

/// Wall and monotonic clocks of the running process.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Starts counting running time now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Counts running time from `started`.
    #[must_use]
    pub const fn since(started: Instant) -> Self {
        Self { started }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<(Duration, NaiveDate)>,
}

impl ManualClock {
    /// A clock at zero elapsed time on `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            inner: Mutex::new((Duration::ZERO, today)),
        }
    }

    /// Moves elapsed time forward.
    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.0 += by;
    }

    /// Changes the calendar date.
    pub fn set_today(&self, today: NaiveDate) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.1 = today;
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).0
    }

    fn today(&self) -> NaiveDate {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).1
    }
}
