//! Daily seed derivation.

use super::clock::{Clock, SystemClock};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Seed derived solely from a UTC calendar date.
///
/// The value is `year * 10000 + month * 100 + day`, so 2026-10-17
/// becomes `20261017`. Distinct dates always give distinct seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeed(u64);

impl DailySeed {
    /// Derives the seed for a date.
    ///
    /// Years before 0 are not meaningful for this scheme and are
    /// folded to their absolute value.
    pub fn from_date(date: NaiveDate) -> Self {
        let year = u64::from(date.year().unsigned_abs());
        Self(year * 10_000 + u64::from(date.month()) * 100 + u64::from(date.day()))
    }

    /// Wraps a raw seed value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw seed value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DailySeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Produces the seed for the current UTC day.
pub struct DailySeedProvider<C = SystemClock> {
    clock: C,
}

impl DailySeedProvider<SystemClock> {
    /// Creates a provider backed by the system clock.
    pub fn system() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> DailySeedProvider<C> {
    /// Creates a provider backed by the given clock.
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Returns the seed for today, read from the clock at call time.
    pub fn current(&self) -> DailySeed {
        let date = self.clock.today_utc();
        let seed = DailySeed::from_date(date);
        tracing::trace!(%date, %seed, "Derived daily seed");
        seed
    }

    /// Returns the underlying clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl Default for DailySeedProvider<SystemClock> {
    fn default() -> Self {
        Self::system()
    }
}
