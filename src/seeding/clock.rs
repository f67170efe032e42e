//! Date sources for the daily seed.
//!
//! The wall clock is the only non-deterministic input of the whole
//! pipeline, so it sits behind a trait that tests can pin.

use chrono::{NaiveDate, Utc};

/// Supplies the current UTC calendar date.
pub trait Clock: Send + Sync {
    /// Returns today's date in UTC.
    fn today_utc(&self) -> NaiveDate;
}

/// Reads the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today_utc(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    /// Creates a clock pinned to `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Builds a clock from year, month and day, if the date exists.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn today_utc(&self) -> NaiveDate {
        self.date
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn today_utc(&self) -> NaiveDate {
        (**self).today_utc()
    }
}
