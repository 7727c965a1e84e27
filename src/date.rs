//! Date handling module
//!
//! Provides the clock abstraction the version manager reads "today" from, and
//! the `YYYY.MM.DD` date format used as the leading part of every version.

use std::cell::Cell;

use chrono::{Duration, Local, NaiveDate};
use crate::error::{Error, Result};

/// strftime pattern for the date component of a version
const DATE_VERSION_FORMAT: &str = "%Y.%m.%d";

/// Source of the current calendar date
pub trait Clock {
    /// Today's date
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Clock backed by the local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a date that can be moved by hand
///
/// Used by tests to simulate builds across several days.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Cell<NaiveDate>,
}

impl FixedClock {
    /// Create a clock reporting `date`
    pub fn new(date: NaiveDate) -> Self {
        Self { date: Cell::new(date) }
    }

    /// Create a clock from year/month/day, failing on impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::new)
            .ok_or_else(|| Error::InvalidDateVersion(format!("{}-{}-{}", year, month, day)))
    }

    /// Move the clock to a specific date
    pub fn set(&self, date: NaiveDate) {
        self.date.set(date);
    }

    /// Move the clock forward by whole days
    pub fn advance_days(&self, days: i64) {
        self.date.set(self.date.get() + Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date.get()
    }
}

/// Format a date as a version date: "2024.03.15"
pub fn format_date_version(date: &NaiveDate) -> String {
    date.format(DATE_VERSION_FORMAT).to_string()
}

/// Parse a version date ("2024.03.15") back into a calendar date
///
/// Month and day must be zero-padded so that formatting the result gives back
/// the exact input.
pub fn parse_date_version(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, DATE_VERSION_FORMAT)
        .map_err(|_| Error::InvalidDateVersion(s.to_string()))?;

    if format_date_version(&date) != s {
        return Err(Error::InvalidDateVersion(s.to_string()));
    }

    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date_version(&date), "2024.03.05");

        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_date_version(&date), "2025.12.31");
    }

    #[test]
    fn test_parse_date_version() {
        let date = parse_date_version("2024.01.02").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_dates() {
        assert!(parse_date_version("2024.13.01").is_err()); // Invalid month
        assert!(parse_date_version("2024-01-01").is_err());
        assert!(parse_date_version("2024.1.2").is_err()); // Not zero-padded
        assert!(parse_date_version("").is_err());
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::from_ymd(2024, 1, 31).unwrap();
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        clock.set(NaiveDate::from_ymd_opt(2030, 6, 1).unwrap());
        assert_eq!(format_date_version(&clock.today()), "2030.06.01");
    }

    #[test]
    fn test_fixed_clock_rejects_impossible_date() {
        assert!(FixedClock::from_ymd(2023, 2, 29).is_err());
    }

    #[test]
    fn test_system_clock_matches_local() {
        let today = Local::now().date_naive();
        let reported = SystemClock.today();
        // Tolerate a midnight rollover between the two reads
        assert!(reported == today || reported == today + Duration::days(1));
    }
}
