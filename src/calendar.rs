//! Calendar arithmetic for the year wallpaper.
//!
//! Everything here uses the proleptic Gregorian calendar. The year being
//! drawn is classified once, relative to "today", into a [`YearKind`] that
//! already carries the number of elapsed days, so the layout code never has
//! to look at the clock.

use chrono::{Datelike, NaiveDate};

use crate::{Error, Result};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Divisible by 4, except centuries unless divisible by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-based). Out-of-range months have no days.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Where the drawn year sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearKind {
    /// Fully elapsed
    Past { days_elapsed: u32 },
    /// Elapsed through today's ordinal day (today counts as elapsed)
    Current { days_elapsed: u32 },
    /// Nothing elapsed yet
    Future { days_elapsed: u32 },
}

impl YearKind {
    pub fn classify(year: i32, today: NaiveDate) -> Self {
        let this_year = today.year();
        if year < this_year {
            YearKind::Past {
                days_elapsed: days_in_year(year),
            }
        } else if year > this_year {
            YearKind::Future { days_elapsed: 0 }
        } else {
            YearKind::Current {
                days_elapsed: today.ordinal(),
            }
        }
    }

    pub fn days_elapsed(&self) -> u32 {
        match *self {
            YearKind::Past { days_elapsed }
            | YearKind::Current { days_elapsed }
            | YearKind::Future { days_elapsed } => days_elapsed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarProgress {
    pub year: i32,
    pub kind: YearKind,
}

impl CalendarProgress {
    /// Resolve an optional requested year against `today`. `None` means the
    /// current year.
    pub fn resolve(year: Option<i32>, today: NaiveDate) -> Result<Self> {
        let year = year.unwrap_or_else(|| today.year());
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(Error::InvalidYear(year));
        }
        Ok(Self {
            year,
            kind: YearKind::classify(year, today),
        })
    }

    pub fn days_elapsed(&self) -> u32 {
        self.kind.days_elapsed()
    }
}
