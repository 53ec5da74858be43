//! Calendar helpers: generation windows and month arithmetic.

use crate::error::{SimError, SimResult};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SimResult<Self> {
        if end < start {
            return Err(SimError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window whose last day is `end`.
    pub fn ending(end: NaiveDate, days: u32) -> SimResult<Self> {
        if days == 0 {
            return Err(SimError::InvalidHorizon(days));
        }
        let span = u64::from(days - 1);
        let start = end
            .checked_sub_days(Days::new(span))
            .ok_or_else(|| anyhow::anyhow!("window of {days} days before {end} underflows"))?;
        Self::new(start, end)
    }

    /// The `days`-long window whose first day is `start`.
    pub fn starting(start: NaiveDate, days: u32) -> SimResult<Self> {
        if days == 0 {
            return Err(SimError::InvalidHorizon(days));
        }
        let end = start
            .checked_add_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| anyhow::anyhow!("window of {days} days after {start} overflows"))?;
        Self::new(start, end)
    }

    pub fn len_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every day in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// Zero-based index of the month after `date`'s month (Dec wraps to Jan).
pub fn next_month_index(date: NaiveDate) -> usize {
    (date.month0() as usize + 1) % 12
}

/// Whole calendar months from `start` to `date` (day of month ignored).
pub fn months_between(start: NaiveDate, date: NaiveDate) -> i32 {
    (date.year() - start.year()) * 12 + date.month() as i32 - start.month() as i32
}

/// Index into a Sunday-first weekday table.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

pub fn is_tuesday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Tue
}

pub fn is_quarter_start_month(date: NaiveDate) -> bool {
    matches!(date.month(), 1 | 4 | 7 | 10)
}

/// `yyyy-mm` key used for monthly rollups.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}
