//! Reporting periods and their resolution into concrete date ranges.
//!
//! A [`Period`] is a calendar-relative window ("this week", "last month").
//! [`Period::resolve`] turns it into a [`DateRange`] given the current instant
//! and the store's reporting timezone. Resolution is pure: the same `now` and
//! timezone always produce the same range.
//!
//! All ranges are half-open: the start is inclusive, the end exclusive.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::range::DateRange;

/// First day of the reporting week.
pub const WEEK_START: Weekday = Weekday::Mon;

/// Errors that can occur when parsing or resolving a [`Period`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// The input is not one of the known period tags.
    #[error("invalid period: '{0}'")]
    InvalidPeriod(String),
    /// Local midnight is skipped on this date (DST gap) in the reporting timezone.
    #[error("local midnight does not exist on {0} in the reporting timezone")]
    NonexistentLocalTime(NaiveDate),
    /// Calendar arithmetic left the representable date range.
    #[error("date arithmetic out of range")]
    OutOfRange,
}

/// A named, calendar-relative reporting window.
///
/// Serialized as its kebab-case tag (`"this-week"`, `"all-time"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    #[default]
    AllTime,
}

impl Period {
    /// Every period, in display order.
    pub const ALL: [Self; 9] = [
        Self::Today,
        Self::Yesterday,
        Self::ThisWeek,
        Self::LastWeek,
        Self::ThisMonth,
        Self::LastMonth,
        Self::ThisYear,
        Self::LastYear,
        Self::AllTime,
    ];

    /// Returns the period's tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "this-week",
            Self::LastWeek => "last-week",
            Self::ThisMonth => "this-month",
            Self::LastMonth => "last-month",
            Self::ThisYear => "this-year",
            Self::LastYear => "last-year",
            Self::AllTime => "all-time",
        }
    }

    /// Human-readable label used by the display page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This Week",
            Self::LastWeek => "Last Week",
            Self::ThisMonth => "This Month",
            Self::LastMonth => "Last Month",
            Self::ThisYear => "This Year",
            Self::LastYear => "Last Year",
            Self::AllTime => "All Time",
        }
    }

    /// Parse a period from its tag.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidPeriod`] for anything that is not an exact
    /// tag match. There is no fallback period.
    pub fn parse(s: &str) -> Result<Self, PeriodError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PeriodError::InvalidPeriod(s.to_owned()))
    }

    /// Resolve this period into a concrete range in `tz`.
    ///
    /// Boundaries are computed on calendar dates in the reporting timezone and
    /// then mapped to instants at local midnight, so a "day" follows the local
    /// calendar even across offset changes.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::NonexistentLocalTime`] if a boundary falls on a
    /// local midnight the timezone skips, or [`PeriodError::OutOfRange`] if the
    /// calendar arithmetic overflows.
    pub fn resolve<Tz: TimeZone>(self, now: DateTime<Utc>, tz: &Tz) -> Result<DateRange, PeriodError> {
        let today = now.with_timezone(tz).date_naive();

        let (start, end) = match self {
            Self::AllTime => return Ok(DateRange::Unbounded),
            Self::Today => (today, add_days(today, 1)?),
            Self::Yesterday => (sub_days(today, 1)?, today),
            Self::ThisWeek => {
                let start = week_start(today)?;
                (start, add_days(start, 7)?)
            }
            Self::LastWeek => {
                let end = week_start(today)?;
                (sub_days(end, 7)?, end)
            }
            Self::ThisMonth => {
                let start = month_start(today)?;
                (start, add_months(start, 1)?)
            }
            Self::LastMonth => {
                let end = month_start(today)?;
                (sub_months(end, 1)?, end)
            }
            Self::ThisYear => {
                let start = year_start(today.year())?;
                (start, year_start(today.year() + 1)?)
            }
            Self::LastYear => (year_start(today.year() - 1)?, year_start(today.year())?),
        };

        Ok(DateRange::bounded(
            local_midnight(tz, start)?.fixed_offset(),
            local_midnight(tz, end)?.fixed_offset(),
        ))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Calendar helpers
// =============================================================================

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>, PeriodError> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .ok_or(PeriodError::NonexistentLocalTime(date))
}

fn week_start(date: NaiveDate) -> Result<NaiveDate, PeriodError> {
    let offset = (7 + date.weekday().num_days_from_monday() - WEEK_START.num_days_from_monday()) % 7;
    sub_days(date, u64::from(offset))
}

fn month_start(date: NaiveDate) -> Result<NaiveDate, PeriodError> {
    date.with_day(1).ok_or(PeriodError::OutOfRange)
}

fn year_start(year: i32) -> Result<NaiveDate, PeriodError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(PeriodError::OutOfRange)
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, PeriodError> {
    date.checked_add_days(Days::new(days))
        .ok_or(PeriodError::OutOfRange)
}

fn sub_days(date: NaiveDate, days: u64) -> Result<NaiveDate, PeriodError> {
    date.checked_sub_days(Days::new(days))
        .ok_or(PeriodError::OutOfRange)
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, PeriodError> {
    date.checked_add_months(Months::new(months))
        .ok_or(PeriodError::OutOfRange)
}

fn sub_months(date: NaiveDate, months: u32) -> Result<NaiveDate, PeriodError> {
    date.checked_sub_months(Months::new(months))
        .ok_or(PeriodError::OutOfRange)
}
