//! Calendar months used as the projection time axis
//!
//! Every date entering the engine is normalized to the first day of its month,
//! so comparisons between contribution, pension and transition dates are
//! month-granular regardless of the day the caller supplied.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// A calendar month, stored as the first day of that month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

impl Month {
    /// Create from year and 1-based month number
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Month)
    }

    /// Normalize any date to its month
    pub fn from_date(date: NaiveDate) -> Self {
        Month(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month number (1-12)
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// The following month, or None at the end of the representable calendar
    pub fn next(self) -> Option<Self> {
        self.add_months(1)
    }

    pub fn add_months(self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Month)
    }

    pub fn sub_months(self, months: u32) -> Option<Self> {
        self.0.checked_sub_months(Months::new(months)).map(Month)
    }

    /// Shift by a signed number of months
    pub fn offset(self, months: i32) -> Option<Self> {
        if months >= 0 {
            self.add_months(months.unsigned_abs())
        } else {
            self.sub_months(months.unsigned_abs())
        }
    }

    /// Whole months from `self` to `other` (negative when `other` is earlier)
    pub fn months_until(&self, other: Month) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }

    /// Short label used in tables and CSV output, e.g. `2028-06`
    pub fn label(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }

    /// Long label used in narrative output, e.g. `June 2028`
    pub fn long_label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }

    /// Iterate every month from `start` through `end` inclusive
    pub fn range_inclusive(start: Month, end: Month) -> MonthRange {
        MonthRange {
            next: (start <= end).then_some(start),
            end,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for Month {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"));

        parsed
            .map(Month::from_date)
            .map_err(|_| ProjectionError::InvalidMonth(s.to_string()))
    }
}

impl TryFrom<String> for Month {
    type Error = ProjectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.label()
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Month::from_date(date)
    }
}

/// Inclusive iterator over consecutive months
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<Month>,
    end: Month,
}

impl Iterator for MonthRange {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        let current = self.next?;
        self.next = current.next().filter(|m| *m <= self.end);
        Some(current)
    }
}
