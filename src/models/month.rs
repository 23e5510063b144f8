//! Month keys
//!
//! A [`MonthKey`] names one budget month. Every snapshot, pay period and
//! balance chain is indexed by it. Keys are validated at construction so a
//! key in hand always denotes a real calendar month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{HushallError, HushallResult};

/// Day of month on which salaries arrive and a new pay period starts
pub const PAY_DAY: u32 = 25;

/// Supported year range for month keys
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A `(year, month)` pair, totally ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> HushallResult<Self> {
        if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(HushallError::InvalidMonthKey { year, month });
        }
        Ok(Self { year, month })
    }

    /// The calendar month containing `date`
    ///
    /// Years outside 1..=9999 are clamped into that range.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(MIN_YEAR, MAX_YEAR),
            month: date.month(),
        }
    }

    /// The month whose 25th-to-24th pay period contains `date`
    ///
    /// From the 25th onwards a date belongs to the following month's period.
    pub fn pay_period_for(date: NaiveDate) -> Self {
        let key = Self::for_date(date);
        if date.day() >= PAY_DAY {
            key.next()
        } else {
            key
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The previous month, rolling back over January
    ///
    /// Saturates at January of the earliest supported year, so the result
    /// always parses back. Use [`MonthKey::checked_previous`] to detect that.
    pub fn previous(&self) -> Self {
        self.checked_previous().unwrap_or(*self)
    }

    /// The next month, rolling over December
    ///
    /// Saturates at December of the latest supported year.
    pub fn next(&self) -> Self {
        self.checked_next().unwrap_or(*self)
    }

    /// The previous month, or `None` before the supported range
    pub fn checked_previous(&self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }

    /// The next month, or `None` past the supported range
    pub fn checked_next(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    /// A date within this month; `day` is clamped to 1..=28 so it always exists
    pub fn day(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, 28);
        // Year and month were validated at construction, so this is always Some.
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the calendar month
    pub fn first_day(&self) -> NaiveDate {
        self.day(1)
    }

    /// Number of months from `self` to `other` (negative if `other` is earlier)
    pub fn months_until(&self, other: &MonthKey) -> i64 {
        let from = self.year as i64 * 12 + self.month as i64;
        let to = other.year as i64 * 12 + other.month as i64;
        to - from
    }

    /// `count` consecutive keys starting at `self`
    ///
    /// Shorter than `count` when the supported range ends first.
    pub fn range(&self, count: usize) -> Vec<MonthKey> {
        let mut keys = Vec::with_capacity(count);
        let mut current = Some(*self);
        while let Some(key) = current {
            if keys.len() == count {
                break;
            }
            keys.push(key);
            current = key.checked_next();
        }
        keys
    }

    /// Parse "YYYY-MM"
    pub fn parse(s: &str) -> HushallResult<Self> {
        let s = s.trim();
        let invalid = || HushallError::Validation(format!("Invalid month format: {}", s));

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = HushallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serialized as "YYYY-MM" so keys can be used directly as JSON object keys.
impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn test_rejects_invalid_month() {
        assert!(matches!(
            MonthKey::new(2025, 0),
            Err(HushallError::InvalidMonthKey { month: 0, .. })
        ));
        assert!(matches!(
            MonthKey::new(2025, 13),
            Err(HushallError::InvalidMonthKey { month: 13, .. })
        ));
        assert!(MonthKey::new(2025, 12).is_ok());
    }

    #[test]
    fn test_navigation_rolls_over_years() {
        assert_eq!(key(2025, 1).previous(), key(2024, 12));
        assert_eq!(key(2024, 12).next(), key(2025, 1));
        assert_eq!(key(2025, 6).next().previous(), key(2025, 6));
    }

    #[test]
    fn test_navigation_stays_in_supported_years() {
        let first = key(1, 1);
        assert_eq!(first.checked_previous(), None);
        assert_eq!(first.previous(), first);
        assert_eq!(MonthKey::parse(&first.previous().to_string()).unwrap(), first);

        let last = key(9999, 12);
        assert_eq!(last.next(), last);
        assert_eq!(MonthKey::parse(&last.next().to_string()).unwrap(), last);
        assert_eq!(key(9999, 11).range(5), vec![key(9999, 11), last]);
    }

    #[test]
    fn test_ordering() {
        assert!(key(2024, 12) < key(2025, 1));
        assert!(key(2025, 2) > key(2025, 1));
        assert_eq!(key(2024, 11).months_until(&key(2025, 2)), 3);
        assert_eq!(key(2025, 2).months_until(&key(2024, 11)), -3);
    }

    #[test]
    fn test_pay_period_for() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        assert_eq!(MonthKey::pay_period_for(d(12, 24)), key(2025, 12));
        assert_eq!(MonthKey::pay_period_for(d(12, 25)), key(2026, 1));
        assert_eq!(MonthKey::pay_period_for(d(11, 25)), key(2025, 12));
    }

    #[test]
    fn test_range() {
        let months = key(2025, 11).range(3);
        assert_eq!(months, vec![key(2025, 11), key(2025, 12), key(2026, 1)]);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(MonthKey::parse("2025-03").unwrap(), key(2025, 3));
        assert_eq!("2025-12".parse::<MonthKey>().unwrap(), key(2025, 12));
        assert!(MonthKey::parse("2025-13").is_err());
        assert!(MonthKey::parse("march").is_err());
        assert_eq!(key(2025, 3).to_string(), "2025-03");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&key(2025, 3)).unwrap();
        assert_eq!(json, "\"2025-03\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key(2025, 3));
        assert!(serde_json::from_str::<MonthKey>("\"2025-00\"").is_err());
    }
}
