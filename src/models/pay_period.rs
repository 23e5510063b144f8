//! Pay period windows and day classification
//!
//! A pay period runs from the 25th of the previous month through the 24th
//! of the budget month. Windows are inclusive on both ends.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::{MonthKey, PAY_DAY};
use crate::error::{HushallError, HushallResult};

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriodWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl PayPeriodWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> HushallResult<Self> {
        if start > end {
            return Err(HushallError::Validation(format!(
                "Window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The canonical window for a month: 25th of the previous month to the 24th
    pub fn canonical(month: MonthKey) -> Self {
        let end = month.day(PAY_DAY - 1);
        let start = month
            .day(PAY_DAY)
            .checked_sub_months(Months::new(1))
            .unwrap_or(end);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check if a date falls within this window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the window
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterate every date in the window, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.len_days()).map(move |offset| start + Duration::days(offset))
    }

    /// Restrict this window to dates on or after `from`
    pub fn starting_from(&self, from: NaiveDate) -> Option<Self> {
        if from > self.end {
            None
        } else {
            Some(Self {
                start: from.max(self.start),
                end: self.end,
            })
        }
    }

    /// Restrict this window to dates strictly before `until`
    pub fn ending_before(&self, until: NaiveDate) -> Option<Self> {
        if until <= self.start {
            None
        } else {
            Some(Self {
                start: self.start,
                end: (until - Duration::days(1)).min(self.end),
            })
        }
    }
}

impl fmt::Display for PayPeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Classification of a single date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClass {
    pub is_weekday: bool,
    pub is_friday: bool,
    pub is_holiday: bool,
}

impl DayClass {
    pub fn new(date: NaiveDate, is_holiday: bool) -> Self {
        let weekday = date.weekday();
        Self {
            is_weekday: !matches!(weekday, Weekday::Sat | Weekday::Sun),
            is_friday: weekday == Weekday::Fri,
            is_holiday,
        }
    }

    /// A day earns the daily transfer only on non-holiday weekdays
    pub fn counts_toward_budget(&self) -> bool {
        self.is_weekday && !self.is_holiday
    }

    /// A weekday that is withheld because it is a holiday
    pub fn is_withheld(&self) -> bool {
        self.is_weekday && self.is_holiday
    }
}

/// Day counts over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayCounts {
    /// Non-holiday weekdays (Fridays included)
    pub weekday_count: u32,
    /// Non-holiday Fridays
    pub friday_count: u32,
    /// Weekdays that fell on a holiday
    pub holiday_weekday_count: u32,
    /// Fridays that fell on a holiday
    pub holiday_friday_count: u32,
}

impl DayCounts {
    /// Fold one classified day into the counts
    pub fn record(&mut self, class: DayClass) {
        if class.counts_toward_budget() {
            self.weekday_count += 1;
            if class.is_friday {
                self.friday_count += 1;
            }
        } else if class.is_withheld() {
            self.holiday_weekday_count += 1;
            if class.is_friday {
                self.holiday_friday_count += 1;
            }
        }
    }
}

/// Daily and Friday transfer rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferRates {
    /// Paid for every counted weekday
    pub daily_rate: Money,
    /// Paid on top of the daily rate for every counted Friday
    pub friday_rate: Money,
}

impl TransferRates {
    pub fn new(daily_rate: Money, friday_rate: Money) -> Self {
        Self {
            daily_rate,
            friday_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_canonical_window() {
        let window = PayPeriodWindow::canonical(MonthKey::new(2025, 12).unwrap());
        assert_eq!(window.start(), date(2025, 11, 25));
        assert_eq!(window.end(), date(2025, 12, 24));
        assert_eq!(window.len_days(), 30);
    }

    #[test]
    fn test_canonical_window_january() {
        let window = PayPeriodWindow::canonical(MonthKey::new(2026, 1).unwrap());
        assert_eq!(window.start(), date(2025, 12, 25));
        assert_eq!(window.end(), date(2026, 1, 24));
    }

    #[test]
    fn test_canonical_window_first_supported_month() {
        let window = PayPeriodWindow::canonical(MonthKey::new(1, 1).unwrap());
        assert_eq!(window.start(), date(0, 12, 25));
        assert_eq!(window.end(), date(1, 1, 24));
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(PayPeriodWindow::new(date(2025, 2, 1), date(2025, 1, 1)).is_err());
        assert!(PayPeriodWindow::new(date(2025, 1, 1), date(2025, 1, 1)).is_ok());
    }

    #[test]
    fn test_days_iterates_inclusive() {
        let window = PayPeriodWindow::new(date(2025, 1, 30), date(2025, 2, 2)).unwrap();
        let days: Vec<_> = window.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], date(2025, 1, 30));
        assert_eq!(days[3], date(2025, 2, 2));
    }

    #[test]
    fn test_starting_from() {
        let window = PayPeriodWindow::canonical(MonthKey::new(2025, 12).unwrap());
        let rest = window.starting_from(date(2025, 12, 10)).unwrap();
        assert_eq!(rest.start(), date(2025, 12, 10));
        assert_eq!(rest.end(), window.end());
        assert_eq!(window.starting_from(date(2025, 11, 1)), Some(window));
        assert_eq!(window.starting_from(date(2025, 12, 25)), None);
    }

    #[test]
    fn test_day_class() {
        let friday = DayClass::new(date(2025, 12, 5), false);
        assert!(friday.is_weekday && friday.is_friday);
        assert!(friday.counts_toward_budget());

        let saturday = DayClass::new(date(2025, 12, 6), false);
        assert!(!saturday.counts_toward_budget());

        let christmas_eve = DayClass::new(date(2025, 12, 24), true);
        assert!(!christmas_eve.counts_toward_budget());
        assert!(christmas_eve.is_withheld());
    }
}
