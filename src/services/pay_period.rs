//! Pay period calculator
//!
//! Counts transfer days inside pay period windows and turns them into a
//! daily-transfer budget. "Today" is always passed in by the caller.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::{DayClass, DayCounts, Money, MonthKey, PayPeriodWindow, TransferRates, PAY_DAY};
use crate::services::holiday::HolidayCalendar;

/// Daily budget for `weekday_count` days of which `friday_count` are Fridays
///
/// Fridays earn both rates: they are already included in `weekday_count`
/// and additionally earn the Friday rate.
pub fn daily_budget(weekday_count: u32, friday_count: u32, rates: &TransferRates) -> Money {
    rates.daily_rate.times(weekday_count as i64) + rates.friday_rate.times(friday_count as i64)
}

/// Transfers withheld on holiday weekdays in the counted window
pub fn withheld_budget(counts: &DayCounts, rates: &TransferRates) -> Money {
    daily_budget(counts.holiday_weekday_count, counts.holiday_friday_count, rates)
}

/// Budget figures for one month's pay period as seen from "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBudget {
    pub window: PayPeriodWindow,
    pub counts: DayCounts,
    pub remaining_counts: DayCounts,
    pub elapsed_counts: DayCounts,
    pub total: Money,
    pub remaining: Money,
    /// Already transferred before "today"; `elapsed + remaining == total`
    pub elapsed: Money,
    /// Informational; not subtracted from `total`
    pub holiday: Money,
    pub days_until_pay_date: i64,
}

/// Calculator for pay period windows and transfer budgets
pub struct PayPeriodCalculator<'a> {
    calendar: &'a HolidayCalendar,
}

impl<'a> PayPeriodCalculator<'a> {
    /// Create a calculator over a holiday calendar
    pub fn new(calendar: &'a HolidayCalendar) -> Self {
        Self { calendar }
    }

    /// The canonical window: 25th of the previous month through the 24th
    pub fn window(&self, month: MonthKey) -> PayPeriodWindow {
        PayPeriodWindow::canonical(month)
    }

    /// The window holidays are measured over; same bounds as [`Self::window`]
    pub fn holiday_window(&self, month: MonthKey) -> PayPeriodWindow {
        self.window(month)
    }

    /// What is left of `month`'s pay period from `today` on
    ///
    /// Past periods have nothing left, future periods are untouched.
    pub fn remaining_window(&self, month: MonthKey, today: NaiveDate) -> Option<PayPeriodWindow> {
        self.window(month).starting_from(today)
    }

    /// The part of `month`'s pay period before `today`
    pub fn elapsed_window(&self, month: MonthKey, today: NaiveDate) -> Option<PayPeriodWindow> {
        self.window(month).ending_before(today)
    }

    pub fn classify_day(&self, date: NaiveDate) -> DayClass {
        DayClass::new(date, self.calendar.is_holiday(date))
    }

    /// Count transfer days in an inclusive window
    pub fn classify_range(&self, window: &PayPeriodWindow) -> DayCounts {
        let holidays = self
            .calendar
            .holiday_dates(window.start().year()..=window.end().year());

        let mut counts = DayCounts::default();
        for date in window.days() {
            counts.record(DayClass::new(date, holidays.contains(&date)));
        }

        trace!(
            window = %window,
            weekdays = counts.weekday_count,
            fridays = counts.friday_count,
            "Classified pay period window"
        );
        counts
    }

    /// Days from `today` until the next salary day
    ///
    /// From the 25th onwards the next salary day is in the following month.
    pub fn days_until_pay_date(&self, today: NaiveDate) -> i64 {
        let this_month = today.with_day(PAY_DAY).unwrap_or(today);
        let pay_date = if today.day() < PAY_DAY {
            this_month
        } else {
            this_month
                .checked_add_months(Months::new(1))
                .unwrap_or(this_month)
        };
        (pay_date - today).num_days()
    }

    /// Total, remaining and withheld budget for `month`
    pub fn period_budget(
        &self,
        month: MonthKey,
        today: NaiveDate,
        rates: &TransferRates,
    ) -> PeriodBudget {
        let window = self.window(month);
        let counts = self.classify_range(&window);
        let remaining_counts = self
            .remaining_window(month, today)
            .map(|remaining| self.classify_range(&remaining))
            .unwrap_or_default();
        let elapsed_counts = self
            .elapsed_window(month, today)
            .map(|elapsed| self.classify_range(&elapsed))
            .unwrap_or_default();

        PeriodBudget {
            window,
            counts,
            remaining_counts,
            elapsed_counts,
            total: daily_budget(counts.weekday_count, counts.friday_count, rates),
            remaining: daily_budget(
                remaining_counts.weekday_count,
                remaining_counts.friday_count,
                rates,
            ),
            elapsed: daily_budget(elapsed_counts.weekday_count, elapsed_counts.friday_count, rates),
            holiday: withheld_budget(&self.classify_range(&self.holiday_window(month)), rates),
            days_until_pay_date: self.days_until_pay_date(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomHoliday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn rates() -> TransferRates {
        TransferRates::new(Money::from_kronor(300), Money::from_kronor(540))
    }

    #[test]
    fn test_window_invariant() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        let mut key = month(2023, 1);
        for _ in 0..36 {
            let window = calc.window(key);
            assert_eq!(window.start(), key.previous().day(25));
            assert_eq!(window.end(), key.day(24));
            key = key.next();
        }
    }

    #[test]
    fn test_december_2025_counts() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        let counts = calc.classify_range(&calc.window(month(2025, 12)));

        // Nov 25 - Dec 24 2025: 22 weekdays, Christmas Eve (Wednesday) is a holiday.
        assert_eq!(counts.weekday_count, 21);
        assert_eq!(counts.friday_count, 4);
        assert_eq!(counts.holiday_weekday_count, 1);
        assert_eq!(counts.holiday_friday_count, 0);
        assert_eq!(
            daily_budget(counts.weekday_count, counts.friday_count, &rates()),
            Money::from_kronor(8460)
        );
    }

    #[test]
    fn test_day_count_conservation() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        for key in month(2024, 1).range(24) {
            let counts = calc.classify_range(&calc.window(key));
            assert!(counts.weekday_count >= counts.friday_count);
            assert!(counts.weekday_count > 0);
        }

        let weekend = PayPeriodWindow::new(date(2025, 12, 6), date(2025, 12, 7)).unwrap();
        let counts = calc.classify_range(&weekend);
        assert_eq!(counts.weekday_count, 0);
        assert!(daily_budget(counts.weekday_count, counts.friday_count, &rates()).is_zero());
    }

    #[test]
    fn test_good_friday_is_withheld_with_both_rates() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        // April 2025 window covers Good Friday (April 18) and Easter Monday (April 21).
        let budget = calc.period_budget(month(2025, 4), date(2025, 1, 1), &rates());
        assert_eq!(budget.counts.holiday_weekday_count, 2);
        assert_eq!(budget.counts.holiday_friday_count, 1);
        assert_eq!(budget.holiday, Money::from_kronor(300 * 2 + 540));
    }

    #[test]
    fn test_custom_holiday_reduces_count() {
        let calendar = HolidayCalendar::new(vec![CustomHoliday::new(date(2025, 12, 5), "Klämdag")]);
        let calc = PayPeriodCalculator::new(&calendar);
        let counts = calc.classify_range(&calc.window(month(2025, 12)));
        assert_eq!(counts.weekday_count, 20);
        assert_eq!(counts.friday_count, 3);
    }

    #[test]
    fn test_remaining_window() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        let december = month(2025, 12);

        // Past month: nothing remains.
        assert_eq!(calc.remaining_window(december, date(2026, 1, 10)), None);
        // Future month: the whole window remains.
        assert_eq!(
            calc.remaining_window(december, date(2025, 10, 1)),
            Some(calc.window(december))
        );
        // Current month: from today to the 24th.
        let rest = calc.remaining_window(december, date(2025, 12, 15)).unwrap();
        assert_eq!(rest.start(), date(2025, 12, 15));
        assert_eq!(rest.end(), date(2025, 12, 24));
        // On the 25th the month's own period is already over.
        assert_eq!(calc.remaining_window(december, date(2025, 12, 25)), None);
    }

    #[test]
    fn test_period_budget_remaining() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        let budget = calc.period_budget(month(2025, 12), date(2025, 12, 15), &rates());

        // Dec 15-19 and 22-23 count, Dec 24 is a holiday: 7 days, 1 Friday.
        assert_eq!(budget.remaining_counts.weekday_count, 7);
        assert_eq!(budget.remaining_counts.friday_count, 1);
        assert_eq!(budget.remaining, Money::from_kronor(7 * 300 + 540));
        assert_eq!(budget.total, Money::from_kronor(8460));

        let past = calc.period_budget(month(2025, 11), date(2025, 12, 15), &rates());
        assert!(past.remaining.is_zero());

        let future = calc.period_budget(month(2026, 2), date(2025, 12, 15), &rates());
        assert_eq!(future.remaining, future.total);
    }

    #[test]
    fn test_elapsed_complements_remaining() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        let december = month(2025, 12);

        let elapsed = calc.elapsed_window(december, date(2025, 12, 15)).unwrap();
        assert_eq!(elapsed.start(), date(2025, 11, 25));
        assert_eq!(elapsed.end(), date(2025, 12, 14));
        assert_eq!(calc.elapsed_window(december, date(2025, 11, 25)), None);
        assert_eq!(
            calc.elapsed_window(december, date(2026, 1, 5)),
            Some(calc.window(december))
        );

        for today in [date(2025, 11, 1), date(2025, 12, 1), date(2025, 12, 15), date(2026, 1, 1)] {
            let budget = calc.period_budget(december, today, &rates());
            assert_eq!(budget.elapsed + budget.remaining, budget.total);
        }
    }

    #[test]
    fn test_days_until_pay_date() {
        let calendar = HolidayCalendar::public_only();
        let calc = PayPeriodCalculator::new(&calendar);
        assert_eq!(calc.days_until_pay_date(date(2025, 12, 15)), 10);
        assert_eq!(calc.days_until_pay_date(date(2025, 12, 24)), 1);
        assert_eq!(calc.days_until_pay_date(date(2025, 12, 25)), 31);
        assert_eq!(calc.days_until_pay_date(date(2025, 12, 31)), 25);
    }
}
