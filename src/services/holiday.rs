//! Holiday calendar
//!
//! Swedish public holidays: fixed dates, Easter-relative dates and the two
//! weekday-ruled holidays (Midsummer Eve, All Saints' Day), merged with the
//! household's own custom holidays. Moving holidays are always computed for
//! the year of the date being asked about.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::{CustomHoliday, Holiday, HolidaySource};

/// Fixed-date holidays as (month, day, name)
const FIXED_HOLIDAYS: [(u32, u32, &str); 8] = [
    (1, 1, "Nyårsdagen"),
    (1, 6, "Trettondedag jul"),
    (5, 1, "Första maj"),
    (6, 6, "Sveriges nationaldag"),
    (12, 24, "Julafton"),
    (12, 25, "Juldagen"),
    (12, 26, "Annandag jul"),
    (12, 31, "Nyårsafton"),
];

/// Easter-relative holidays as (offset in days from Easter Sunday, name)
const EASTER_HOLIDAYS: [(i64, &str); 4] = [
    (-2, "Långfredagen"),
    (1, "Annandag påsk"),
    (39, "Kristi himmelsfärdsdag"),
    (50, "Annandag pingst"),
];

const MIDSUMMER_EVE: &str = "Midsommarafton";
const ALL_SAINTS_DAY: &str = "Alla helgons dag";

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Easter Sunday for a Gregorian year (anonymous Gregorian algorithm)
///
/// Returns `None` only for years chrono cannot represent.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    ymd(year, month as u32, day as u32)
}

/// First date in `days` that falls on `weekday`
fn first_weekday(
    days: impl IntoIterator<Item = Option<NaiveDate>>,
    weekday: Weekday,
) -> Option<NaiveDate> {
    days.into_iter()
        .flatten()
        .find(|date| date.weekday() == weekday)
}

/// Midsummer Eve: the Friday between June 19 and June 25
pub fn midsummer_eve(year: i32) -> Option<NaiveDate> {
    first_weekday((19..=25).map(|day| ymd(year, 6, day)), Weekday::Fri)
        .or_else(|| ymd(year, 6, 24))
}

/// All Saints' Day: the first Saturday scanning October 31 back to October 25,
/// then November 1 to 6
pub fn all_saints_day(year: i32) -> Option<NaiveDate> {
    first_weekday((25..=31).rev().map(|day| ymd(year, 10, day)), Weekday::Sat)
        .or_else(|| first_weekday((1..=6).map(|day| ymd(year, 11, day)), Weekday::Sat))
        .or_else(|| ymd(year, 11, 1))
}

/// Computed public holidays for a year, without custom holidays, sorted by date
///
/// When two computed holidays share a date the first in table order is kept.
pub fn public_holidays(year: i32) -> Vec<Holiday> {
    let mut by_date: BTreeMap<NaiveDate, Holiday> = BTreeMap::new();
    let mut add = |date: Option<NaiveDate>, name: &str, source: HolidaySource| {
        if let Some(date) = date {
            by_date
                .entry(date)
                .or_insert_with(|| Holiday::new(date, name, source));
        }
    };

    for (month, day, name) in FIXED_HOLIDAYS {
        add(ymd(year, month, day), name, HolidaySource::Fixed);
    }

    if let Some(easter) = easter_sunday(year) {
        for (offset, name) in EASTER_HOLIDAYS {
            add(
                Some(easter + Duration::days(offset)),
                name,
                HolidaySource::EasterRelative,
            );
        }
    }

    add(midsummer_eve(year), MIDSUMMER_EVE, HolidaySource::Moving);
    add(all_saints_day(year), ALL_SAINTS_DAY, HolidaySource::Moving);

    by_date.into_values().collect()
}

/// Public holidays merged with a household's custom holidays
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    custom: Vec<CustomHoliday>,
}

impl HolidayCalendar {
    /// Create a calendar with the given custom holidays
    pub fn new(custom: Vec<CustomHoliday>) -> Self {
        Self { custom }
    }

    /// Public holidays only
    pub fn public_only() -> Self {
        Self::default()
    }

    pub fn custom_holidays(&self) -> &[CustomHoliday] {
        &self.custom
    }

    /// All holidays in `year`, one per date, sorted
    ///
    /// A custom holiday on the same date as a public one replaces its name.
    pub fn holidays_for_year(&self, year: i32) -> Vec<Holiday> {
        let mut by_date: BTreeMap<NaiveDate, Holiday> = public_holidays(year)
            .into_iter()
            .map(|holiday| (holiday.date, holiday))
            .collect();

        for custom in self.custom.iter().filter(|c| c.date.year() == year) {
            by_date.insert(custom.date, custom.to_holiday());
        }

        by_date.into_values().collect()
    }

    /// Dates of every holiday in the given years
    pub fn holiday_dates(&self, years: impl IntoIterator<Item = i32>) -> HashSet<NaiveDate> {
        years
            .into_iter()
            .flat_map(|year| self.holidays_for_year(year))
            .map(|holiday| holiday.date)
            .collect()
    }

    /// Check whether `date` is a public or custom holiday
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.lookup(date).is_some()
    }

    /// Name of the holiday on `date`, custom names taking precedence
    pub fn name_of(&self, date: NaiveDate) -> Option<String> {
        self.lookup(date).map(|holiday| holiday.name)
    }

    /// The holiday on `date`, if any
    pub fn lookup(&self, date: NaiveDate) -> Option<Holiday> {
        if let Some(custom) = self.custom.iter().find(|c| c.date == date) {
            return Some(custom.to_holiday());
        }
        public_holidays(date.year())
            .into_iter()
            .find(|holiday| holiday.date == date)
    }

    /// Up to `count` holidays on or after `today`, from this year and next
    pub fn upcoming(&self, today: NaiveDate, count: usize) -> Vec<Holiday> {
        let year = today.year();
        self.holidays_for_year(year)
            .into_iter()
            .chain(self.holidays_for_year(year + 1))
            .filter(|holiday| holiday.date >= today)
            .take(count)
            .collect()
    }

    pub fn next_five(&self, today: NaiveDate) -> Vec<Holiday> {
        self.upcoming(today, 5)
    }

    pub fn next_ten(&self, today: NaiveDate) -> Vec<Holiday> {
        self.upcoming(today, 10)
    }
}
