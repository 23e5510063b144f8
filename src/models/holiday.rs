//! Holiday records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a holiday comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidaySource {
    /// Same month/day every year
    Fixed,
    /// Offset from Easter Sunday
    EasterRelative,
    /// Weekday rule inside a date range (Midsummer Eve, All Saints' Day)
    Moving,
    /// Entered by the user
    Custom,
}

/// A public or user-defined holiday on a specific date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    pub source: HolidaySource,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>, source: HolidaySource) -> Self {
        Self {
            date,
            name: name.into(),
            source,
        }
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.name)
    }
}

/// A holiday supplied by the user, matched by exact date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHoliday {
    pub date: NaiveDate,
    pub name: String,
}

impl CustomHoliday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }

    /// Validate the custom holiday
    pub fn validate(&self) -> Result<(), HolidayValidationError> {
        if self.name.trim().is_empty() {
            return Err(HolidayValidationError::EmptyName(self.date));
        }
        Ok(())
    }

    pub fn to_holiday(&self) -> Holiday {
        Holiday::new(self.date, self.name.clone(), HolidaySource::Custom)
    }
}

/// Validation errors for custom holidays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayValidationError {
    EmptyName(NaiveDate),
}

impl fmt::Display for HolidayValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName(date) => write!(f, "Custom holiday on {} has no name", date),
        }
    }
}

impl std::error::Error for HolidayValidationError {}
