//! Money type for representing currency amounts
//!
//! Internally stores amounts in öre (i64) so sums over a month never drift.
//! Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Largest absolute residual that still counts as "balanced" (exclusive)
pub const BALANCE_TOLERANCE: Money = Money::from_ore(1);

/// Represents a monetary amount stored as öre (hundredths of a krona)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from öre
    ///
    /// # Examples
    /// ```
    /// use hushall::models::Money;
    /// let amount = Money::from_ore(1050); // 10.50 kr
    /// ```
    pub const fn from_ore(ore: i64) -> Self {
        Self(ore)
    }

    /// Create a Money amount from whole kronor
    ///
    /// # Examples
    /// ```
    /// use hushall::models::Money;
    /// let amount = Money::from_kronor(300);
    /// assert_eq!(amount.ore(), 30000);
    /// ```
    pub const fn from_kronor(kronor: i64) -> Self {
        Self(kronor * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in öre
    pub const fn ore(&self) -> i64 {
        self.0
    }

    /// Get the whole kronor portion (truncated toward zero)
    pub const fn kronor(&self) -> i64 {
        self.0 / 100
    }

    /// Get the öre portion (0-99)
    pub const fn ore_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by a whole count (e.g. number of days)
    pub const fn times(&self, count: i64) -> Self {
        Self(self.0 * count)
    }

    /// Whether this amount is within [`BALANCE_TOLERANCE`] of zero
    pub const fn is_balanced(&self) -> bool {
        self.0.abs() < BALANCE_TOLERANCE.0
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "1234.50", "1 234,50", "-12", "45 000 kr". Both `.` and `,`
    /// work as the decimal separator; spaces are thousands separators.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let original = s.trim();
        let s = original
            .strip_suffix("kr")
            .unwrap_or(original)
            .trim_end();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(original.to_string()));
        }

        let invalid = || MoneyParseError::InvalidFormat(original.to_string());

        let ore = if cleaned.contains('.') {
            let parts: Vec<&str> = cleaned.split('.').collect();
            if parts.len() != 2 {
                return Err(invalid());
            }

            let kronor: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0].parse().map_err(|_| invalid())?
            };

            // Pad or truncate öre to 2 digits
            let ore_str = parts[1];
            if !ore_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let ore: i64 = match ore_str.len() {
                0 => 0,
                1 => ore_str.parse::<i64>().map_err(|_| invalid())? * 10,
                _ => ore_str[..2].parse().map_err(|_| invalid())?,
            };

            kronor
                .checked_mul(100)
                .and_then(|k| k.checked_add(ore))
                .ok_or_else(invalid)?
        } else {
            cleaned
                .parse::<i64>()
                .map_err(|_| invalid())?
                .checked_mul(100)
                .ok_or_else(invalid)?
        };

        Ok(Self(if negative { -ore } else { ore }))
    }

    /// Format with an explicit currency suffix
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}.{:02} {}",
            sign,
            self.kronor().abs(),
            self.ore_part(),
            symbol
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("kr"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
