//! Accounts and their per-month balance records

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::result::{Estimate, EstimateSource};

/// Unique name of a bank account
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for AccountName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&AccountName> for AccountName {
    fn from(name: &AccountName) -> Self {
        name.clone()
    }
}

/// One account's balances for one month
///
/// `final_balance` is always computed by the reconciler and never entered
/// by hand. `None` means it has not been computed for this month yet.
/// When the starting balance is not actual it holds the estimate the final
/// balance was computed from, and `estimate_source` says where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountBalanceRecord {
    #[serde(default)]
    pub starting_balance: Money,
    #[serde(default)]
    pub starting_balance_is_actual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate_source: Option<EstimateSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_balance: Option<Money>,
}

impl AccountBalanceRecord {
    /// A record with a user-entered starting balance
    pub fn actual(starting_balance: Money) -> Self {
        Self {
            starting_balance,
            starting_balance_is_actual: true,
            estimate_source: None,
            final_balance: None,
        }
    }

    /// Enter the known starting balance
    pub fn set_actual(&mut self, amount: Money) {
        self.starting_balance = amount;
        self.starting_balance_is_actual = true;
        self.estimate_source = None;
    }

    /// Forget the entered starting balance so it is estimated again
    pub fn clear_actual(&mut self) {
        self.starting_balance = Money::zero();
        self.starting_balance_is_actual = false;
        self.estimate_source = None;
    }

    /// Store a computed final balance and the starting balance it came from
    ///
    /// An entered starting balance is never replaced. Returns the final
    /// balance that was recorded before.
    pub fn record(&mut self, starting: Estimate, final_balance: Money) -> Option<Money> {
        if !self.starting_balance_is_actual {
            self.starting_balance = starting.amount;
            self.estimate_source = Some(starting.source);
        }
        self.final_balance.replace(final_balance)
    }

    /// Whether the recorded final balance rests on no real figure at all
    pub fn is_unfounded(&self) -> bool {
        !self.starting_balance_is_actual
            && self.estimate_source == Some(EstimateSource::Unavailable)
    }

    /// The starting balance if it was entered by the user
    pub fn actual_starting_balance(&self) -> Option<Money> {
        self.starting_balance_is_actual.then_some(self.starting_balance)
    }
}
