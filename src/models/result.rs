//! Computed results
//!
//! Nothing in here is authoritative: every value is derived from a
//! [`super::MonthSnapshot`] and can be recomputed at any time.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::AccountName;
use super::money::Money;

/// Totals for one month's budget
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_income: Money,
    pub total_daily_budget: Money,
    pub remaining_daily_budget: Money,
    /// Transfers withheld because the day is a holiday (reporting only)
    pub holiday_budget: Money,
    /// What remains after both shares are subtracted; zero when balanced
    pub balance_left: Money,
    pub earner_a_share: Money,
    pub earner_b_share: Money,
    pub earner_a_percent: f64,
    pub earner_b_percent: f64,
    pub days_until_pay_date: i64,
    pub weekday_count: u32,
    pub friday_count: u32,
    /// Shared costs plus shared savings
    pub total_expenses: Money,
}

impl CalculationResult {
    pub fn is_balanced(&self) -> bool {
        self.balance_left.is_balanced()
    }
}

/// Where an estimated balance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    /// Entered by the user
    Actual,
    /// The previous month's recorded final balance
    PreviousMonth,
    /// Rebuilt from two months back through the previous month's categories
    Reconstructed,
    /// No prior data; the amount is a placeholder zero
    Unavailable,
}

/// A balance together with how it was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub amount: Money,
    pub source: EstimateSource,
}

impl Estimate {
    pub fn new(amount: Money, source: EstimateSource) -> Self {
        Self { amount, source }
    }

    pub fn actual(amount: Money) -> Self {
        Self::new(amount, EstimateSource::Actual)
    }

    pub fn unavailable() -> Self {
        Self::new(Money::zero(), EstimateSource::Unavailable)
    }

    /// False when the amount is a placeholder rather than a real figure
    pub fn is_available(&self) -> bool {
        self.source != EstimateSource::Unavailable
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            EstimateSource::Unavailable => write!(f, "no estimate available"),
            EstimateSource::Actual => write!(f, "{}", self.amount),
            _ => write!(f, "~{}", self.amount),
        }
    }
}

/// Data-quality signals that callers should show prominently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetWarning {
    /// Shares do not add up to the pool being divided
    Unbalanced { residual: Money },
    /// No starting balance could be estimated for the account
    EstimateUnavailable { account: AccountName },
    /// Costs and daily budget exceed income
    NegativePool { pool: Money },
}

impl fmt::Display for BudgetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbalanced { residual } => {
                write!(f, "Budget not balanced: {} left over", residual)
            }
            Self::EstimateUnavailable { account } => {
                write!(f, "No starting balance estimate available for '{}'", account)
            }
            Self::NegativePool { pool } => {
                write!(f, "Expenses exceed income by {}", pool.abs())
            }
        }
    }
}

/// What one earner has left after their personal lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonalBudget {
    pub share: Money,
    pub personal_costs: Money,
    pub personal_savings: Money,
    pub remaining: Money,
}

impl PersonalBudget {
    pub fn new(share: Money, personal_costs: Money, personal_savings: Money) -> Self {
        Self {
            share,
            personal_costs,
            personal_savings,
            remaining: share - personal_costs - personal_savings,
        }
    }
}

/// A calculation plus any warnings raised while computing it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub result: CalculationResult,
    pub personal_a: PersonalBudget,
    pub personal_b: PersonalBudget,
    pub warnings: Vec<BudgetWarning>,
}

/// Per-account figures shown for a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalanceSummary {
    pub account: AccountName,
    pub starting_balance: Estimate,
    pub final_balance: Money,
    pub estimated_final_balance: Money,
}
