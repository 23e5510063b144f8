//! Income earners
//!
//! The household has exactly two earners. Each one's income is the sum of
//! salary and benefits for the month.

use serde::{Deserialize, Serialize};

use super::category::{total_of, BudgetCategory};
use super::money::Money;

/// Validation errors for earners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EarnerValidationError {
    NegativeIncome(&'static str),
}

impl std::fmt::Display for EarnerValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeIncome(field) => write!(f, "Income field '{}' cannot be negative", field),
        }
    }
}

impl std::error::Error for EarnerValidationError {}

/// One earner's monthly income components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Earner {
    #[serde(default)]
    pub salary: Money,
    #[serde(default)]
    pub government_benefit: Money,
    #[serde(default)]
    pub child_benefit: Money,
}

impl Earner {
    pub fn new(salary: Money, government_benefit: Money, child_benefit: Money) -> Self {
        Self {
            salary,
            government_benefit,
            child_benefit,
        }
    }

    /// An earner with only a salary
    pub fn salaried(salary: Money) -> Self {
        Self {
            salary,
            ..Self::default()
        }
    }

    pub fn total_income(&self) -> Money {
        self.salary + self.government_benefit + self.child_benefit
    }

    pub fn validate(&self) -> Result<(), EarnerValidationError> {
        if self.salary.is_negative() {
            return Err(EarnerValidationError::NegativeIncome("salary"));
        }
        if self.government_benefit.is_negative() {
            return Err(EarnerValidationError::NegativeIncome("government_benefit"));
        }
        if self.child_benefit.is_negative() {
            return Err(EarnerValidationError::NegativeIncome("child_benefit"));
        }
        Ok(())
    }
}

/// An earner's own costs and savings, paid out of their share
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonalLedger {
    #[serde(default)]
    pub costs: Vec<BudgetCategory>,
    #[serde(default)]
    pub savings: Vec<BudgetCategory>,
}

impl PersonalLedger {
    pub fn total_costs(&self) -> Money {
        total_of(&self.costs)
    }

    pub fn total_savings(&self) -> Money {
        total_of(&self.savings)
    }
}
