//! Budget categories
//!
//! Cost categories are groups whose amount is the sum of their
//! subcategories; the group's own `amount` is a leftover field that only
//! counts when the group has no subcategories. Savings categories always
//! use their own amount.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::AccountName;
use super::ids::CategoryId;
use super::money::Money;

/// Whether a category is spent or saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Cost,
    Savings,
}

/// How a cost is financed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Financing {
    /// Replenished by next month's cost-budget transfer
    #[default]
    Recurring,
    /// A permanent withdrawal from the account
    OneOff,
}

/// A budget line, possibly with subcategories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub amount: Money,
    pub kind: CategoryKind,
    /// Account the money is drawn from or deposited to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountName>,
    /// Unset means [`Financing::Recurring`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<Financing>,
    #[serde(default)]
    pub sub_categories: Vec<BudgetCategory>,
}

impl BudgetCategory {
    /// Create a cost group; add line items with [`BudgetCategory::with_sub`]
    pub fn cost(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            amount: Money::zero(),
            kind: CategoryKind::Cost,
            account: None,
            financing: None,
            sub_categories: Vec::new(),
        }
    }

    /// Create a cost line item with an amount
    pub fn cost_item(name: impl Into<String>, amount: Money) -> Self {
        Self {
            amount,
            ..Self::cost(name)
        }
    }

    /// Create a savings category
    pub fn savings(name: impl Into<String>, amount: Money) -> Self {
        Self {
            amount,
            kind: CategoryKind::Savings,
            ..Self::cost(name)
        }
    }

    pub fn with_account(mut self, account: impl Into<AccountName>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_financing(mut self, financing: Financing) -> Self {
        self.financing = Some(financing);
        self
    }

    pub fn with_sub(mut self, sub: BudgetCategory) -> Self {
        self.sub_categories.push(sub);
        self
    }

    pub fn is_cost(&self) -> bool {
        self.kind == CategoryKind::Cost
    }

    pub fn is_savings(&self) -> bool {
        self.kind == CategoryKind::Savings
    }

    /// Effective financing, defaulting to recurring
    pub fn financing(&self) -> Financing {
        self.financing.unwrap_or_default()
    }

    /// Whether this line is tagged to `account`
    pub fn is_on(&self, account: &AccountName) -> bool {
        self.account.as_ref() == Some(account)
    }

    /// Displayed total of this category
    pub fn total(&self) -> Money {
        match self.kind {
            CategoryKind::Cost if !self.sub_categories.is_empty() => {
                self.sub_categories.iter().map(|s| s.amount).sum()
            }
            _ => self.amount,
        }
    }

    /// The line items that carry money: subcategories for cost groups that
    /// have them, otherwise the category itself
    pub fn leaves(&self) -> Vec<&BudgetCategory> {
        if self.is_cost() && !self.sub_categories.is_empty() {
            self.sub_categories.iter().collect()
        } else {
            vec![self]
        }
    }

    /// Validate the category and its subcategories
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.amount.is_negative() {
            return Err(CategoryValidationError::NegativeAmount(self.name.clone()));
        }

        for sub in &self.sub_categories {
            if !sub.sub_categories.is_empty() {
                return Err(CategoryValidationError::NestedTooDeep(sub.name.clone()));
            }
            if sub.kind != self.kind {
                return Err(CategoryValidationError::KindMismatch {
                    parent: self.name.clone(),
                    child: sub.name.clone(),
                });
            }
            sub.validate()?;
        }

        Ok(())
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Total of a list of categories
pub fn total_of(categories: &[BudgetCategory]) -> Money {
    categories.iter().map(BudgetCategory::total).sum()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NegativeAmount(String),
    NestedTooDeep(String),
    KindMismatch { parent: String, child: String },
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NegativeAmount(name) => {
                write!(f, "Category '{}' has a negative amount", name)
            }
            Self::NestedTooDeep(name) => {
                write!(f, "Subcategory '{}' cannot have its own subcategories", name)
            }
            Self::KindMismatch { parent, child } => write!(
                f,
                "Subcategory '{}' must have the same type as '{}'",
                child, parent
            ),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
