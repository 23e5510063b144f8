//! Core data models
//!
//! Plain data for the budgeting domain: money, months, pay periods,
//! categories, earners, account balances and the snapshots that tie them
//! together per month.

pub mod account;
pub mod category;
pub mod earner;
pub mod holiday;
pub mod ids;
pub mod money;
pub mod month;
pub mod pay_period;
pub mod result;
pub mod snapshot;

pub use account::{AccountBalanceRecord, AccountName};
pub use category::{BudgetCategory, CategoryKind, CategoryValidationError, Financing};
pub use earner::{Earner, PersonalLedger};
pub use holiday::{CustomHoliday, Holiday, HolidaySource};
pub use ids::CategoryId;
pub use money::{Money, BALANCE_TOLERANCE};
pub use month::{MonthKey, PAY_DAY};
pub use pay_period::{DayClass, DayCounts, PayPeriodWindow, TransferRates};
pub use result::{
    AccountBalanceSummary, BudgetWarning, CalculationOutcome, CalculationResult, Estimate,
    EstimateSource, PersonalBudget,
};
pub use snapshot::MonthSnapshot;
