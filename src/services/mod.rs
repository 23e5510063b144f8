//! Service layer
//!
//! The engines behind a month's figures: holiday calendar, pay period
//! day counting, income allocation, budget calculation, account
//! reconciliation and the month lifecycle that ties them to storage.

pub mod allocation;
pub mod budget;
pub mod holiday;
pub mod month;
pub mod pay_period;
pub mod reconciliation;

pub use allocation::{allocate, Allocation};
pub use budget::calculate;
pub use holiday::HolidayCalendar;
pub use month::{MonthReport, MonthService};
pub use pay_period::{PayPeriodCalculator, PeriodBudget};
pub use reconciliation::{AccountReconciler, FinalBalanceUpdate};
