//! Budget calculation
//!
//! Combines the pay period budget, the shared category totals and the
//! income split into one [`CalculationResult`] for a month.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::HushallResult;
use crate::models::{
    BudgetWarning, CalculationOutcome, CalculationResult, MonthSnapshot, PersonalBudget,
};
use crate::services::allocation::allocate;
use crate::services::holiday::HolidayCalendar;
use crate::services::pay_period::PayPeriodCalculator;

/// Compute the month's budget as seen from `today`
///
/// Fails only on structurally invalid snapshots. An unbalanced split or a
/// negative pool is reported through the outcome's warnings.
pub fn calculate(snapshot: &MonthSnapshot, today: NaiveDate) -> HushallResult<CalculationOutcome> {
    snapshot.validate()?;

    let calendar = HolidayCalendar::new(snapshot.custom_holidays.clone());
    let period = PayPeriodCalculator::new(&calendar).period_budget(
        snapshot.month,
        today,
        &snapshot.rates,
    );

    let total_income = snapshot.total_income();
    let total_expenses = snapshot.total_shared_costs() + snapshot.total_shared_savings();
    let pool = total_income - period.total - total_expenses;
    let allocation = allocate(&snapshot.earner_a, &snapshot.earner_b, pool);

    let result = CalculationResult {
        total_income,
        total_daily_budget: period.total,
        remaining_daily_budget: period.remaining,
        holiday_budget: period.holiday,
        balance_left: allocation.residual,
        earner_a_share: allocation.share_a,
        earner_b_share: allocation.share_b,
        earner_a_percent: allocation.percent_a,
        earner_b_percent: allocation.percent_b,
        days_until_pay_date: period.days_until_pay_date,
        weekday_count: period.counts.weekday_count,
        friday_count: period.counts.friday_count,
        total_expenses,
    };

    debug!(
        month = %snapshot.month,
        income = %result.total_income,
        daily_budget = %result.total_daily_budget,
        expenses = %result.total_expenses,
        pool = %pool,
        "Calculated month budget"
    );

    let mut warnings = Vec::new();
    if pool.is_negative() {
        warn!(month = %snapshot.month, pool = %pool, "Expenses exceed income");
        warnings.push(BudgetWarning::NegativePool { pool });
    }
    if !result.is_balanced() {
        warn!(month = %snapshot.month, residual = %result.balance_left, "Budget not balanced");
        warnings.push(BudgetWarning::Unbalanced {
            residual: result.balance_left,
        });
    }

    Ok(CalculationOutcome {
        personal_a: PersonalBudget::new(
            result.earner_a_share,
            snapshot.personal_a.total_costs(),
            snapshot.personal_a.total_savings(),
        ),
        personal_b: PersonalBudget::new(
            result.earner_b_share,
            snapshot.personal_b.total_costs(),
            snapshot.personal_b.total_savings(),
        ),
        result,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetCategory, Earner, Money, MonthKey, TransferRates};

    fn december_snapshot() -> MonthSnapshot {
        let mut snapshot = MonthSnapshot::new(MonthKey::new(2025, 12).unwrap());
        snapshot.earner_a = Earner::salaried(Money::from_kronor(45000));
        snapshot.earner_b = Earner::new(
            Money::from_kronor(40000),
            Money::from_kronor(5000),
            Money::zero(),
        );
        snapshot.shared_costs.push(
            BudgetCategory::cost("Boende")
                .with_sub(BudgetCategory::cost_item("Hyra", Money::from_kronor(15000)))
                .with_sub(BudgetCategory::cost_item("El", Money::from_kronor(2000))),
        );
        snapshot
            .shared_costs
            .push(BudgetCategory::cost_item("Mat", Money::from_kronor(8000)));
        snapshot.rates = TransferRates::new(Money::from_kronor(300), Money::from_kronor(540));
        snapshot
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_december_2025_end_to_end() {
        let snapshot = december_snapshot();
        let outcome = calculate(&snapshot, date(2025, 12, 1)).unwrap();
        let result = &outcome.result;

        assert_eq!(result.total_income, Money::from_kronor(90000));
        assert_eq!(result.weekday_count, 21);
        assert_eq!(result.friday_count, 4);
        assert_eq!(result.total_daily_budget, Money::from_kronor(8460));
        assert_eq!(result.total_expenses, Money::from_kronor(25000));
        assert_eq!(result.holiday_budget, Money::from_kronor(300));

        // 90000 - 8460 - 25000 = 56540, split evenly.
        assert_eq!(result.earner_a_share, Money::from_kronor(28270));
        assert_eq!(result.earner_b_share, Money::from_kronor(28270));
        assert!(result.balance_left.abs() < Money::from_ore(1));
        assert!(outcome.warnings.is_empty());
        assert_eq!(result.days_until_pay_date, 24);
    }

    #[test]
    fn test_personal_budgets() {
        let mut snapshot = december_snapshot();
        snapshot
            .personal_a
            .costs
            .push(BudgetCategory::cost_item("Gym", Money::from_kronor(500)));
        snapshot
            .personal_b
            .savings
            .push(BudgetCategory::savings("Fond", Money::from_kronor(2000)));

        let outcome = calculate(&snapshot, date(2025, 12, 1)).unwrap();
        assert_eq!(outcome.personal_a.remaining, Money::from_kronor(27770));
        assert_eq!(outcome.personal_b.remaining, Money::from_kronor(26270));
        // Personal lines do not change the shared split.
        assert_eq!(outcome.result.earner_a_share, Money::from_kronor(28270));
    }

    #[test]
    fn test_zero_income_is_flagged() {
        let mut snapshot = december_snapshot();
        snapshot.earner_a = Earner::default();
        snapshot.earner_b = Earner::default();

        let outcome = calculate(&snapshot, date(2025, 12, 1)).unwrap();
        assert!(outcome.result.earner_a_share.is_zero());
        assert!(!outcome.result.is_balanced());
        assert!(outcome
            .warnings
            .iter()
            .any(|w| matches!(w, BudgetWarning::Unbalanced { .. })));
        assert!(outcome
            .warnings
            .iter()
            .any(|w| matches!(w, BudgetWarning::NegativePool { .. })));
    }

    #[test]
    fn test_invalid_snapshot_is_an_error() {
        let mut snapshot = december_snapshot();
        snapshot.rates.daily_rate = Money::from_kronor(-1);
        assert!(calculate(&snapshot, date(2025, 12, 1))
            .unwrap_err()
            .is_validation());
    }
}
