//! Month snapshots
//!
//! A [`MonthSnapshot`] is everything the household entered for one month,
//! plus the balances and result last computed from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::account::{AccountBalanceRecord, AccountName};
use super::category::{total_of, BudgetCategory};
use super::earner::{Earner, PersonalLedger};
use super::holiday::CustomHoliday;
use super::money::Money;
use super::month::MonthKey;
use super::pay_period::TransferRates;
use super::result::CalculationResult;
use crate::error::{HushallError, HushallResult};

/// Full budget state for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSnapshot {
    pub month: MonthKey,
    #[serde(default)]
    pub earner_a: Earner,
    #[serde(default)]
    pub earner_b: Earner,
    #[serde(default)]
    pub shared_costs: Vec<BudgetCategory>,
    #[serde(default)]
    pub shared_savings: Vec<BudgetCategory>,
    #[serde(default)]
    pub personal_a: PersonalLedger,
    #[serde(default)]
    pub personal_b: PersonalLedger,
    #[serde(default)]
    pub rates: TransferRates,
    #[serde(default)]
    pub custom_holidays: Vec<CustomHoliday>,
    #[serde(default)]
    pub balances: BTreeMap<AccountName, AccountBalanceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<CalculationResult>,
}

impl MonthSnapshot {
    /// An empty month
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            earner_a: Earner::default(),
            earner_b: Earner::default(),
            shared_costs: Vec::new(),
            shared_savings: Vec::new(),
            personal_a: PersonalLedger::default(),
            personal_b: PersonalLedger::default(),
            rates: TransferRates::default(),
            custom_holidays: Vec::new(),
            balances: BTreeMap::new(),
            last_result: None,
        }
    }

    /// A new month seeded from another month's plan
    ///
    /// Income, categories, rates and custom holidays are copied. Balances are
    /// reset so every account's starting balance gets estimated afresh.
    pub fn seeded_from(month: MonthKey, source: &MonthSnapshot) -> Self {
        let balances = source
            .balances
            .keys()
            .map(|account| (account.clone(), AccountBalanceRecord::default()))
            .collect();

        Self {
            month,
            earner_a: source.earner_a,
            earner_b: source.earner_b,
            shared_costs: source.shared_costs.clone(),
            shared_savings: source.shared_savings.clone(),
            personal_a: source.personal_a.clone(),
            personal_b: source.personal_b.clone(),
            rates: source.rates,
            custom_holidays: source.custom_holidays.clone(),
            balances,
            last_result: None,
        }
    }

    /// Every category of the month, shared and personal
    pub fn all_categories(&self) -> impl Iterator<Item = &BudgetCategory> {
        self.shared_costs
            .iter()
            .chain(&self.shared_savings)
            .chain(&self.personal_a.costs)
            .chain(&self.personal_a.savings)
            .chain(&self.personal_b.costs)
            .chain(&self.personal_b.savings)
    }

    /// Whether the month has any categories at all
    pub fn has_categories(&self) -> bool {
        self.all_categories().next().is_some()
    }

    pub fn total_shared_costs(&self) -> Money {
        total_of(&self.shared_costs)
    }

    pub fn total_shared_savings(&self) -> Money {
        total_of(&self.shared_savings)
    }

    pub fn total_income(&self) -> Money {
        self.earner_a.total_income() + self.earner_b.total_income()
    }

    pub fn balance(&self, account: &AccountName) -> Option<&AccountBalanceRecord> {
        self.balances.get(account)
    }

    /// The balance record for `account`, created empty if missing
    pub fn balance_mut(&mut self, account: &AccountName) -> &mut AccountBalanceRecord {
        self.balances.entry(account.clone()).or_default()
    }

    /// The recorded final balance for `account`, if one was computed
    pub fn recorded_final_balance(&self, account: &AccountName) -> Option<Money> {
        self.balance(account).and_then(|record| record.final_balance)
    }

    /// Validate the snapshot's user-entered data
    pub fn validate(&self) -> HushallResult<()> {
        self.earner_a
            .validate()
            .map_err(|e| HushallError::Validation(format!("earner A: {}", e)))?;
        self.earner_b
            .validate()
            .map_err(|e| HushallError::Validation(format!("earner B: {}", e)))?;

        for category in self.all_categories() {
            category
                .validate()
                .map_err(|e| HushallError::Validation(e.to_string()))?;
        }

        for holiday in &self.custom_holidays {
            holiday
                .validate()
                .map_err(|e| HushallError::Validation(e.to_string()))?;
        }

        if self.rates.daily_rate.is_negative() || self.rates.friday_rate.is_negative() {
            return Err(HushallError::Validation(
                "Transfer rates cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month() -> MonthKey {
        MonthKey::new(2025, 12).unwrap()
    }

    fn populated() -> MonthSnapshot {
        let mut snapshot = MonthSnapshot::new(month());
        snapshot.earner_a = Earner::salaried(Money::from_kronor(45000));
        snapshot.shared_costs.push(BudgetCategory::cost_item("Hyra", Money::from_kronor(12000)));
        snapshot.shared_savings.push(
            BudgetCategory::savings("Buffert", Money::from_kronor(2000)).with_account("Buffert"),
        );
        snapshot
            .personal_b
            .costs
            .push(BudgetCategory::cost_item("Gym", Money::from_kronor(400)));
        let record = snapshot.balance_mut(&AccountName::from("Buffert"));
        record.set_actual(Money::from_kronor(5000));
        record.final_balance = Some(Money::from_kronor(7000));
        snapshot
    }

    #[test]
    fn test_all_categories_includes_personal() {
        let snapshot = populated();
        assert_eq!(snapshot.all_categories().count(), 3);
        assert!(snapshot.has_categories());
        assert!(!MonthSnapshot::new(month()).has_categories());
    }

    #[test]
    fn test_seeded_from_resets_balances() {
        let source = populated();
        let next = MonthSnapshot::seeded_from(month().next(), &source);

        assert_eq!(next.month, month().next());
        assert_eq!(next.shared_costs, source.shared_costs);
        assert_eq!(next.earner_a, source.earner_a);
        let record = next.balance(&AccountName::from("Buffert")).unwrap();
        assert!(!record.starting_balance_is_actual);
        assert_eq!(record.final_balance, None);
        assert!(next.last_result.is_none());
    }

    #[test]
    fn test_recorded_final_balance() {
        let snapshot = populated();
        assert_eq!(
            snapshot.recorded_final_balance(&AccountName::from("Buffert")),
            Some(Money::from_kronor(7000))
        );
        assert_eq!(snapshot.recorded_final_balance(&AccountName::from("Okänt")), None);
    }

    #[test]
    fn test_validate_rejects_bad_category() {
        let mut snapshot = populated();
        assert!(snapshot.validate().is_ok());
        snapshot
            .personal_a
            .savings
            .push(BudgetCategory::savings("", Money::zero()));
        assert!(snapshot.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_serialization() {
        let snapshot = populated();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: MonthSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
