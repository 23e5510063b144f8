//! Account reconciliation across months
//!
//! Two closing-balance formulas exist and must stay separate:
//!
//! - [`final_balance`] is the historical truth: savings in, every cost out.
//! - [`budget_deposit_balance`] is the forward projection used for planning:
//!   recurring costs are refilled by next month's cost-budget transfer, so
//!   only one-off costs leave the account for good.
//!
//! A month's starting balance is either entered by the user or estimated
//! from the previous month's final balance, falling back one more month and
//! rebuilding the previous month's closing figure when needed.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::HushallResult;
use crate::models::{
    AccountBalanceRecord, AccountName, BudgetCategory, Estimate, EstimateSource, Financing,
    Money, MonthKey, MonthSnapshot,
};
use crate::storage::BudgetPeriodStore;

/// Per-account sums over a month's categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountFlows {
    pub savings: Money,
    pub recurring_costs: Money,
    pub one_off_costs: Money,
}

impl AccountFlows {
    /// Sum the lines tagged to `account`
    pub fn collect<'c>(
        account: &AccountName,
        categories: impl IntoIterator<Item = &'c BudgetCategory>,
    ) -> Self {
        let mut flows = Self::default();
        for category in categories {
            if category.is_savings() {
                if category.is_on(account) {
                    flows.savings += category.amount;
                }
                continue;
            }
            for leaf in category.leaves().into_iter().filter(|l| l.is_on(account)) {
                match leaf.financing() {
                    Financing::Recurring => flows.recurring_costs += leaf.amount,
                    Financing::OneOff => flows.one_off_costs += leaf.amount,
                }
            }
        }
        flows
    }

    pub fn total_costs(&self) -> Money {
        self.recurring_costs + self.one_off_costs
    }
}

/// Closing balance: starting balance plus savings minus every cost
pub fn final_balance<'c>(
    account: &AccountName,
    categories: impl IntoIterator<Item = &'c BudgetCategory>,
    starting_balance: Money,
) -> Money {
    let flows = AccountFlows::collect(account, categories);
    starting_balance + flows.savings - flows.total_costs()
}

/// Projected balance when recurring costs are refilled by the cost budget
pub fn budget_deposit_balance<'c>(
    account: &AccountName,
    categories: impl IntoIterator<Item = &'c BudgetCategory>,
    starting_balance: Money,
) -> Money {
    let flows = AccountFlows::collect(account, categories);
    starting_balance + flows.savings + flows.recurring_costs - flows.one_off_costs
}

/// Accounts relevant to a snapshot: configured ones, ones with balance
/// records, and ones referenced by categories
pub fn accounts_in(snapshot: &MonthSnapshot, configured: &[AccountName]) -> BTreeSet<AccountName> {
    let mut accounts: BTreeSet<AccountName> = configured.iter().cloned().collect();
    accounts.extend(snapshot.balances.keys().cloned());
    for category in snapshot.all_categories() {
        accounts.extend(category.account.iter().cloned());
        for sub in &category.sub_categories {
            accounts.extend(sub.account.iter().cloned());
        }
    }
    accounts
}

/// Outcome of recomputing one account's final balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalBalanceUpdate {
    pub account: AccountName,
    pub starting_balance: Estimate,
    pub previous: Option<Money>,
    pub final_balance: Money,
}

impl FinalBalanceUpdate {
    /// Whether an already-recorded figure was replaced by a different one
    pub fn overwrote_recorded(&self) -> bool {
        matches!(self.previous, Some(previous) if previous != self.final_balance)
    }
}

/// Reconciler reading prior months from a store
pub struct AccountReconciler<'a, S: BudgetPeriodStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BudgetPeriodStore + ?Sized> AccountReconciler<'a, S> {
    /// Create a reconciler over a store
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Estimate `account`'s starting balance for `month` from earlier months
    ///
    /// 1. The previous month's recorded final balance.
    /// 2. The previous month's final balance computed from its entered
    ///    starting balance, if it has one.
    /// 3. The month before that's recorded final balance, carried through the
    ///    previous month's categories.
    /// 4. Otherwise unavailable.
    ///
    /// A recorded final balance that itself rests on an unavailable estimate
    /// keeps the `Unavailable` source, so a chain of months without any
    /// entered figure still reports that no real estimate exists.
    pub fn estimated_starting_balance(
        &self,
        account: &AccountName,
        month: MonthKey,
    ) -> HushallResult<Estimate> {
        let Some(previous_key) = month.checked_previous() else {
            return Ok(Estimate::unavailable());
        };
        let previous = self.store.get(previous_key)?;

        if let Some(previous) = &previous {
            if let Some(record) = previous.balance(account) {
                if let Some(recorded) = record.final_balance {
                    return Ok(Estimate::new(
                        recorded,
                        carried(record, EstimateSource::PreviousMonth),
                    ));
                }
                if let Some(actual) = record.actual_starting_balance() {
                    let amount = final_balance(account, previous.all_categories(), actual);
                    return Ok(Estimate::new(amount, EstimateSource::PreviousMonth));
                }
            }
        }

        let before_previous = match previous_key.checked_previous() {
            Some(key) => self.store.get(key)?,
            None => None,
        };
        let stand_in = before_previous.as_ref().and_then(|snapshot| {
            let record = snapshot.balance(account)?;
            let recorded = record.final_balance?;
            Some((recorded, carried(record, EstimateSource::Reconstructed)))
        });

        match stand_in {
            Some((stand_in, source)) => {
                let amount = match &previous {
                    Some(previous) => final_balance(account, previous.all_categories(), stand_in),
                    None => stand_in,
                };
                debug!(
                    month = %month,
                    account = %account,
                    amount = %amount,
                    "Reconstructed previous month's final balance"
                );
                Ok(Estimate::new(amount, source))
            }
            None => {
                warn!(
                    month = %month,
                    account = %account,
                    "No starting balance estimate available"
                );
                Ok(Estimate::unavailable())
            }
        }
    }

    /// The entered starting balance for `snapshot`, or an estimate
    pub fn starting_balance(
        &self,
        account: &AccountName,
        snapshot: &MonthSnapshot,
    ) -> HushallResult<Estimate> {
        match snapshot
            .balance(account)
            .and_then(|record| record.actual_starting_balance())
        {
            Some(actual) => Ok(Estimate::actual(actual)),
            None => self.estimated_starting_balance(account, snapshot.month),
        }
    }

    /// Budget-deposit projection of `account`'s balance at the end of `month`
    ///
    /// A month missing from the store has no categories, so its projection
    /// equals its estimated starting balance.
    pub fn estimated_final_balance(
        &self,
        account: &AccountName,
        month: MonthKey,
    ) -> HushallResult<Money> {
        let snapshot = self
            .store
            .get(month)?
            .unwrap_or_else(|| MonthSnapshot::new(month));
        let starting = self.starting_balance(account, &snapshot)?;
        Ok(budget_deposit_balance(
            account,
            snapshot.all_categories(),
            starting.amount,
        ))
    }

    /// Recompute and record final balances for every relevant account
    ///
    /// Estimated starting balances are rewritten alongside the final balance
    /// they produce; entered starting balances are left as they are.
    pub fn reconcile(
        &self,
        snapshot: &mut MonthSnapshot,
        configured: &[AccountName],
    ) -> HushallResult<Vec<FinalBalanceUpdate>> {
        let mut updates = Vec::new();

        for account in accounts_in(snapshot, configured) {
            let starting_balance = self.starting_balance(&account, snapshot)?;
            let amount =
                final_balance(&account, snapshot.all_categories(), starting_balance.amount);
            let previous = snapshot.balance_mut(&account).record(starting_balance, amount);

            updates.push(FinalBalanceUpdate {
                account,
                starting_balance,
                previous,
                final_balance: amount,
            });
        }

        Ok(updates)
    }
}

/// Source for an estimate carried from `record`'s final balance
fn carried(record: &AccountBalanceRecord, source: EstimateSource) -> EstimateSource {
    if record.is_unfounded() {
        EstimateSource::Unavailable
    } else {
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn key(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn account() -> AccountName {
        AccountName::from("A")
    }

    /// Savings 200, costs 150, all on account "A"
    fn with_ledger(month: MonthKey) -> MonthSnapshot {
        let mut snapshot = MonthSnapshot::new(month);
        snapshot
            .shared_savings
            .push(BudgetCategory::savings("Spar", Money::from_kronor(200)).with_account("A"));
        snapshot.shared_costs.push(
            BudgetCategory::cost("Räkningar")
                .with_sub(
                    BudgetCategory::cost_item("El", Money::from_kronor(100)).with_account("A"),
                )
                .with_sub(
                    BudgetCategory::cost_item("Tandläkare", Money::from_kronor(50))
                        .with_account("A")
                        .with_financing(Financing::OneOff),
                )
                .with_sub(
                    BudgetCategory::cost_item("Annat konto", Money::from_kronor(999))
                        .with_account("B"),
                ),
        );
        snapshot
    }

    #[test]
    fn test_flows_split_by_financing() {
        let snapshot = with_ledger(key(2025, 1));
        let flows = AccountFlows::collect(&account(), snapshot.all_categories());
        assert_eq!(flows.savings, Money::from_kronor(200));
        assert_eq!(flows.recurring_costs, Money::from_kronor(100));
        assert_eq!(flows.one_off_costs, Money::from_kronor(50));
    }

    #[test]
    fn test_final_balance_vs_budget_deposit_balance() {
        let snapshot = with_ledger(key(2025, 1));
        let start = Money::from_kronor(1000);
        assert_eq!(
            final_balance(&account(), snapshot.all_categories(), start),
            Money::from_kronor(1050)
        );
        assert_eq!(
            budget_deposit_balance(&account(), snapshot.all_categories(), start),
            Money::from_kronor(1000 + 200 + 100 - 50)
        );
    }

    #[test]
    fn test_untagged_lines_are_ignored() {
        let mut snapshot = MonthSnapshot::new(key(2025, 1));
        snapshot
            .shared_costs
            .push(BudgetCategory::cost_item("Mat", Money::from_kronor(6000)));
        assert_eq!(
            final_balance(&account(), snapshot.all_categories(), Money::from_kronor(10)),
            Money::from_kronor(10)
        );
    }

    #[test]
    fn test_reconciliation_chain() {
        let mut month1 = with_ledger(key(2025, 1));
        month1.balances.insert(account(), AccountBalanceRecord::actual(Money::from_kronor(1000)));
        let store = MemoryStore::with_snapshots(vec![month1.clone()]);
        let reconciler = AccountReconciler::new(&store);

        let updates = reconciler.reconcile(&mut month1, &[]).unwrap();
        let update = updates.iter().find(|u| u.account == account()).unwrap();
        assert_eq!(update.final_balance, Money::from_kronor(1050));
        assert_eq!(update.starting_balance, Estimate::actual(Money::from_kronor(1000)));
        store.set(month1.month, month1).unwrap();

        let estimate = reconciler
            .estimated_starting_balance(&account(), key(2025, 2))
            .unwrap();
        assert_eq!(
            estimate,
            Estimate::new(Money::from_kronor(1050), EstimateSource::PreviousMonth)
        );
    }

    #[test]
    fn test_previous_actual_used_before_recorded_final() {
        let mut month1 = with_ledger(key(2025, 1));
        month1.balances.insert(account(), AccountBalanceRecord::actual(Money::from_kronor(1000)));
        let store = MemoryStore::with_snapshots(vec![month1]);
        let reconciler = AccountReconciler::new(&store);

        let estimate = reconciler
            .estimated_starting_balance(&account(), key(2025, 2))
            .unwrap();
        assert_eq!(estimate.amount, Money::from_kronor(1050));
    }

    #[test]
    fn test_two_step_fallback_reconstructs_previous_month() {
        let mut month0 = MonthSnapshot::new(key(2024, 12));
        month0.balance_mut(&account()).final_balance = Some(Money::from_kronor(1000));
        // Month 1 has categories but neither an entered nor a recorded balance.
        let month1 = with_ledger(key(2025, 1));
        let store = MemoryStore::with_snapshots(vec![month0, month1]);
        let reconciler = AccountReconciler::new(&store);

        let estimate = reconciler
            .estimated_starting_balance(&account(), key(2025, 2))
            .unwrap();
        assert_eq!(estimate.source, EstimateSource::Reconstructed);
        assert_eq!(estimate.amount, Money::from_kronor(1050));
    }

    #[test]
    fn test_fallback_without_previous_snapshot_carries_stand_in() {
        let mut month0 = MonthSnapshot::new(key(2024, 12));
        month0.balance_mut(&account()).final_balance = Some(Money::from_kronor(700));
        let store = MemoryStore::with_snapshots(vec![month0]);
        let reconciler = AccountReconciler::new(&store);

        let estimate = reconciler
            .estimated_starting_balance(&account(), key(2025, 2))
            .unwrap();
        assert_eq!(estimate, Estimate::new(Money::from_kronor(700), EstimateSource::Reconstructed));
    }

    #[test]
    fn test_no_data_is_unavailable() {
        let store = MemoryStore::new();
        let reconciler = AccountReconciler::new(&store);
        let estimate = reconciler
            .estimated_starting_balance(&account(), key(2025, 2))
            .unwrap();
        assert!(!estimate.is_available());
        assert!(estimate.amount.is_zero());
    }

    #[test]
    fn test_estimated_final_balance_uses_estimate() {
        let mut month1 = with_ledger(key(2025, 1));
        month1.balance_mut(&account()).final_balance = Some(Money::from_kronor(1050));
        let month2 = with_ledger(key(2025, 2));
        let store = MemoryStore::with_snapshots(vec![month1, month2]);
        let reconciler = AccountReconciler::new(&store);

        let projected = reconciler
            .estimated_final_balance(&account(), key(2025, 2))
            .unwrap();
        assert_eq!(projected, Money::from_kronor(1050 + 200 + 100 - 50));

        // March is not stored: February's close is rebuilt from January's
        // recorded figure, and an empty month projects no change.
        let march_start = reconciler
            .estimated_starting_balance(&account(), key(2025, 3))
            .unwrap();
        assert_eq!(
            march_start,
            Estimate::new(Money::from_kronor(1100), EstimateSource::Reconstructed)
        );
        let march = reconciler
            .estimated_final_balance(&account(), key(2025, 3))
            .unwrap();
        assert_eq!(march, Money::from_kronor(1100));
    }

    #[test]
    fn test_reconcile_reports_overwrites() {
        let mut month1 = with_ledger(key(2025, 1));
        let record = month1.balance_mut(&account());
        record.set_actual(Money::from_kronor(1000));
        record.final_balance = Some(Money::from_kronor(1));
        let store = MemoryStore::new();
        let reconciler = AccountReconciler::new(&store);

        let updates = reconciler.reconcile(&mut month1, &[]).unwrap();
        let update = updates.iter().find(|u| u.account == account()).unwrap();
        assert!(update.overwrote_recorded());
        assert_eq!(month1.recorded_final_balance(&account()), Some(Money::from_kronor(1050)));
        // Entered starting balance untouched.
        assert_eq!(
            month1.balance(&account()).unwrap().actual_starting_balance(),
            Some(Money::from_kronor(1000))
        );
    }

    #[test]
    fn test_reconcile_rewrites_estimated_starting_balance() {
        let mut month1 = with_ledger(key(2025, 1));
        month1.balance_mut(&account()).set_actual(Money::from_kronor(2000));
        month1.balance_mut(&account()).final_balance = Some(Money::from_kronor(2050));
        let mut month2 = with_ledger(key(2025, 2));
        month2.balance_mut(&account()).record(
            Estimate::new(Money::from_kronor(1050), EstimateSource::PreviousMonth),
            Money::from_kronor(1100),
        );
        let store = MemoryStore::with_snapshots(vec![month1]);
        let reconciler = AccountReconciler::new(&store);

        reconciler.reconcile(&mut month2, &[]).unwrap();
        let record = month2.balance(&account()).unwrap();
        assert_eq!(record.starting_balance, Money::from_kronor(2050));
        assert_eq!(record.final_balance, Some(Money::from_kronor(2100)));
        assert_eq!(record.estimate_source, Some(EstimateSource::PreviousMonth));
    }

    #[test]
    fn test_unfounded_final_balance_stays_unavailable() {
        let mut month1 = with_ledger(key(2025, 1));
        month1
            .balance_mut(&account())
            .record(Estimate::unavailable(), Money::from_kronor(50));
        let store = MemoryStore::with_snapshots(vec![month1]);
        let reconciler = AccountReconciler::new(&store);

        let february = reconciler
            .estimated_starting_balance(&account(), key(2025, 2))
            .unwrap();
        assert_eq!(february.amount, Money::from_kronor(50));
        assert!(!february.is_available());

        // Two months on, the rebuilt figure is still unfounded.
        let march = reconciler
            .estimated_starting_balance(&account(), key(2025, 3))
            .unwrap();
        assert_eq!(march, Estimate::new(Money::from_kronor(50), EstimateSource::Unavailable));
    }

    #[test]
    fn test_first_supported_month_has_no_estimate() {
        let mut first = with_ledger(key(1, 1));
        first.balance_mut(&account()).final_balance = Some(Money::from_kronor(10));
        let store = MemoryStore::with_snapshots(vec![first]);
        let reconciler = AccountReconciler::new(&store);

        let estimate = reconciler
            .estimated_starting_balance(&account(), key(1, 1))
            .unwrap();
        assert_eq!(estimate, Estimate::unavailable());
    }

    #[test]
    fn test_accounts_in_collects_all_sources() {
        let snapshot = with_ledger(key(2025, 1));
        let accounts = accounts_in(&snapshot, &[AccountName::from("C")]);
        let names: Vec<_> = accounts.iter().map(|a| a.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
