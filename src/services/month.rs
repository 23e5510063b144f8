//! Month service
//!
//! Opening a month, switching to it, and the edits that change its
//! balances. Switching runs in two phases:
//!
//! 1. Reconcile the previous month: recompute and store its final balances.
//! 2. Estimate the current month: fill in starting balances that were not
//!    entered, compute final balances and the budget, and store the result.
//!
//! Phase 1 writes to a month the user did not open. It can be turned off
//! with [`Settings::reconcile_on_switch`], and any change to an already
//! recorded figure is logged and audited.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::{SeedStrategy, Settings};
use crate::error::{HushallError, HushallResult};
use crate::models::{
    AccountBalanceRecord, AccountBalanceSummary, AccountName, BudgetCategory, BudgetWarning,
    CalculationOutcome, Money, MonthKey, MonthSnapshot,
};
use crate::services::budget::calculate;
use crate::services::reconciliation::{
    accounts_in, budget_deposit_balance, final_balance, AccountReconciler, FinalBalanceUpdate,
};
use crate::storage::BudgetPeriodStore;

/// Everything shown after switching to a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    pub key: MonthKey,
    pub outcome: CalculationOutcome,
    pub accounts: Vec<AccountBalanceSummary>,
}

impl MonthReport {
    pub fn warnings(&self) -> &[BudgetWarning] {
        &self.outcome.warnings
    }

    pub fn account(&self, account: &AccountName) -> Option<&AccountBalanceSummary> {
        self.accounts.iter().find(|summary| &summary.account == account)
    }
}

/// Service for month lifecycle operations
pub struct MonthService<'a, S: BudgetPeriodStore + ?Sized> {
    store: &'a S,
    settings: &'a Settings,
    audit: Option<AuditLogger>,
}

impl<'a, S: BudgetPeriodStore + ?Sized> MonthService<'a, S> {
    pub fn new(store: &'a S, settings: &'a Settings) -> Self {
        Self {
            store,
            settings,
            audit: None,
        }
    }

    /// Record writes in `logger` when auditing is enabled in settings
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// The stored snapshot for `key`, creating it with `seed` on first access
    pub fn open(&self, key: MonthKey, seed: SeedStrategy) -> HushallResult<MonthSnapshot> {
        if let Some(existing) = self.store.get(key)? {
            return Ok(existing);
        }

        let snapshot = match seed {
            SeedStrategy::Empty => self.empty_month(key),
            SeedStrategy::CopyNearest => {
                let source_key = match self.store.nearest_before(key)? {
                    Some(before) => Some(before),
                    None => self.store.nearest_after(key)?,
                };
                let source = match source_key {
                    Some(source_key) => self.store.get(source_key)?,
                    None => None,
                };
                match source {
                    Some(source) => {
                        debug!(month = %key, source = %source.month, "Seeding month from nearest");
                        MonthSnapshot::seeded_from(key, &source)
                    }
                    None => self.empty_month(key),
                }
            }
        };

        self.store.set(key, snapshot.clone())?;
        self.audit(AuditEntry::create(EntityType::Month, key, None, &snapshot))?;
        info!(month = %key, seed = ?seed, "Created month");

        Ok(snapshot)
    }

    /// The stored snapshot for `key`, creating it from `template` on first
    /// access
    ///
    /// The template's month is ignored; only its plan is copied.
    pub fn open_with_template(
        &self,
        key: MonthKey,
        template: &MonthSnapshot,
    ) -> HushallResult<MonthSnapshot> {
        if let Some(existing) = self.store.get(key)? {
            return Ok(existing);
        }

        template.validate()?;
        let snapshot = MonthSnapshot::seeded_from(key, template);
        self.store.set(key, snapshot.clone())?;
        self.audit(AuditEntry::create(EntityType::Month, key, None, &snapshot))?;
        info!(month = %key, "Created month from template");

        Ok(snapshot)
    }

    fn empty_month(&self, key: MonthKey) -> MonthSnapshot {
        let mut snapshot = MonthSnapshot::new(key);
        snapshot.rates = self.settings.default_rates();
        snapshot
    }

    /// Phase 1: recompute and store the previous month's final balances
    ///
    /// Does nothing when the previous month does not exist or reconciling on
    /// switch is disabled.
    pub fn reconcile_previous(&self, key: MonthKey) -> HushallResult<Vec<FinalBalanceUpdate>> {
        let Some(previous_key) = key.checked_previous() else {
            return Ok(Vec::new());
        };
        if !self.settings.reconcile_on_switch {
            debug!(month = %previous_key, "Reconcile on switch disabled");
            return Ok(Vec::new());
        }

        let Some(mut previous) = self.store.get(previous_key)? else {
            return Ok(Vec::new());
        };

        let reconciler = AccountReconciler::new(self.store);
        let updates = reconciler.reconcile(&mut previous, &self.settings.accounts)?;

        self.store.set(previous_key, previous)?;

        for update in updates.iter().filter(|u| u.overwrote_recorded()) {
            warn!(
                month = %previous_key,
                account = %update.account,
                before = ?update.previous,
                after = %update.final_balance,
                "Recorded final balance changed"
            );
            self.audit(final_balance_entry(previous_key, update))?;
        }

        debug!(month = %previous_key, accounts = updates.len(), "Reconciled previous month");
        Ok(updates)
    }

    /// Phase 2: estimate balances and compute the budget for `key`
    pub fn estimate_current(&self, key: MonthKey, today: NaiveDate) -> HushallResult<MonthReport> {
        let snapshot = self.open(key, self.settings.new_month_seed)?;
        self.recompute(snapshot, today)
    }

    /// Switch to `key`: reconcile the previous month, then estimate this one
    pub fn switch_to(&self, key: MonthKey, today: NaiveDate) -> HushallResult<MonthReport> {
        info!(month = %key, "Switching month");
        self.reconcile_previous(key)?;
        self.estimate_current(key, today)
    }

    /// Enter the known starting balance for an account
    pub fn set_starting_balance(
        &self,
        key: MonthKey,
        account: &AccountName,
        amount: Money,
        today: NaiveDate,
    ) -> HushallResult<MonthReport> {
        let mut snapshot = self.existing(key)?;
        let before = snapshot.balance(account).copied().unwrap_or_default();
        snapshot.balance_mut(account).set_actual(amount);
        let entry = balance_edit_entry(key, account, &before, &snapshot);

        let report = self.recompute(snapshot, today)?;
        self.audit(entry)?;
        Ok(report)
    }

    /// Forget an entered starting balance so it is estimated again
    pub fn clear_starting_balance(
        &self,
        key: MonthKey,
        account: &AccountName,
        today: NaiveDate,
    ) -> HushallResult<MonthReport> {
        let mut snapshot = self.existing(key)?;
        let before = snapshot.balance(account).copied().unwrap_or_default();
        snapshot.balance_mut(account).clear_actual();
        let entry = balance_edit_entry(key, account, &before, &snapshot);

        let report = self.recompute(snapshot, today)?;
        self.audit(entry)?;
        Ok(report)
    }

    /// Replace the month's shared category lists
    pub fn replace_categories(
        &self,
        key: MonthKey,
        shared_costs: Vec<BudgetCategory>,
        shared_savings: Vec<BudgetCategory>,
        today: NaiveDate,
    ) -> HushallResult<MonthReport> {
        for category in shared_costs.iter().chain(&shared_savings) {
            category
                .validate()
                .map_err(|e| HushallError::Validation(e.to_string()))?;
        }

        let mut snapshot = self.existing(key)?;
        let before = (snapshot.shared_costs.clone(), snapshot.shared_savings.clone());
        snapshot.shared_costs = shared_costs;
        snapshot.shared_savings = shared_savings;

        let after = (&snapshot.shared_costs, &snapshot.shared_savings);
        let diff = diff_of(&before, &after);
        let entry = AuditEntry::update(
            EntityType::Categories,
            key,
            None,
            &serde_json::to_value(&before)?,
            &serde_json::to_value(after)?,
            diff,
        );

        let report = self.recompute(snapshot, today)?;
        self.audit(entry)?;
        Ok(report)
    }

    fn existing(&self, key: MonthKey) -> HushallResult<MonthSnapshot> {
        self.store
            .get(key)?
            .ok_or_else(|| HushallError::month_not_found(key.to_string()))
    }

    /// Fill estimates, compute final balances and the budget, then persist
    fn recompute(
        &self,
        mut snapshot: MonthSnapshot,
        today: NaiveDate,
    ) -> HushallResult<MonthReport> {
        let key = snapshot.month;
        let reconciler = AccountReconciler::new(self.store);
        let mut accounts = Vec::new();
        let mut estimate_warnings = Vec::new();

        for account in accounts_in(&snapshot, &self.settings.accounts) {
            let starting_balance = reconciler.starting_balance(&account, &snapshot)?;
            if !starting_balance.is_available() {
                estimate_warnings.push(BudgetWarning::EstimateUnavailable {
                    account: account.clone(),
                });
            }

            let start = starting_balance.amount;
            let closing = final_balance(&account, snapshot.all_categories(), start);
            let projected = budget_deposit_balance(&account, snapshot.all_categories(), start);
            snapshot.balance_mut(&account).record(starting_balance, closing);

            accounts.push(AccountBalanceSummary {
                account,
                starting_balance,
                final_balance: closing,
                estimated_final_balance: projected,
            });
        }

        let mut outcome = calculate(&snapshot, today)?;
        outcome.warnings.extend(estimate_warnings);
        snapshot.last_result = Some(outcome.result.clone());
        self.store.set(key, snapshot)?;

        debug!(month = %key, accounts = accounts.len(), "Recomputed month");
        Ok(MonthReport {
            key,
            outcome,
            accounts,
        })
    }

    fn audit(&self, entry: AuditEntry) -> HushallResult<()> {
        match &self.audit {
            Some(logger) if self.settings.audit_enabled => logger.log(&entry),
            _ => Ok(()),
        }
    }
}

fn final_balance_entry(month: MonthKey, update: &FinalBalanceUpdate) -> AuditEntry {
    let before = serde_json::json!({ "final_balance": update.previous });
    let after = serde_json::json!({ "final_balance": update.final_balance });
    AuditEntry::update(
        EntityType::AccountBalance,
        month,
        Some(update.account.to_string()),
        &before,
        &after,
        generate_diff(&before, &after),
    )
}

fn balance_edit_entry(
    month: MonthKey,
    account: &AccountName,
    before: &AccountBalanceRecord,
    snapshot: &MonthSnapshot,
) -> AuditEntry {
    let after = snapshot.balance(account).copied().unwrap_or_default();
    AuditEntry::update(
        EntityType::AccountBalance,
        month,
        Some(account.to_string()),
        before,
        &after,
        diff_of(before, &after),
    )
}

fn diff_of<B: Serialize, A: Serialize>(before: &B, after: &A) -> Option<String> {
    let before = serde_json::to_value(before).ok()?;
    let after = serde_json::to_value(after).ok()?;
    generate_diff(&before, &after)
}
