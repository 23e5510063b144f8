//! Account Projection Report
//!
//! Projects each account's balance forward month by month. A month without
//! an entered starting balance starts from the previous month's projected
//! close, so the chain shows where the accounts are heading if the plan
//! holds.

use crate::error::HushallResult;
use crate::models::{AccountName, Estimate, EstimateSource, Money, MonthKey, MonthSnapshot};
use crate::services::reconciliation::{budget_deposit_balance, AccountReconciler};
use crate::storage::BudgetPeriodStore;

/// One account in one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionRow {
    pub month: MonthKey,
    pub starting_balance: Estimate,
    pub estimated_final_balance: Money,
    /// False when the month has no stored plan yet
    pub has_snapshot: bool,
}

/// Projection rows for a single account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProjection {
    pub account: AccountName,
    pub rows: Vec<ProjectionRow>,
}

impl AccountProjection {
    /// The projected balance after the last month
    pub fn closing(&self) -> Option<Money> {
        self.rows.last().map(|row| row.estimated_final_balance)
    }
}

/// Forward projection for several accounts
#[derive(Debug, Clone)]
pub struct AccountProjectionReport {
    pub from: MonthKey,
    pub months: usize,
    pub accounts: Vec<AccountProjection>,
}

impl AccountProjectionReport {
    /// Project `accounts` over `months` months starting at `from`
    pub fn generate<S: BudgetPeriodStore + ?Sized>(
        store: &S,
        accounts: &[AccountName],
        from: MonthKey,
        months: usize,
    ) -> HushallResult<Self> {
        let reconciler = AccountReconciler::new(store);
        let keys = from.range(months);

        let mut snapshots = Vec::with_capacity(keys.len());
        for key in &keys {
            snapshots.push(store.get(*key)?);
        }

        let mut projections = Vec::with_capacity(accounts.len());
        for account in accounts {
            let mut rows: Vec<ProjectionRow> = Vec::with_capacity(keys.len());

            for (key, stored) in keys.iter().zip(&snapshots) {
                let has_snapshot = stored.is_some();
                let empty;
                let snapshot = match stored {
                    Some(snapshot) => snapshot,
                    None => {
                        empty = MonthSnapshot::new(*key);
                        &empty
                    }
                };

                let actual = snapshot
                    .balance(account)
                    .and_then(|record| record.actual_starting_balance());
                let starting_balance = match (actual, rows.last()) {
                    (Some(actual), _) => Estimate::actual(actual),
                    (None, Some(previous)) => Estimate::new(
                        previous.estimated_final_balance,
                        carried_source(previous.starting_balance.source),
                    ),
                    (None, None) => reconciler.starting_balance(account, snapshot)?,
                };

                rows.push(ProjectionRow {
                    month: *key,
                    estimated_final_balance: budget_deposit_balance(
                        account,
                        snapshot.all_categories(),
                        starting_balance.amount,
                    ),
                    starting_balance,
                    has_snapshot,
                });
            }

            projections.push(AccountProjection {
                account: account.clone(),
                rows,
            });
        }

        Ok(Self {
            from,
            months,
            accounts: projections,
        })
    }

    pub fn account(&self, account: &AccountName) -> Option<&AccountProjection> {
        self.accounts.iter().find(|p| &p.account == account)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Account Projection from {}\n", self.from));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        for projection in &self.accounts {
            output.push_str(&format!("\n{}\n", projection.account));
            output.push_str(&format!(
                "{:<10} {:>18} {:>18}\n",
                "Month", "Starting", "Projected close"
            ));
            output.push_str(&"-".repeat(60));
            output.push('\n');

            for row in &projection.rows {
                let marker = if row.has_snapshot { ' ' } else { '*' };
                output.push_str(&format!(
                    "{}{:<9} {:>18} {:>18}\n",
                    marker,
                    row.month,
                    row.starting_balance.to_string(),
                    row.estimated_final_balance.to_string()
                ));
            }
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str("* = month not planned yet\n");
        output
    }
}

// An unavailable first estimate taints everything projected from it.
fn carried_source(previous: EstimateSource) -> EstimateSource {
    match previous {
        EstimateSource::Unavailable => EstimateSource::Unavailable,
        _ => EstimateSource::PreviousMonth,
    }
}
