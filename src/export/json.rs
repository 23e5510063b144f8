//! JSON export of every stored month, with schema versioning
//!
//! The export is also the restore format: [`import_from_json`] validates a
//! previous export and [`FullExport::restore_into`] writes it to a store.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HushallError, HushallResult};
use crate::models::{MonthKey, MonthSnapshot};
use crate::storage::BudgetPeriodStore;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Crate version that wrote the export
    pub app_version: String,
    pub months: Vec<MonthSnapshot>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub month_count: usize,
    /// Distinct accounts with a balance record in any month
    pub account_count: usize,
    pub earliest_month: Option<MonthKey>,
    pub latest_month: Option<MonthKey>,
}

impl FullExport {
    /// Collect every month from `store`, oldest first
    pub fn from_store<S: BudgetPeriodStore + ?Sized>(store: &S) -> HushallResult<Self> {
        let mut months = Vec::new();
        for key in store.keys()? {
            if let Some(snapshot) = store.get(key)? {
                months.push(snapshot);
            }
        }

        let accounts: BTreeSet<_> = months
            .iter()
            .flat_map(|snapshot| snapshot.balances.keys())
            .collect();

        let metadata = ExportMetadata {
            month_count: months.len(),
            account_count: accounts.len(),
            earliest_month: months.first().map(|s| s.month),
            latest_month: months.last().map(|s| s.month),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            months,
            metadata,
        })
    }

    /// Check the schema version, duplicate months and each month's data
    pub fn validate(&self) -> HushallResult<()> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(HushallError::Validation(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            )));
        }

        let mut seen = BTreeSet::new();
        for snapshot in &self.months {
            if !seen.insert(snapshot.month) {
                return Err(HushallError::Validation(format!(
                    "Month {} appears more than once",
                    snapshot.month
                )));
            }
            snapshot.validate()?;
        }

        Ok(())
    }

    /// Write every month into `store`, replacing months with the same key
    pub fn restore_into<S: BudgetPeriodStore + ?Sized>(&self, store: &S) -> HushallResult<usize> {
        for snapshot in &self.months {
            store.set(snapshot.month, snapshot.clone())?;
        }
        info!(months = self.months.len(), "Restored months from export");
        Ok(self.months.len())
    }
}

/// Export all months as JSON
pub fn export_full_json<S, W>(store: &S, writer: W, pretty: bool) -> HushallResult<()>
where
    S: BudgetPeriodStore + ?Sized,
    W: Write,
{
    let export = FullExport::from_store(store)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| HushallError::Export(e.to_string()))
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> HushallResult<FullExport> {
    let export: FullExport = serde_json::from_str(json_str)
        .map_err(|e| HushallError::Validation(format!("Invalid export: {}", e)))?;
    export.validate()?;
    Ok(export)
}
