//! In-memory month store

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{check_key, BudgetPeriodStore};
use crate::error::{HushallError, HushallResult};
use crate::models::{MonthKey, MonthSnapshot};

/// A [`BudgetPeriodStore`] backed by a `BTreeMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    months: RwLock<BTreeMap<MonthKey, MonthSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with snapshots, keyed by their own month
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = MonthSnapshot>) -> Self {
        let months = snapshots
            .into_iter()
            .map(|snapshot| (snapshot.month, snapshot))
            .collect();
        Self {
            months: RwLock::new(months),
        }
    }

    pub fn len(&self) -> usize {
        self.months.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_err(e: impl std::fmt::Display) -> HushallError {
    HushallError::Storage(format!("Failed to acquire lock: {}", e))
}

impl BudgetPeriodStore for MemoryStore {
    fn get(&self, key: MonthKey) -> HushallResult<Option<MonthSnapshot>> {
        let months = self.months.read().map_err(lock_err)?;
        Ok(months.get(&key).cloned())
    }

    fn set(&self, key: MonthKey, snapshot: MonthSnapshot) -> HushallResult<()> {
        check_key(key, &snapshot)?;
        let mut months = self.months.write().map_err(lock_err)?;
        months.insert(key, snapshot);
        Ok(())
    }

    fn keys(&self) -> HushallResult<Vec<MonthKey>> {
        let months = self.months.read().map_err(lock_err)?;
        Ok(months.keys().copied().collect())
    }
}
