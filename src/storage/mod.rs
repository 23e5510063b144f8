//! Storage layer
//!
//! The engine reads and writes whole month snapshots through the
//! [`BudgetPeriodStore`] trait. Two implementations are provided: an
//! in-memory map and a JSON file with atomic writes.

pub mod file_io;
pub mod memory;
pub mod months;

pub use file_io::{read_json, write_json_atomic};
pub use memory::MemoryStore;
pub use months::JsonFileStore;

use crate::error::{HushallError, HushallResult};
use crate::models::{MonthKey, MonthSnapshot};

/// Keyed store of month snapshots
///
/// Writes are per key and replace the whole snapshot; the last write wins.
pub trait BudgetPeriodStore {
    /// The snapshot stored for `key`, if any
    fn get(&self, key: MonthKey) -> HushallResult<Option<MonthSnapshot>>;

    /// Store `snapshot` under `key`
    fn set(&self, key: MonthKey, snapshot: MonthSnapshot) -> HushallResult<()>;

    /// All stored keys in ascending order
    fn keys(&self) -> HushallResult<Vec<MonthKey>>;

    fn contains(&self, key: MonthKey) -> HushallResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// The latest stored month strictly before `key`
    fn nearest_before(&self, key: MonthKey) -> HushallResult<Option<MonthKey>> {
        Ok(self.keys()?.into_iter().filter(|k| *k < key).next_back())
    }

    /// The earliest stored month strictly after `key`
    fn nearest_after(&self, key: MonthKey) -> HushallResult<Option<MonthKey>> {
        Ok(self.keys()?.into_iter().find(|k| *k > key))
    }
}

/// Reject snapshots filed under the wrong key
pub(crate) fn check_key(key: MonthKey, snapshot: &MonthSnapshot) -> HushallResult<()> {
    if snapshot.month != key {
        return Err(HushallError::Validation(format!(
            "Snapshot for {} cannot be stored under {}",
            snapshot.month, key
        )));
    }
    Ok(())
}
