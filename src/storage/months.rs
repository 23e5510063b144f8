//! Month snapshot repository for JSON storage
//!
//! All months live in one `months.json` file. The repository keeps them in
//! memory and rewrites the file on every [`BudgetPeriodStore::set`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::file_io::{read_json, write_json_atomic};
use super::{check_key, BudgetPeriodStore};
use crate::error::{HushallError, HushallResult};
use crate::models::{MonthKey, MonthSnapshot};

const MONTHS_SCHEMA_VERSION: u32 = 1;

/// Serializable file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonthsData {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    #[serde(default)]
    months: Vec<MonthSnapshot>,
}

fn default_schema_version() -> u32 {
    MONTHS_SCHEMA_VERSION
}

impl Default for MonthsData {
    fn default() -> Self {
        Self {
            schema_version: MONTHS_SCHEMA_VERSION,
            months: Vec::new(),
        }
    }
}

/// A [`BudgetPeriodStore`] persisted to a JSON file
pub struct JsonFileStore {
    path: PathBuf,
    months: RwLock<BTreeMap<MonthKey, MonthSnapshot>>,
}

impl JsonFileStore {
    /// Create a store for `path`; call [`JsonFileStore::load`] to read it
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            months: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store and load whatever is on disk
    pub fn open(path: PathBuf) -> HushallResult<Self> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load months from disk, replacing what is in memory
    pub fn load(&self) -> HushallResult<()> {
        let file_data: MonthsData = read_json(&self.path)?;
        if file_data.schema_version > MONTHS_SCHEMA_VERSION {
            return Err(HushallError::Storage(format!(
                "{} has schema version {}, newer than supported {}",
                self.path.display(),
                file_data.schema_version,
                MONTHS_SCHEMA_VERSION
            )));
        }

        let mut months = self.months.write().map_err(lock_err)?;
        months.clear();
        for snapshot in file_data.months {
            months.insert(snapshot.month, snapshot);
        }

        debug!(path = %self.path.display(), count = months.len(), "Loaded month snapshots");
        Ok(())
    }

    /// Write all months to disk
    pub fn save(&self) -> HushallResult<()> {
        let months = self.months.read().map_err(lock_err)?;
        let file_data = MonthsData {
            schema_version: MONTHS_SCHEMA_VERSION,
            months: months.values().cloned().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }
}

fn lock_err(e: impl std::fmt::Display) -> HushallError {
    HushallError::Storage(format!("Failed to acquire lock: {}", e))
}

impl BudgetPeriodStore for JsonFileStore {
    fn get(&self, key: MonthKey) -> HushallResult<Option<MonthSnapshot>> {
        let months = self.months.read().map_err(lock_err)?;
        Ok(months.get(&key).cloned())
    }

    fn set(&self, key: MonthKey, snapshot: MonthSnapshot) -> HushallResult<()> {
        check_key(key, &snapshot)?;
        {
            let mut months = self.months.write().map_err(lock_err)?;
            months.insert(key, snapshot);
        }
        self.save()
    }

    fn keys(&self) -> HushallResult<Vec<MonthKey>> {
        let months = self.months.read().map_err(lock_err)?;
        Ok(months.keys().copied().collect())
    }
}
