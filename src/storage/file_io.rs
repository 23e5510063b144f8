//! JSON file helpers
//!
//! Writes go to a sibling temp file which is synced and then renamed over
//! the target, so a crash leaves either the old or the new file intact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{HushallError, HushallResult};

fn storage_err(action: &str, path: &Path, err: impl std::fmt::Display) -> HushallError {
    HushallError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read JSON from `path`, or `T::default()` when the file does not exist
pub fn read_json<T, P>(path: P) -> HushallResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_err("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_err("parse", path, e))
}

/// Write `data` as pretty JSON to `path` atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> HushallResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_err("create directory", parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| storage_err("create", &temp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_err("serialize", &temp_path, e))?;
    writer
        .flush()
        .map_err(|e| storage_err("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_err("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_err("replace", path, e)
    })
}
