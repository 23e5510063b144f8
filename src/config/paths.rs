//! Path management for the household budget
//!
//! ## Path Resolution Order
//!
//! 1. `HUSHALL_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/hushall` or `~/.config/hushall`
//! 3. Windows: `%APPDATA%\hushall`

use std::path::PathBuf;

use crate::error::{HushallError, HushallResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "HUSHALL_DATA_DIR";

const APP_DIR: &str = "hushall";

/// All paths used by the budget engine
#[derive(Debug, Clone)]
pub struct HushallPaths {
    base_dir: PathBuf,
}

impl HushallPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns a config error if no home or app-data directory can be found.
    pub fn new() -> HushallResult<Self> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Monthly data lives here
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default target for CSV exports
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// All month snapshots
    pub fn months_file(&self) -> PathBuf {
        self.data_dir().join("months.json")
    }

    /// Create the base, data and export directories
    pub fn ensure_directories(&self) -> HushallResult<()> {
        for (label, dir) in [
            ("base", self.base_dir.clone()),
            ("data", self.data_dir()),
            ("export", self.export_dir()),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                HushallError::Io(format!("Failed to create {} directory: {}", label, e))
            })?;
        }
        Ok(())
    }

    /// Whether settings have ever been saved
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> HushallResult<PathBuf> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                HushallError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> HushallResult<PathBuf> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| HushallError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}
