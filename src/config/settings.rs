//! User settings
//!
//! The configured account set, default transfer rates and how month
//! switching behaves.

use serde::{Deserialize, Serialize};

use super::paths::HushallPaths;
use crate::error::{HushallError, HushallResult};
use crate::models::{AccountName, Money, TransferRates};

/// How a month is filled in the first time it is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeedStrategy {
    /// Start with no categories or income
    Empty,
    /// Copy the plan from the nearest existing month, earlier months first
    #[default]
    CopyNearest,
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Accounts reconciled every month, even when no category uses them
    #[serde(default)]
    pub accounts: Vec<AccountName>,

    /// Weekday transfer for months seeded empty
    #[serde(default = "default_daily_rate")]
    pub default_daily_rate: Money,

    /// Friday extra for months seeded empty
    #[serde(default = "default_friday_rate")]
    pub default_friday_rate: Money,

    #[serde(default)]
    pub new_month_seed: SeedStrategy,

    /// Recompute and store the previous month's final balances on switch
    #[serde(default = "default_true")]
    pub reconcile_on_switch: bool,

    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_daily_rate() -> Money {
    Money::from_kronor(300)
}

fn default_friday_rate() -> Money {
    Money::from_kronor(540)
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "kr".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            accounts: Vec::new(),
            default_daily_rate: default_daily_rate(),
            default_friday_rate: default_friday_rate(),
            new_month_seed: SeedStrategy::default(),
            reconcile_on_switch: true,
            audit_enabled: true,
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Rates applied to a month that starts empty
    pub fn default_rates(&self) -> TransferRates {
        TransferRates::new(self.default_daily_rate, self.default_friday_rate)
    }

    /// Add an account to the configured set, ignoring duplicates
    pub fn add_account(&mut self, account: impl Into<AccountName>) -> bool {
        let account = account.into();
        if self.accounts.contains(&account) {
            return false;
        }
        self.accounts.push(account);
        true
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &HushallPaths) -> HushallResult<Self> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not saved until the caller asks
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| HushallError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| HushallError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &HushallPaths) -> HushallResult<()> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| HushallError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| HushallError::Io(format!("Failed to write settings file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.new_month_seed, SeedStrategy::CopyNearest);
        assert!(settings.reconcile_on_switch);
        assert!(settings.audit_enabled);
        assert_eq!(settings.currency_symbol, "kr");
        assert_eq!(
            settings.default_rates(),
            TransferRates::new(Money::from_kronor(300), Money::from_kronor(540))
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HushallPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.new_month_seed = SeedStrategy::Empty;
        settings.reconcile_on_switch = false;
        assert!(settings.add_account("Gemensamt"));
        assert!(!settings.add_account("Gemensamt"));

        settings.save(&paths).unwrap();
        assert!(paths.is_initialized());

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"accounts": ["Buffert"]}"#).unwrap();
        assert_eq!(settings.accounts, vec![AccountName::from("Buffert")]);
        assert!(settings.reconcile_on_switch);
        assert_eq!(settings.default_daily_rate, Money::from_kronor(300));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = HushallPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ nope").unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(HushallError::Config(_))
        ));
    }
}
