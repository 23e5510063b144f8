//! Hushåll - month-to-month household budget reconciliation
//!
//! Two earners share a household. Every month they plan shared costs and
//! savings, pay a daily transfer for each working day of the pay period
//! (25th to 24th, skipping Swedish public holidays), and split what is left
//! in proportion to income. Account balances are carried from one month to
//! the next by reconciling the previous month whenever a month is opened.
//!
//! # Architecture
//!
//! - `config`: Paths and user settings
//! - `error`: Error types
//! - `models`: Money, months, pay periods, categories, snapshots
//! - `services`: Holidays, pay period budget, allocation, reconciliation,
//!   month lifecycle
//! - `storage`: Month snapshot stores (in memory, JSON file)
//! - `audit`: Audit log of month writes
//! - `reports`: Forward account projection
//! - `export`: CSV and JSON export
//!
//! The library emits `tracing` events but never installs a subscriber.
//!
//! # Example
//!
//! ```rust,ignore
//! use hushall::config::{HushallPaths, Settings};
//! use hushall::services::MonthService;
//! use hushall::storage::JsonFileStore;
//!
//! let paths = HushallPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = JsonFileStore::open(paths.months_file())?;
//!
//! let report = MonthService::new(&store, &settings).switch_to(month, today)?;
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{HushallError, HushallResult};
