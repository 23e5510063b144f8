//! Export module
//!
//! - CSV: month account balances, holiday lists and projections
//! - JSON: every stored month, restorable into a store

pub mod csv;
pub mod json;

pub use self::csv::{
    export_holidays_csv, export_month_report_csv, export_projection_csv, format_amount,
};
pub use self::json::{
    export_full_json, import_from_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION,
};
