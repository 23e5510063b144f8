//! Audit log of month writes
//!
//! Month creation, balance edits, category replacements and reconciliation
//! overwrites are appended to a JSONL log with before/after values.
//!
//! - `AuditEntry`: one write, with timestamp, month and optional values.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//! - `generate_diff`: summarizes the change between two serialized states.

mod diff;
mod entry;
mod logger;

pub use diff::{diff_paths, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
