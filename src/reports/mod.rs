//! Reports built on top of stored months

pub mod account_projection;

pub use account_projection::{AccountProjection, AccountProjectionReport, ProjectionRow};
