//! Configuration: where data lives and the user's settings

pub mod paths;
pub mod settings;

pub use paths::HushallPaths;
pub use settings::{SeedStrategy, Settings};
