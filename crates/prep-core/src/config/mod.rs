//! Configuration system for prep.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod output_config;
pub mod package_config;
pub mod prep_config;

pub use output_config::OutputConfig;
pub use package_config::PackageConfig;
pub use prep_config::{CliOverrides, PrepConfig};
