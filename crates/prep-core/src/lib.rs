//! prep-core: shared foundations for the prep query extractor.
//!
//! - Errors: one `thiserror` enum per subsystem plus a pipeline aggregate
//! - Config: TOML-based layered configuration
//! - Tracing: `PREP_LOG`-driven subscriber setup
//! - Types: collection aliases used across the workspace

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::PrepConfig;
pub use errors::{PipelineError, PrepErrorCode};
