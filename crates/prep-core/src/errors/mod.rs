//! Error handling for prep.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod emit_error;
pub mod error_code;
pub mod load_error;
pub mod parse_error;
pub mod pipeline_error;
pub mod resolve_error;

pub use config_error::ConfigError;
pub use emit_error::EmitError;
pub use error_code::PrepErrorCode;
pub use load_error::LoadError;
pub use parse_error::ParseError;
pub use pipeline_error::PipelineError;
pub use resolve_error::ResolveError;
