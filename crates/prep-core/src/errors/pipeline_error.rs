//! Pipeline errors.

use super::error_code::PrepErrorCode;
use super::{ConfigError, EmitError, LoadError, ParseError, ResolveError};

/// Errors that can occur during a prep run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Emit(#[from] EmitError),
}

impl PrepErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Load(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Resolve(e) => e.error_code(),
            Self::Emit(e) => e.error_code(),
        }
    }
}
