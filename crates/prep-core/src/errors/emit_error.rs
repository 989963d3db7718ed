//! Emitter errors.

use std::path::PathBuf;

use super::error_code::{self, PrepErrorCode};

/// Errors that can occur while writing the generated file.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to create file {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write generated code to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PrepErrorCode for EmitError {
    fn error_code(&self) -> &'static str {
        error_code::EMIT_ERROR
    }
}
