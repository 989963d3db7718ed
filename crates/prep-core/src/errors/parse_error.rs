//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, PrepErrorCode};

/// Errors that can occur while parsing a Go source file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar could not be loaded: {message}")]
    Grammar { message: String },

    #[error("Tree-sitter produced no tree for {path}")]
    NoTree { path: PathBuf },

    #[error("{}:{line}:{column}: syntax error", path.display())]
    Syntax {
        path: PathBuf,
        line: u32,
        column: u32,
    },

    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
}

impl PrepErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
