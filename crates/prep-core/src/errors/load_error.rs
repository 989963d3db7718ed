//! Package loading errors.

use std::path::PathBuf;

use super::error_code::{self, PrepErrorCode};
use super::ParseError;

/// Errors raised while locating a package and reading its sources.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to detect absolute path of the package {import_path:?}")]
    PackageNotFound { import_path: String },

    #[error("no Go files in {dir}")]
    NoGoFiles { dir: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl PrepErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PackageNotFound { .. } => error_code::PACKAGE_NOT_FOUND,
            Self::Parse(e) => e.error_code(),
            _ => error_code::LOAD_ERROR,
        }
    }
}
