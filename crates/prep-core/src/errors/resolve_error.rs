//! Query resolution errors.

use super::error_code::{self, PrepErrorCode};

/// Fatal conditions hit while resolving a query argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The identifier names a constant declared more than once in the package.
    #[error("constant already defined, need unique name for {name}")]
    AmbiguousConstant { name: String },
}

impl PrepErrorCode for ResolveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AmbiguousConstant { .. } => error_code::AMBIGUOUS_CONSTANT,
        }
    }
}
