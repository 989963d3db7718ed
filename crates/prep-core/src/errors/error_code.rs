//! PrepErrorCode trait for stable, machine-readable error codes.

/// Every prep error enum implements this so the CLI (and any library caller)
/// can report a stable code alongside the human-readable message.
pub trait PrepErrorCode {
    /// Returns the error code string (e.g., "LOAD_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const PACKAGE_NOT_FOUND: &str = "PACKAGE_NOT_FOUND";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const AMBIGUOUS_CONSTANT: &str = "AMBIGUOUS_CONSTANT";
pub const EMIT_ERROR: &str = "EMIT_ERROR";
