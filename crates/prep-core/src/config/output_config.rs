//! Output configuration.

use serde::{Deserialize, Serialize};

/// Name of the generated file when nothing overrides it.
pub const DEFAULT_OUTPUT_FILE: &str = "prepared_statements.go";

/// Configuration for the generated source artifact.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// File name written into the package directory. Default: `prepared_statements.go`.
    pub file_name: Option<String>,
    /// Generate code without writing it. Default: false.
    pub dry_run: Option<bool>,
}

impl OutputConfig {
    pub fn effective_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    pub fn effective_dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }
}
