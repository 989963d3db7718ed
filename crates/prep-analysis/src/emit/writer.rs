//! Writing the generated file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use prep_core::errors::EmitError;

/// Create (or truncate) `dir/file_name` and write `code` into it.
pub fn write_generated(dir: &Path, file_name: &str, code: &str) -> Result<PathBuf, EmitError> {
    let path = dir.join(file_name);
    let mut file = File::create(&path).map_err(|source| EmitError::Create {
        path: path.clone(),
        source,
    })?;
    file.write_all(code.as_bytes())
        .map_err(|source| EmitError::Write {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), bytes = code.len(), "wrote generated file");
    Ok(path)
}
