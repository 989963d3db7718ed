//! Import path to directory resolution.
//!
//! Module mode first (`go.mod` at or above the search root), then each
//! GOPATH entry's `src` tree.

use std::fs;
use std::path::{Path, PathBuf};

use prep_core::errors::LoadError;

/// A Go module: its root directory and declared module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: PathBuf,
    pub path: String,
}

/// Resolve `import_path` to an absolute package directory.
pub fn locate_package(
    import_path: &str,
    search_root: &Path,
    gopath: &[PathBuf],
) -> Result<PathBuf, LoadError> {
    let not_found = || LoadError::PackageNotFound {
        import_path: import_path.to_string(),
    };
    let import_path = import_path.trim_end_matches('/');
    if import_path.is_empty() {
        return Err(not_found());
    }

    let mut candidates = Vec::new();
    if let Some(module) = find_module(search_root) {
        if let Some(rest) = strip_module_prefix(import_path, &module.path) {
            candidates.push(module.root.join(rest));
        }
    }
    for entry in gopath {
        candidates.push(entry.join("src").join(import_path));
    }

    let dir = candidates
        .into_iter()
        .find(|c| c.is_dir())
        .ok_or_else(not_found)?;
    let dir = dir.canonicalize().map_err(|_| not_found())?;
    tracing::debug!(import_path, dir = %dir.display(), "located package");
    Ok(dir)
}

/// Find the nearest `go.mod` at or above `start`.
pub fn find_module(start: &Path) -> Option<GoModule> {
    let start = start.canonicalize().ok()?;
    for dir in start.ancestors() {
        let go_mod = dir.join("go.mod");
        if go_mod.is_file() {
            let content = fs::read_to_string(&go_mod).ok()?;
            return parse_module_path(&content).map(|path| GoModule {
                root: dir.to_path_buf(),
                path,
            });
        }
    }
    None
}

/// Module path from the `module` directive of a `go.mod` file.
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    for line in go_mod.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '"') {
            continue;
        }
        let path = rest.trim().trim_matches('"');
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}

fn strip_module_prefix<'a>(import_path: &'a str, module: &str) -> Option<&'a str> {
    if import_path == module {
        return Some("");
    }
    import_path.strip_prefix(module)?.strip_prefix('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_module_path() {
        assert_eq!(
            parse_module_path("module github.com/acme/shop\n\ngo 1.21\n").as_deref(),
            Some("github.com/acme/shop")
        );
        assert_eq!(
            parse_module_path("// header\nmodule \"example.com/q\" // quoted\n").as_deref(),
            Some("example.com/q")
        );
        assert_eq!(parse_module_path("go 1.21\n"), None);
        assert_eq!(parse_module_path("modulefoo bar\n"), None);
    }

    #[test]
    fn test_strip_module_prefix() {
        assert_eq!(strip_module_prefix("a.com/m", "a.com/m"), Some(""));
        assert_eq!(strip_module_prefix("a.com/m/db", "a.com/m"), Some("db"));
        assert_eq!(strip_module_prefix("a.com/mx/db", "a.com/m"), None);
    }
}
