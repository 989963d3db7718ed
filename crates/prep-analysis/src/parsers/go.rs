//! Go parser using native tree-sitter.
//!
//! Produces a [`ParsedFile`] per source file. Files that do not parse cleanly
//! are rejected: everything downstream assumes syntactically valid input.

use std::path::Path;
use std::time::Instant;

use prep_core::errors::ParseError;
use tree_sitter::{Node, Parser};

use super::error_tolerant::{count_errors, first_error};
use super::types::{node_text, ParsedFile, Position};

/// Go parser
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ParseError::Grammar {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse one file. `path` is recorded on the result and used in errors.
    pub fn parse(&mut self, source: String, path: &Path) -> Result<ParsedFile, ParseError> {
        let start = Instant::now();

        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| ParseError::NoTree {
                path: path.to_path_buf(),
            })?;

        let root = tree.root_node();
        if let Some(bad) = first_error(root) {
            let at = Position::of(&bad);
            tracing::debug!(
                path = %path.display(),
                errors = count_errors(root),
                "rejecting file with syntax errors"
            );
            return Err(ParseError::Syntax {
                path: path.to_path_buf(),
                line: at.line,
                column: at.column,
            });
        }

        let package_name = package_clause(root, source.as_bytes());
        let is_test = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_test.go"));

        tracing::trace!(
            path = %path.display(),
            parse_time_us = start.elapsed().as_micros() as u64,
            "parsed"
        );

        Ok(ParsedFile {
            path: path.to_path_buf(),
            source,
            tree,
            package_name,
            is_test,
        })
    }
}

/// Name declared by the file's `package` clause.
fn package_clause(root: Node, source: &[u8]) -> Option<String> {
    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_clause")?;

    let mut cursor = clause.walk();
    let name = clause
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_identifier")?;
    Some(node_text(name, source).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str, name: &str) -> Result<ParsedFile, ParseError> {
        let mut parser = GoParser::new().unwrap();
        parser.parse(src.to_string(), Path::new(name))
    }

    #[test]
    fn test_parse_package_clause() {
        let file = parse("package store\n\nfunc f() {}\n", "store.go").unwrap();
        assert_eq!(file.package_name.as_deref(), Some("store"));
        assert!(!file.is_test);
    }

    #[test]
    fn test_test_file_detected() {
        let file = parse("package store_test\n", "store_test.go").unwrap();
        assert!(file.is_test);
        assert_eq!(file.package_name.as_deref(), Some("store_test"));
    }

    #[test]
    fn test_syntax_error_rejected() {
        let err = parse("package store\n\nfunc f( {\n", "broken.go").unwrap_err();
        match err {
            ParseError::Syntax { path, line, .. } => {
                assert_eq!(path, Path::new("broken.go"));
                assert!(line >= 3);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
