//! Parsed source file and position types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

/// One Go source file together with its syntax tree.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub source: String,
    pub tree: Tree,
    /// Name from the `package` clause, if the file has one.
    pub package_name: Option<String>,
    /// True for `_test.go` files.
    pub is_test: bool,
}

impl ParsedFile {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Source text of `node`, or the empty string if it is not valid UTF-8.
pub fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-based line and column of a location in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn of(node: &Node) -> Self {
        let p = node.start_position();
        Self {
            line: p.row as u32 + 1,
            column: p.column as u32 + 1,
        }
    }
}
