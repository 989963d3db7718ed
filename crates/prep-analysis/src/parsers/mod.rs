//! Tree-sitter Go parsing and traversal.

pub mod error_tolerant;
pub mod go;
pub mod types;
pub mod visitor;

pub use go::GoParser;
pub use types::{node_text, ParsedFile, Position};
pub use visitor::{walk, Visitor};
