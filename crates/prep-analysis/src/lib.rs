//! prep-analysis: static extraction of SQL query text from a Go package.
//!
//! - Parsers: tree-sitter-go parsing with syntax-error rejection
//! - Package: locating, loading, and constant-evaluating a package
//! - Queries: the constant table and the query-call visitor
//! - Emit: deduplication, code generation, and file output
//! - Pipeline: the end-to-end run

pub mod emit;
pub mod package;
pub mod parsers;
pub mod pipeline;
pub mod queries;

pub use package::{Package, PackageLoader};
pub use pipeline::{PackageSpec, PrepReport};
pub use queries::{ConstantTable, QueryFinder};
