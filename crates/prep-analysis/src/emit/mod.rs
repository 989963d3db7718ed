//! Output: deduplicate and sort the resolved queries, render the generated
//! Go file, and write it into the package directory.

pub mod codegen;
pub mod writer;

pub use codegen::{generate_code, unique_sorted};
pub use writer::write_generated;
