//! Query extraction: the constant table and the query-call visitor.

pub mod constant_table;
pub mod finder;
pub mod signatures;

pub use constant_table::{ConstantEntry, ConstantTable};
pub use finder::QueryFinder;
pub use signatures::{query_arg_index, MethodSignature, QUERY_METHODS};

use prep_core::errors::ResolveError;

use crate::package::Package;

/// Resolve every query passed to a query-executing method in `package`,
/// in file order then traversal order. Duplicates are kept.
pub fn extract_queries(package: &Package) -> Result<Vec<String>, ResolveError> {
    let table = ConstantTable::build(&package.definitions);
    tracing::debug!(
        constants = table.len(),
        ambiguous = table.ambiguous_names().len(),
        "built constant table"
    );

    let mut finder = QueryFinder::new(&table);
    for file in &package.files {
        finder.visit_file(file)?;
    }
    Ok(finder.into_queries())
}
