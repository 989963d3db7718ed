//! Query-executing methods and the position of their query argument.

/// A query-executing method recognized by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: &'static str,
    /// Zero-based index of the query text among the call arguments.
    pub query_arg: usize,
}

const fn method(name: &'static str, query_arg: usize) -> MethodSignature {
    MethodSignature { name, query_arg }
}

/// `database/sql` and `sqlx` context-aware methods.
pub const QUERY_METHODS: &[MethodSignature] = &[
    // (ctx, query, args...)
    method("ExecContext", 1),
    method("QueryContext", 1),
    method("QueryRowContext", 1),
    method("NamedExecContext", 1),
    method("NamedQueryContext", 1),
    method("PrepareContext", 1),
    method("PrepareNamedContext", 1),
    // (ctx, dest, query, args...)
    method("GetContext", 2),
    method("SelectContext", 2),
];

/// Query argument index for `method_name`, if it is a query-executing method.
pub fn query_arg_index(method_name: &str) -> Option<usize> {
    QUERY_METHODS
        .iter()
        .find(|m| m.name == method_name)
        .map(|m| m.query_arg)
}
