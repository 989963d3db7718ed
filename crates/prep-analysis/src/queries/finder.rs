//! Query finder: walks a package's syntax trees and collects the query text
//! passed to query-executing methods.

use tree_sitter::Node;

use prep_core::errors::ResolveError;

use super::constant_table::ConstantTable;
use super::signatures::query_arg_index;
use crate::parsers::{node_text, walk, ParsedFile, Position, Visitor};

/// Literal token kinds whose source text is taken verbatim.
const LITERAL_KINDS: &[&str] = &[
    "interpreted_string_literal",
    "raw_string_literal",
    "int_literal",
    "float_literal",
    "imaginary_literal",
    "rune_literal",
];

/// Collects resolved query values in traversal order. One finder per package.
pub struct QueryFinder<'c> {
    constants: &'c ConstantTable,
    queries: Vec<String>,
}

impl<'c> QueryFinder<'c> {
    pub fn new(constants: &'c ConstantTable) -> Self {
        Self {
            constants,
            queries: Vec::new(),
        }
    }

    /// Walk one file's tree, appending every query it resolves.
    pub fn visit_file(&mut self, file: &ParsedFile) -> Result<(), ResolveError> {
        let before = self.queries.len();
        walk(self, file.root(), file.source.as_bytes())?;
        tracing::trace!(
            file = %file.path.display(),
            found = self.queries.len() - before,
            "visited file"
        );
        Ok(())
    }

    /// Values resolved so far, in traversal order; duplicates kept.
    pub fn into_queries(self) -> Vec<String> {
        self.queries
    }

    /// String value of a query argument: the literal's own text, or a
    /// constant's exact value. Anything else yields `None`.
    fn resolve(&self, arg: Node, source: &[u8]) -> Result<Option<String>, ResolveError> {
        let kind = arg.kind();
        if kind == "raw_string_literal" {
            // Carriage returns are not part of a raw string's value.
            return Ok(Some(node_text(arg, source).replace('\r', "")));
        }
        if LITERAL_KINDS.contains(&kind) {
            return Ok(Some(node_text(arg, source).to_string()));
        }
        if kind == "identifier" {
            let value = self.constants.resolve(node_text(arg, source))?;
            return Ok(value.map(str::to_string));
        }
        Ok(None)
    }
}

impl<'c, 't> Visitor<'t> for QueryFinder<'c> {
    type Error = ResolveError;

    fn visit(&mut self, node: Node<'t>, source: &'t [u8]) -> Result<bool, ResolveError> {
        if node.kind() != "call_expression" {
            return Ok(true);
        }
        let Some(selector) = node
            .child_by_field_name("function")
            .filter(|f| f.kind() == "selector_expression")
        else {
            return Ok(true);
        };
        let Some(method) = selector.child_by_field_name("field") else {
            return Ok(true);
        };
        let method = node_text(method, source);
        let Some(index) = query_arg_index(method) else {
            return Ok(true);
        };

        match call_arguments(node).get(index) {
            Some(&arg) => {
                if let Some(query) = self.resolve(arg, source)? {
                    self.queries.push(query);
                }
            }
            None => {
                let at = Position::of(&node);
                tracing::warn!(
                    method,
                    line = at.line,
                    column = at.column,
                    expected_index = index,
                    "query method called with too few arguments; skipped"
                );
            }
        }

        // Nothing inside a recognized call is of further interest.
        Ok(false)
    }
}

fn call_arguments(call: Node) -> Vec<Node> {
    let Some(list) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = list.walk();
    let args = list
        .named_children(&mut cursor)
        .filter(|n| !n.is_extra())
        .collect();
    args
}
