//! Declaration collection: every named definition in a package, with
//! constant values evaluated.

use std::convert::Infallible;
use std::path::PathBuf;

use serde::Serialize;
use tree_sitter::Node;

use prep_core::types::{FxHashSet, SmallVec2};

use super::const_eval::{enclosing_scope, ConstEvaluator, ConstSite, ConstValue};
use crate::parsers::{node_text, walk, ParsedFile, Position, Visitor};

/// What a definition binds its name to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Const,
    Var,
    Func,
    Type,
}

/// One declared name, from any scope of the package.
#[derive(Debug, Clone, Serialize)]
pub struct Definition {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line: u32,
    /// Evaluated value, for constants whose initializer is statically known.
    pub value: Option<ConstValue>,
}

impl Definition {
    pub fn is_const(&self) -> bool {
        self.kind == SymbolKind::Const
    }
}

#[derive(Debug)]
struct DeclSite<'t> {
    name: &'t str,
    kind: SymbolKind,
    file: usize,
    line: u32,
    const_site: Option<usize>,
}

struct DeclCollector<'c, 't> {
    file: usize,
    sites: &'c mut Vec<DeclSite<'t>>,
    consts: &'c mut Vec<ConstSite<'t>>,
    type_names: &'c mut FxHashSet<&'t str>,
}

impl<'c, 't> DeclCollector<'c, 't> {
    fn record(&mut self, node: Node<'t>, source: &'t [u8], kind: SymbolKind) {
        let name = node_text(node, source);
        if name.is_empty() || name == "_" {
            return;
        }
        if kind == SymbolKind::Type {
            self.type_names.insert(name);
        }
        self.sites.push(DeclSite {
            name,
            kind,
            file: self.file,
            line: Position::of(&node).line,
            const_site: None,
        });
    }

    fn record_field(&mut self, node: Node<'t>, source: &'t [u8], field: &str, kind: SymbolKind) {
        let mut cursor = node.walk();
        let names: SmallVec2<Node<'t>> = node.children_by_field_name(field, &mut cursor).collect();
        for name in names {
            self.record(name, source, kind);
        }
    }

    /// `const` declarations, including implicit repetition of the previous
    /// initializer list inside a group and `iota` numbering.
    fn record_const_group(&mut self, decl: Node<'t>, source: &'t [u8]) {
        let mut cursor = decl.walk();
        let specs: Vec<Node<'t>> = decl
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "const_spec")
            .collect();

        let scope = enclosing_scope(decl).map(|s| s.id());
        let mut inherited: Option<Node<'t>> = None;
        let mut inherited_type: Option<&'t str> = None;
        for (iota, spec) in specs.into_iter().enumerate() {
            if let Some(values) = spec.child_by_field_name("value") {
                inherited = Some(values);
                inherited_type = spec
                    .child_by_field_name("type")
                    .map(|t| node_text(t, source));
            }
            let exprs: Vec<Node<'t>> = inherited.map(expression_items).unwrap_or_default();

            let mut cursor = spec.walk();
            let names: SmallVec2<Node<'t>> =
                spec.children_by_field_name("name", &mut cursor).collect();
            for (i, name_node) in names.into_iter().enumerate() {
                let name = node_text(name_node, source);
                if name.is_empty() || name == "_" {
                    continue;
                }
                let const_site = self.consts.len();
                self.consts.push(ConstSite {
                    name,
                    source: self.file,
                    expr: exprs.get(i).copied(),
                    type_name: inherited_type,
                    iota: iota as i128,
                    scope,
                    start_byte: name_node.start_byte(),
                });
                self.sites.push(DeclSite {
                    name,
                    kind: SymbolKind::Const,
                    file: self.file,
                    line: Position::of(&name_node).line,
                    const_site: Some(const_site),
                });
            }
        }
    }
}

impl<'c, 't> Visitor<'t> for DeclCollector<'c, 't> {
    type Error = Infallible;

    fn visit(&mut self, node: Node<'t>, source: &'t [u8]) -> Result<bool, Infallible> {
        match node.kind() {
            "const_declaration" => {
                self.record_const_group(node, source);
                return Ok(false);
            }
            "var_spec" => self.record_field(node, source, "name", SymbolKind::Var),
            "short_var_declaration" => {
                if let Some(left) = node.child_by_field_name("left") {
                    for item in expression_items(left) {
                        if item.kind() == "identifier" {
                            self.record(item, source, SymbolKind::Var);
                        }
                    }
                }
            }
            "function_declaration" | "method_declaration" => {
                self.record_field(node, source, "name", SymbolKind::Func)
            }
            "type_spec" | "type_alias" => self.record_field(node, source, "name", SymbolKind::Type),
            _ => {}
        }
        Ok(true)
    }
}

fn expression_items(list: Node) -> Vec<Node> {
    let mut cursor = list.walk();
    let items = list
        .named_children(&mut cursor)
        .filter(|n| !n.is_extra())
        .collect();
    items
}

/// Collect the definitions of `files` in file order, then document order.
///
/// Constant initializers are evaluated across all files, so a constant may
/// reference one declared later or in another file.
pub fn collect_definitions(files: &[&ParsedFile]) -> Vec<Definition> {
    let mut sites = Vec::new();
    let mut consts = Vec::new();
    let mut type_names = FxHashSet::default();

    for (idx, file) in files.iter().enumerate() {
        let mut collector = DeclCollector {
            file: idx,
            sites: &mut sites,
            consts: &mut consts,
            type_names: &mut type_names,
        };
        walk(&mut collector, file.root(), file.source.as_bytes()).unwrap_or_else(|never| match never {});
    }

    let sources = files.iter().map(|f| f.source.as_bytes()).collect();
    let values = ConstEvaluator::new(sources, consts, type_names).evaluate_all();

    sites
        .into_iter()
        .map(|site| Definition {
            name: site.name.to_string(),
            kind: site.kind,
            file: files[site.file].path.clone(),
            line: site.line,
            value: site.const_site.and_then(|i| values[i].clone()),
        })
        .collect()
}
