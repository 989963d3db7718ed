//! Compile-time evaluation of Go constant declarations.
//!
//! Covers the constant expressions that appear in practice around SQL text:
//! string literals and concatenation, numeric and rune literals, `iota`,
//! references to other constants, and conversions through builtin or
//! package-declared type names. Anything else evaluates to `None`.

use serde::{Serialize, Serializer};
use tree_sitter::Node;

use prep_core::types::{FxHashMap, FxHashSet, SmallVec2};

use crate::parsers::node_text;

/// Node kinds that open a scope for local declarations.
const SCOPE_KINDS: &[&str] = &[
    "block",
    "statement_list",
    "expression_case",
    "type_case",
    "default_case",
    "communication_case",
];

/// Value of a Go constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ConstValue {
    /// Go strings are byte sequences and need not be valid UTF-8.
    #[serde(serialize_with = "serialize_lossy")]
    String(Vec<u8>),
    /// Integer and rune constants.
    Int(i128),
    Float(f64),
    Bool(bool),
}

impl ConstValue {
    /// Exact source form of the value. Strings are rendered as a quoted Go
    /// literal, so the result can be pasted back into source unchanged.
    pub fn exact_string(&self) -> String {
        match self {
            Self::String(s) => go_quote(s),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Bool(b) => b.to_string(),
        }
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_lossy<S: Serializer>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

/// A constant declaration waiting to be evaluated.
#[derive(Debug, Clone, Copy)]
pub struct ConstSite<'t> {
    pub name: &'t str,
    /// Index of the declaring file in the evaluator's source list.
    pub source: usize,
    /// Initializer after implicit repetition inside a `const (...)` group.
    pub expr: Option<Node<'t>>,
    /// Declared type name, repeated along with the initializer.
    pub type_name: Option<&'t str>,
    pub iota: i128,
    /// Id of the enclosing local scope node; `None` at package level.
    pub scope: Option<usize>,
    /// Byte offset of the name; a local constant is visible after it.
    pub start_byte: usize,
}

/// The nearest enclosing local scope of `node`, if it is not at package level.
pub fn enclosing_scope(node: Node) -> Option<Node> {
    let mut current = node.parent();
    while let Some(n) = current {
        if SCOPE_KINDS.contains(&n.kind()) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

#[derive(Debug, Clone)]
enum Slot {
    Pending,
    Evaluating,
    Done(Option<ConstValue>),
}

/// Evaluates a package's constant declarations in dependency order.
pub struct ConstEvaluator<'t> {
    sources: Vec<&'t [u8]>,
    sites: Vec<ConstSite<'t>>,
    /// Package-level constants by name.
    package: FxHashMap<&'t str, SmallVec2<usize>>,
    /// Local constants by (file, scope node id, name), in declaration order.
    local: FxHashMap<(usize, usize, &'t str), SmallVec2<usize>>,
    type_names: FxHashSet<&'t str>,
    slots: Vec<Slot>,
}

impl<'t> ConstEvaluator<'t> {
    pub fn new(
        sources: Vec<&'t [u8]>,
        sites: Vec<ConstSite<'t>>,
        type_names: FxHashSet<&'t str>,
    ) -> Self {
        let mut package: FxHashMap<&'t str, SmallVec2<usize>> = FxHashMap::default();
        let mut local: FxHashMap<(usize, usize, &'t str), SmallVec2<usize>> =
            FxHashMap::default();
        for (idx, site) in sites.iter().enumerate() {
            match site.scope {
                Some(scope) => local
                    .entry((site.source, scope, site.name))
                    .or_default()
                    .push(idx),
                None => package.entry(site.name).or_default().push(idx),
            }
        }
        let slots = vec![Slot::Pending; sites.len()];
        Self {
            sources,
            sites,
            package,
            local,
            type_names,
            slots,
        }
    }

    /// Evaluate every site; the result is indexed like the input sites.
    pub fn evaluate_all(mut self) -> Vec<Option<ConstValue>> {
        (0..self.sites.len()).map(|idx| self.value_of(idx)).collect()
    }

    fn value_of(&mut self, idx: usize) -> Option<ConstValue> {
        match &self.slots[idx] {
            Slot::Done(value) => return value.clone(),
            Slot::Evaluating => {
                tracing::debug!(name = self.sites[idx].name, "constant initialization cycle");
                return None;
            }
            Slot::Pending => {}
        }

        self.slots[idx] = Slot::Evaluating;
        let site = self.sites[idx];
        let value = site
            .expr
            .and_then(|expr| self.eval(expr, site.source, site.iota));
        if value.is_none() {
            tracing::trace!(name = site.name, "constant value is not statically known");
        }
        self.slots[idx] = Slot::Done(value.clone());
        value
    }

    fn eval(&mut self, node: Node<'t>, src: usize, iota: i128) -> Option<ConstValue> {
        let text = node_text(node, self.sources[src]);
        match node.kind() {
            "interpreted_string_literal" => {
                unquote_interpreted(strip_delimiters(text)?).map(ConstValue::String)
            }
            "raw_string_literal" => Some(ConstValue::String(
                strip_delimiters(text)?
                    .bytes()
                    .filter(|&b| b != b'\r')
                    .collect(),
            )),
            "int_literal" => parse_int(text).map(ConstValue::Int),
            "float_literal" => parse_float(text).map(ConstValue::Float),
            "rune_literal" => unquote_rune(strip_delimiters(text)?).map(ConstValue::Int),
            "true" => Some(ConstValue::Bool(true)),
            "false" => Some(ConstValue::Bool(false)),
            "iota" => Some(ConstValue::Int(iota)),
            "identifier" => match self.resolve_site(node, text, src) {
                Some(idx) => self.value_of(idx),
                None if text == "iota" => Some(ConstValue::Int(iota)),
                None => None,
            },
            "parenthesized_expression" => {
                let inner = first_operand(node)?;
                self.eval(inner, src, iota)
            }
            "unary_expression" => {
                let op = node_text(node.child_by_field_name("operator")?, self.sources[src]);
                let operand_node = node.child_by_field_name("operand")?;
                let operand = self.eval(operand_node, src, iota)?;
                if op == "^" {
                    if let Some(bits) = self.static_type(operand_node, src).and_then(unsigned_bits)
                    {
                        return complement_unsigned(operand, bits);
                    }
                }
                unary(op, operand)
            }
            "binary_expression" => {
                let op = node_text(node.child_by_field_name("operator")?, self.sources[src]);
                let left = self.eval(node.child_by_field_name("left")?, src, iota)?;
                let right = self.eval(node.child_by_field_name("right")?, src, iota)?;
                binary(op, left, right)
            }
            "call_expression" => {
                let function = node.child_by_field_name("function")?;
                if function.kind() != "identifier" {
                    return None;
                }
                let type_name = node_text(function, self.sources[src]);
                let args = node.child_by_field_name("arguments")?;
                let mut cursor = args.walk();
                let operands: SmallVec2<Node<'t>> = args
                    .named_children(&mut cursor)
                    .filter(|n| !n.is_extra())
                    .collect();
                if operands.len() != 1 {
                    return None;
                }
                let value = self.eval(operands[0], src, iota)?;
                self.convert(type_name, value)
            }
            "type_conversion_expression" => {
                let type_name = node_text(node.child_by_field_name("type")?, self.sources[src]);
                let value = self.eval(node.child_by_field_name("operand")?, src, iota)?;
                self.convert(type_name, value)
            }
            _ => None,
        }
    }

    /// The constant site `name` refers to at `reference`.
    ///
    /// Local constants of enclosing scopes come first, innermost out, then
    /// package-level ones. A package-level name declared more than once
    /// resolves to nothing.
    fn resolve_site(&self, reference: Node<'t>, name: &str, src: usize) -> Option<usize> {
        let at = reference.start_byte();
        let mut scope = enclosing_scope(reference);
        while let Some(s) = scope {
            if let Some(sites) = self.local.get(&(src, s.id(), name)) {
                if let Some(&idx) = sites.iter().rev().find(|&&i| self.sites[i].start_byte < at) {
                    return Some(idx);
                }
            }
            scope = enclosing_scope(s);
        }
        match self.package.get(name) {
            Some(sites) if sites.len() == 1 => Some(sites[0]),
            _ => None,
        }
    }

    /// Type name of a constant expression, when it carries one.
    fn static_type(&self, node: Node<'t>, src: usize) -> Option<&'t str> {
        let source = self.sources[src];
        match node.kind() {
            "call_expression" => {
                let function = node.child_by_field_name("function")?;
                (function.kind() == "identifier").then(|| node_text(function, source))
            }
            "type_conversion_expression" => {
                Some(node_text(node.child_by_field_name("type")?, source))
            }
            "parenthesized_expression" => self.static_type(first_operand(node)?, src),
            "unary_expression" => self.static_type(node.child_by_field_name("operand")?, src),
            "binary_expression" => node
                .child_by_field_name("left")
                .and_then(|left| self.static_type(left, src))
                .or_else(|| {
                    node.child_by_field_name("right")
                        .and_then(|right| self.static_type(right, src))
                }),
            "identifier" => {
                let idx = self.resolve_site(node, node_text(node, source), src)?;
                self.sites[idx].type_name
            }
            _ => None,
        }
    }

    fn convert(&self, type_name: &str, value: ConstValue) -> Option<ConstValue> {
        if let Some((bits, signed)) = int_type(type_name) {
            let i = match value {
                ConstValue::Int(i) => i,
                ConstValue::Float(f) if f.fract() == 0.0 && f.is_finite() => f as i128,
                _ => return None,
            };
            return fits(i, bits, signed).then_some(ConstValue::Int(i));
        }
        match type_name {
            "string" => match value {
                ConstValue::String(s) => Some(ConstValue::String(s)),
                ConstValue::Int(code) => {
                    let c = u32::try_from(code)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    Some(ConstValue::String(c.to_string().into_bytes()))
                }
                _ => None,
            },
            "float32" | "float64" => match value {
                ConstValue::Int(i) => Some(ConstValue::Float(i as f64)),
                ConstValue::Float(f) => Some(ConstValue::Float(f)),
                _ => None,
            },
            "bool" => match value {
                ConstValue::Bool(b) => Some(ConstValue::Bool(b)),
                _ => None,
            },
            named if self.type_names.contains(named) => Some(value),
            _ => None,
        }
    }
}

/// Width and signedness of a builtin integer type.
fn int_type(name: &str) -> Option<(u32, bool)> {
    Some(match name {
        "int8" => (8, true),
        "int16" => (16, true),
        "int32" | "rune" => (32, true),
        "int" | "int64" => (64, true),
        "uint8" | "byte" => (8, false),
        "uint16" => (16, false),
        "uint32" => (32, false),
        "uint" | "uint64" | "uintptr" => (64, false),
        _ => return None,
    })
}

fn unsigned_bits(name: &str) -> Option<u32> {
    match int_type(name)? {
        (bits, false) => Some(bits),
        _ => None,
    }
}

fn fits(value: i128, bits: u32, signed: bool) -> bool {
    if signed {
        let limit = 1i128 << (bits - 1);
        (-limit..limit).contains(&value)
    } else {
        (0..(1i128 << bits)).contains(&value)
    }
}

/// `^x` for an unsigned operand of the given width.
fn complement_unsigned(operand: ConstValue, bits: u32) -> Option<ConstValue> {
    let ConstValue::Int(i) = operand else {
        return None;
    };
    if !fits(i, bits, false) {
        return None;
    }
    let mask = (1i128 << bits) - 1;
    Some(ConstValue::Int(i ^ mask))
}

fn first_operand(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let inner = node.named_children(&mut cursor).find(|n| !n.is_extra());
    inner
}

fn strip_delimiters(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    text.get(1..text.len() - 1)
}

fn unary(op: &str, operand: ConstValue) -> Option<ConstValue> {
    match (op, operand) {
        ("+", v @ (ConstValue::Int(_) | ConstValue::Float(_))) => Some(v),
        ("-", ConstValue::Int(i)) => i.checked_neg().map(ConstValue::Int),
        ("-", ConstValue::Float(f)) => Some(ConstValue::Float(-f)),
        ("^", ConstValue::Int(i)) => Some(ConstValue::Int(!i)),
        ("!", ConstValue::Bool(b)) => Some(ConstValue::Bool(!b)),
        _ => None,
    }
}

fn binary(op: &str, left: ConstValue, right: ConstValue) -> Option<ConstValue> {
    match (left, right) {
        (ConstValue::String(mut a), ConstValue::String(b)) => match op {
            "+" => {
                a.extend_from_slice(&b);
                Some(ConstValue::String(a))
            }
            _ => compare(op, &a, &b).map(ConstValue::Bool),
        },
        (ConstValue::Int(a), ConstValue::Int(b)) => int_binary(op, a, b),
        (ConstValue::Int(a), ConstValue::Float(b)) => float_binary(op, a as f64, b),
        (ConstValue::Float(a), ConstValue::Int(b)) => float_binary(op, a, b as f64),
        (ConstValue::Float(a), ConstValue::Float(b)) => float_binary(op, a, b),
        (ConstValue::Bool(a), ConstValue::Bool(b)) => match op {
            "&&" => Some(ConstValue::Bool(a && b)),
            "||" => Some(ConstValue::Bool(a || b)),
            "==" => Some(ConstValue::Bool(a == b)),
            "!=" => Some(ConstValue::Bool(a != b)),
            _ => None,
        },
        _ => None,
    }
}

fn int_binary(op: &str, a: i128, b: i128) -> Option<ConstValue> {
    let value = match op {
        "+" => a.checked_add(b)?,
        "-" => a.checked_sub(b)?,
        "*" => a.checked_mul(b)?,
        "/" => a.checked_div(b)?,
        "%" => a.checked_rem(b)?,
        "<<" => shift_left(a, u32::try_from(b).ok()?)?,
        ">>" => {
            let shift = u32::try_from(b).ok()?;
            a.checked_shr(shift).unwrap_or(if a < 0 { -1 } else { 0 })
        }
        "&" => a & b,
        "|" => a | b,
        "^" => a ^ b,
        "&^" => a & !b,
        _ => return compare(op, &a, &b).map(ConstValue::Bool),
    };
    Some(ConstValue::Int(value))
}

/// `a << shift`, or `None` when the result does not fit.
fn shift_left(a: i128, shift: u32) -> Option<i128> {
    if a == 0 {
        return Some(0);
    }
    let shifted = a.checked_shl(shift)?;
    (shifted >> shift == a).then_some(shifted)
}

fn float_binary(op: &str, a: f64, b: f64) -> Option<ConstValue> {
    let value = match op {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" if b != 0.0 => a / b,
        _ => return compare(op, &a, &b).map(ConstValue::Bool),
    };
    Some(ConstValue::Float(value))
}

fn compare<T: PartialOrd + ?Sized>(op: &str, a: &T, b: &T) -> Option<bool> {
    Some(match op {
        "==" => a == b,
        "!=" => a != b,
        "<" => a < b,
        "<=" => a <= b,
        ">" => a > b,
        ">=" => a >= b,
        _ => return None,
    })
}

/// Parse a Go integer literal (decimal, `0x`, `0o`, `0b`, legacy octal, `_` separators).
pub fn parse_int(text: &str) -> Option<i128> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i128::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i128::from_str_radix(oct, 8).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        i128::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

/// Parse a decimal Go float literal. Hexadecimal floats are not supported.
pub fn parse_float(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    if digits.contains(['x', 'X']) {
        return None;
    }
    digits.parse().ok()
}

enum Escaped {
    Byte(u8),
    Char(char),
}

fn take_hex(chars: &mut std::str::Chars<'_>, n: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..n {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

/// Decode the escape following a backslash. `quote` is the literal's delimiter.
fn decode_escape(chars: &mut std::str::Chars<'_>, quote: char) -> Option<Escaped> {
    let c = chars.next()?;
    let escaped = match c {
        'a' => Escaped::Byte(0x07),
        'b' => Escaped::Byte(0x08),
        'f' => Escaped::Byte(0x0c),
        'n' => Escaped::Byte(b'\n'),
        'r' => Escaped::Byte(b'\r'),
        't' => Escaped::Byte(b'\t'),
        'v' => Escaped::Byte(0x0b),
        '\\' => Escaped::Byte(b'\\'),
        c if c == quote => Escaped::Char(c),
        'x' => Escaped::Byte(u8::try_from(take_hex(chars, 2)?).ok()?),
        '0'..='7' => {
            let mut value = c.to_digit(8)?;
            for _ in 0..2 {
                value = value * 8 + chars.next()?.to_digit(8)?;
            }
            Escaped::Byte(u8::try_from(value).ok()?)
        }
        'u' => Escaped::Char(char::from_u32(take_hex(chars, 4)?)?),
        'U' => Escaped::Char(char::from_u32(take_hex(chars, 8)?)?),
        _ => return None,
    };
    Some(escaped)
}

/// Decode the body of an interpreted (double-quoted) string literal to its
/// bytes. Byte escapes are kept as-is, valid UTF-8 or not.
pub fn unquote_interpreted(body: &str) -> Option<Vec<u8>> {
    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        let c = if c == '\\' {
            match decode_escape(&mut chars, '"')? {
                Escaped::Byte(b) => {
                    bytes.push(b);
                    continue;
                }
                Escaped::Char(c) => c,
            }
        } else {
            c
        };
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
    Some(bytes)
}

/// Decode the body of a rune literal to its code point.
pub fn unquote_rune(body: &str) -> Option<i128> {
    let mut chars = body.chars();
    let value = match chars.next()? {
        '\\' => match decode_escape(&mut chars, '\'')? {
            Escaped::Byte(b) => b as i128,
            Escaped::Char(c) => c as i128,
        },
        c => c as i128,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(value)
}

/// Quote `s` as a Go interpreted string literal, escaping the same
/// characters `strconv.Quote` does. Bytes that are not part of valid UTF-8
/// become `\x` escapes.
pub fn go_quote(s: &[u8]) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for chunk in s.utf8_chunks() {
        for c in chunk.valid().chars() {
            quote_char(&mut out, c);
        }
        for b in chunk.invalid() {
            out.push_str(&format!("\\x{b:02x}"));
        }
    }
    out.push('"');
    out
}

fn quote_char(out: &mut String, c: char) {
    match c {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '\u{07}' => out.push_str("\\a"),
        '\u{08}' => out.push_str("\\b"),
        '\u{0c}' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{0b}' => out.push_str("\\v"),
        c if is_printable(c) => out.push(c),
        c if (c as u32) < 0x80 => out.push_str(&format!("\\x{:02x}", c as u32)),
        c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
        c => out.push_str(&format!("\\U{:08x}", c as u32)),
    }
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control()
        || c.is_whitespace()
        || matches!(
            c,
            '\u{ad}'
                | '\u{200b}'..='\u{200f}'
                | '\u{2028}'..='\u{202e}'
                | '\u{2060}'..='\u{206f}'
                | '\u{feff}'
                | '\u{fff9}'..='\u{fffb}'
        ))
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        format!("{f}")
    }
}
