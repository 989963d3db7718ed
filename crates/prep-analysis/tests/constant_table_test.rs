//! Constant table construction from package definitions.

use std::path::{Path, PathBuf};

use prep_analysis::package::{ConstValue, Definition, PackageLoader, SymbolKind};
use prep_analysis::queries::ConstantTable;
use prep_core::errors::ResolveError;

fn def(name: &str, kind: SymbolKind, value: Option<ConstValue>) -> Definition {
    Definition {
        name: name.to_string(),
        kind,
        file: PathBuf::from("defs.go"),
        line: 1,
        value,
    }
}

fn table_from(files: &[(&str, &str)]) -> ConstantTable {
    let sources = files
        .iter()
        .map(|(name, src)| (PathBuf::from(name), src.to_string()))
        .collect();
    let package = PackageLoader::new(true)
        .unwrap()
        .load_sources(Path::new("/virtual/store"), sources)
        .unwrap();
    ConstantTable::build(&package.definitions)
}

#[test]
fn test_only_constants_are_tabled() {
    let defs = vec![
        def("Q", SymbolKind::Const, Some(ConstValue::String("SELECT 1".into()))),
        def("v", SymbolKind::Var, None),
        def("Run", SymbolKind::Func, None),
        def("User", SymbolKind::Type, None),
    ];
    let table = ConstantTable::build(&defs);
    assert_eq!(table.len(), 1);
    assert_eq!(table.resolve("Q").unwrap(), Some("\"SELECT 1\""));
    assert_eq!(table.resolve("v").unwrap(), None);
    assert_eq!(table.resolve("missing").unwrap(), None);
}

#[test]
fn test_non_const_sharing_a_name_does_not_make_it_ambiguous() {
    let defs = vec![
        def("Q", SymbolKind::Const, Some(ConstValue::Int(1))),
        def("Q", SymbolKind::Var, None),
    ];
    let table = ConstantTable::build(&defs);
    assert!(!table.is_ambiguous("Q"));
    assert_eq!(table.resolve("Q").unwrap(), Some("1"));
}

#[test]
fn test_duplicate_constant_is_ambiguous() {
    let defs = vec![
        def("b", SymbolKind::Const, Some(ConstValue::Int(1))),
        def("a", SymbolKind::Const, Some(ConstValue::Int(1))),
        def("b", SymbolKind::Const, Some(ConstValue::Int(2))),
        def("a", SymbolKind::Const, None),
        def("c", SymbolKind::Const, None),
    ];
    let table = ConstantTable::build(&defs);
    assert_eq!(table.ambiguous_names(), vec!["a", "b"]);
    assert_eq!(
        table.resolve("b"),
        Err(ResolveError::AmbiguousConstant { name: "b".into() })
    );
    assert_eq!(table.resolve("c").unwrap(), None);

    let entry = table.get("b").unwrap();
    assert!(entry.ambiguous);
    assert_eq!(entry.exact_value.as_deref(), Some("1"));
}

#[test]
fn test_empty_table() {
    let table = ConstantTable::build(&Vec::<Definition>::new());
    assert!(table.is_empty());
    assert!(table.ambiguous_names().is_empty());
}

#[test]
fn test_iota_group_values() {
    let table = table_from(&[(
        "status.go",
        r#"package store

type Status int

const (
    Pending Status = iota
    Active
    _
    Closed
)

const (
    KB = 1 << (10 * (iota + 1))
    MB
)
"#,
    )]);
    assert_eq!(table.resolve("Pending").unwrap(), Some("0"));
    assert_eq!(table.resolve("Active").unwrap(), Some("1"));
    assert_eq!(table.resolve("Closed").unwrap(), Some("3"));
    assert_eq!(table.resolve("KB").unwrap(), Some("1024"));
    assert_eq!(table.resolve("MB").unwrap(), Some("1048576"));
    assert!(table.get("_").is_none());
}

#[test]
fn test_string_values_use_go_quoting() {
    let table = table_from(&[(
        "q.go",
        "package store\n\nconst (\n    tab = \"a\\tb\"\n    quoted = `say \"hi\"`\n    unicode = \"caf\\u00e9\"\n    typed string = \"x\" + \"y\"\n)\n",
    )]);
    assert_eq!(table.resolve("tab").unwrap(), Some("\"a\\tb\""));
    assert_eq!(table.resolve("quoted").unwrap(), Some("\"say \\\"hi\\\"\""));
    assert_eq!(table.resolve("unicode").unwrap(), Some("\"café\""));
    assert_eq!(table.resolve("typed").unwrap(), Some("\"xy\""));
}

#[test]
fn test_reference_across_files_and_declaration_order() {
    let table = table_from(&[
        (
            "a.go",
            r#"package store

const full = prefix + "users"
"#,
        ),
        (
            "b.go",
            r#"package store

const prefix = "SELECT * FROM "
"#,
        ),
    ]);
    assert_eq!(
        table.resolve("full").unwrap(),
        Some("\"SELECT * FROM users\"")
    );
}

#[test]
fn test_unknown_initializer_has_no_value() {
    let table = table_from(&[(
        "q.go",
        r#"package store

const (
    n = len(tables)
    cyc1 = cyc2
    cyc2 = cyc1
)
"#,
    )]);
    assert_eq!(table.resolve("n").unwrap(), None);
    assert_eq!(table.resolve("cyc1").unwrap(), None);
    assert!(table.get("n").is_some());
}

#[test]
fn test_local_and_package_constant_with_same_name() {
    let table = table_from(&[(
        "q.go",
        r#"package store

const limit = 10

func page() int {
    const limit = 20
    return limit
}
"#,
    )]);
    assert!(table.is_ambiguous("limit"));
}

#[test]
fn test_unsigned_and_overflowing_integer_constants() {
    let table = table_from(&[(
        "limits.go",
        r#"package store

const (
    maxUint = ^uint(0)
    maxByte = ^byte(0)
    big     = 1 << 127
    top     = -1 << 127
    untyped = ^0
)

const mask uint8 = 0x0f
const inverted = ^mask
const tooBig = uint8(256)
"#,
    )]);
    assert_eq!(
        table.resolve("maxUint").unwrap(),
        Some("18446744073709551615")
    );
    assert_eq!(table.resolve("maxByte").unwrap(), Some("255"));
    assert_eq!(table.resolve("big").unwrap(), None);
    assert_eq!(
        table.resolve("top").unwrap(),
        Some("-170141183460469231731687303715884105728")
    );
    assert_eq!(table.resolve("untyped").unwrap(), Some("-1"));
    assert_eq!(table.resolve("inverted").unwrap(), Some("240"));
    assert_eq!(table.resolve("tooBig").unwrap(), None);
}
