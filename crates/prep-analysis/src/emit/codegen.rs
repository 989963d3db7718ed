//! Generated source rendering.

use std::collections::BTreeSet;

/// Unique values in ascending byte order.
pub fn unique_sorted(queries: &[String]) -> Vec<String> {
    let unique: BTreeSet<&str> = queries.iter().map(String::as_str).collect();
    unique.into_iter().map(str::to_string).collect()
}

/// Render the Go file that registers `queries` for preparation.
///
/// Each query is emitted as-is: values are already Go literal text.
pub fn generate_code(package_name: &str, import_path: &str, queries: &[String]) -> String {
    if queries.is_empty() {
        return format!(
            "//go:generate prep -f {import_path}\n\npackage {package_name}\n\nfunc init() {{\n\tprepStatements = []string{{}}\n}}"
        );
    }

    format!(
        "//go:generate prep -f {import_path}\n\npackage {package_name}\n\nfunc init() {{\n\tprepStatements = []string{{\n\t\t{},\n\t}}\n}}",
        queries.join(",\n\t\t")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_sorted() {
        let input: Vec<String> = ["\"b\"", "\"a\"", "\"b\"", "`a`"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(unique_sorted(&input), vec!["\"a\"", "\"b\"", "`a`"]);
    }

    #[test]
    fn test_generate_empty() {
        let code = generate_code("store", "github.com/acme/store", &[]);
        assert_eq!(
            code,
            "//go:generate prep -f github.com/acme/store\n\npackage store\n\nfunc init() {\n\tprepStatements = []string{}\n}"
        );
    }

    #[test]
    fn test_generate_with_queries() {
        let queries = vec!["\"SELECT 1\"".to_string(), "`SELECT 2`".to_string()];
        let code = generate_code("store", "github.com/acme/store", &queries);
        assert_eq!(
            code,
            "//go:generate prep -f github.com/acme/store\n\npackage store\n\nfunc init() {\n\tprepStatements = []string{\n\t\t\"SELECT 1\",\n\t\t`SELECT 2`,\n\t}\n}"
        );
    }
}
