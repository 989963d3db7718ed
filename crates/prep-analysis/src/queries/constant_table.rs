//! Constant table: constant name to exact value, with duplicate
//! declarations marked ambiguous.

use serde::Serialize;

use prep_core::errors::ResolveError;
use prep_core::types::FxHashMap;

use crate::package::Definition;

/// One constant name in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantEntry {
    pub name: String,
    /// Exact value of the first declaration, when statically known.
    /// Never handed out once the entry is ambiguous.
    pub exact_value: Option<String>,
    /// Declared more than once in the package.
    pub ambiguous: bool,
}

/// Read-only after [`ConstantTable::build`].
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    entries: FxHashMap<String, ConstantEntry>,
}

impl ConstantTable {
    /// Build the table from a package's definitions. Only constant
    /// definitions count; every other kind is ignored.
    pub fn build<'a, I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = &'a Definition>,
    {
        let mut entries: FxHashMap<String, ConstantEntry> = FxHashMap::default();
        for def in definitions.into_iter().filter(|d| d.is_const()) {
            if let Some(entry) = entries.get_mut(&def.name) {
                if !entry.ambiguous {
                    tracing::debug!(
                        name = %def.name,
                        file = %def.file.display(),
                        line = def.line,
                        "constant declared more than once"
                    );
                }
                entry.ambiguous = true;
                continue;
            }
            entries.insert(
                def.name.clone(),
                ConstantEntry {
                    name: def.name.clone(),
                    exact_value: def.value.as_ref().map(|v| v.exact_string()),
                    ambiguous: false,
                },
            );
        }
        Self { entries }
    }

    /// Resolve a constant name to its exact value.
    ///
    /// `Ok(None)` for names that are not constants or whose value is not
    /// statically known; an error for names declared more than once.
    pub fn resolve(&self, name: &str) -> Result<Option<&str>, ResolveError> {
        match self.entries.get(name) {
            Some(entry) if entry.ambiguous => Err(ResolveError::AmbiguousConstant {
                name: name.to_string(),
            }),
            Some(entry) => Ok(entry.exact_value.as_deref()),
            None => Ok(None),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConstantEntry> {
        self.entries.get(name)
    }

    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.ambiguous)
    }

    /// Ambiguous names, sorted.
    pub fn ambiguous_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .values()
            .filter(|e| e.ambiguous)
            .map(|e| e.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
