//! Package loader: discovers, parses, and selects the files of one package.

use std::fs;
use std::path::{Path, PathBuf};

use prep_core::errors::{LoadError, ParseError};

use super::symbols::{collect_definitions, Definition};
use crate::parsers::{GoParser, ParsedFile};

/// A parsed Go package: the input to constant-table construction and the
/// query finder.
#[derive(Debug)]
pub struct Package {
    pub name: String,
    pub dir: PathBuf,
    /// Files in file-name order; includes `_test.go` files of the same package
    /// when tests are enabled.
    pub files: Vec<ParsedFile>,
    /// Definitions from the non-test files, with constant values evaluated.
    pub definitions: Vec<Definition>,
}

impl Package {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn constants(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter().filter(|d| d.is_const())
    }
}

/// Loads one package directory at a time.
pub struct PackageLoader {
    parser: GoParser,
    include_tests: bool,
    skip_files: Vec<String>,
}

impl PackageLoader {
    pub fn new(include_tests: bool) -> Result<Self, ParseError> {
        Ok(Self {
            parser: GoParser::new()?,
            include_tests,
            skip_files: Vec::new(),
        })
    }

    /// Never read the file with this name (e.g. a previously generated output).
    pub fn skip_file(mut self, file_name: impl Into<String>) -> Self {
        self.skip_files.push(file_name.into());
        self
    }

    /// Load every Go file directly inside `dir`.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Package, LoadError> {
        let paths = self.discover(dir)?;
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let source = fs::read_to_string(&path).map_err(|source| {
                if source.kind() == std::io::ErrorKind::InvalidData {
                    LoadError::Parse(ParseError::InvalidUtf8 { path: path.clone() })
                } else {
                    LoadError::Io {
                        path: path.clone(),
                        source,
                    }
                }
            })?;
            sources.push((path, source));
        }
        self.load_sources(dir, sources)
    }

    /// Load a package from in-memory sources, in the order given.
    pub fn load_sources(
        &mut self,
        dir: &Path,
        sources: Vec<(PathBuf, String)>,
    ) -> Result<Package, LoadError> {
        let mut files = Vec::with_capacity(sources.len());
        for (path, source) in sources {
            if !self.include_tests && is_test_file(&path) {
                continue;
            }
            files.push(self.parser.parse(source, &path)?);
        }

        let name = select_package_name(&files).ok_or_else(|| LoadError::NoGoFiles {
            dir: dir.to_path_buf(),
        })?;

        files.retain(|f| {
            let keep = f.package_name.as_deref() == Some(name.as_str());
            if !keep {
                tracing::debug!(
                    path = %f.path.display(),
                    package = f.package_name.as_deref().unwrap_or(""),
                    "skipping file from another package"
                );
            }
            keep
        });

        let own: Vec<&ParsedFile> = files.iter().filter(|f| !f.is_test).collect();
        let definitions = collect_definitions(&own);

        tracing::debug!(
            package = %name,
            files = files.len(),
            definitions = definitions.len(),
            "loaded package"
        );

        Ok(Package {
            name,
            dir: dir.to_path_buf(),
            files,
            definitions,
        })
    }

    /// `*.go` files directly in `dir`, sorted by name.
    fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".go") || !path.is_file() {
                continue;
            }
            if self.skip_files.iter().any(|s| s == name) {
                continue;
            }
            if !self.include_tests && is_test_file(&path) {
                continue;
            }
            paths.push(path);
        }

        if paths.is_empty() {
            return Err(LoadError::NoGoFiles {
                dir: dir.to_path_buf(),
            });
        }
        paths.sort();
        Ok(paths)
    }
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

/// The package clause of the first non-test file, else of the first file.
fn select_package_name(files: &[ParsedFile]) -> Option<String> {
    files
        .iter()
        .filter(|f| !f.is_test)
        .find_map(|f| f.package_name.clone())
        .or_else(|| files.iter().find_map(|f| f.package_name.clone()))
}
