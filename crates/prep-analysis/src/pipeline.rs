//! End-to-end run: locate, load, extract, generate, write.

use std::path::PathBuf;

use serde::Serialize;

use prep_core::errors::{LoadError, PipelineError};
use prep_core::PrepConfig;

use crate::emit::{generate_code, unique_sorted, write_generated};
use crate::package::{locate_package, PackageLoader};
use crate::queries::extract_queries;

/// Which package to process.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    /// Import path, used for location and in the `go:generate` directive.
    pub import_path: String,
    /// Package directory; skips import path resolution when set.
    pub dir: Option<PathBuf>,
    /// Where module lookup (`go.mod`) starts.
    pub search_root: PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PrepReport {
    pub package_name: String,
    pub import_path: String,
    pub package_dir: PathBuf,
    pub output_path: PathBuf,
    pub written: bool,
    pub file_count: usize,
    /// Resolved values before deduplication.
    pub resolved_count: usize,
    /// Unique, sorted query values.
    pub queries: Vec<String>,
    #[serde(skip)]
    pub code: String,
}

/// Run prep for one package.
pub fn run(config: &PrepConfig, spec: &PackageSpec) -> Result<PrepReport, PipelineError> {
    let span = tracing::info_span!("prep", import_path = %spec.import_path);
    let _guard = span.enter();

    let dir = match &spec.dir {
        Some(dir) => dir.canonicalize().map_err(|source| LoadError::Io {
            path: dir.clone(),
            source,
        })?,
        None => locate_package(
            &spec.import_path,
            &spec.search_root,
            &config.package.effective_gopath(),
        )?,
    };

    let file_name = config.output.effective_file_name();
    let mut loader =
        PackageLoader::new(config.package.effective_include_tests())?.skip_file(file_name);
    let package = loader.load_dir(&dir)?;

    let resolved = extract_queries(&package)?;
    let queries = unique_sorted(&resolved);
    let code = generate_code(&package.name, &spec.import_path, &queries);

    let output_path = dir.join(file_name);
    let written = if config.output.effective_dry_run() {
        false
    } else {
        write_generated(&dir, file_name, &code)?;
        true
    };

    tracing::info!(
        package = %package.name,
        files = package.file_count(),
        resolved = resolved.len(),
        unique = queries.len(),
        written,
        "prepared statements generated"
    );

    Ok(PrepReport {
        package_name: package.name.clone(),
        import_path: spec.import_path.clone(),
        package_dir: dir,
        output_path,
        written,
        file_count: package.file_count(),
        resolved_count: resolved.len(),
        queries,
        code,
    })
}
