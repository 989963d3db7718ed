//! prep: collect the SQL text passed to `database/sql` / `sqlx` context
//! methods in a Go package and write it to `prepared_statements.go`.
//!
//! ```bash
//! prep -f github.com/acme/shop/store
//! prep -f github.com/acme/shop/store --dir ./store --dry-run --print
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{CommandFactory, Parser};

use prep_analysis::pipeline::{self, PackageSpec};
use prep_core::config::CliOverrides;
use prep_core::{PrepConfig, PrepErrorCode};

#[derive(Parser, Debug)]
#[command(name = "prep", version)]
#[command(about = "Generate a prepared-statements file from the SQL queries of a Go package")]
struct Cli {
    /// source package import path, i.e. github.com/my/package
    #[arg(short = 'f', long = "package", value_name = "IMPORT_PATH")]
    package: Option<String>,

    /// Package directory; skips import path resolution
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Name of the generated file inside the package directory
    #[arg(long, value_name = "FILE")]
    output_file: Option<String>,

    /// Generate without writing the file
    #[arg(long)]
    dry_run: bool,

    /// Do not visit _test.go files
    #[arg(long)]
    no_tests: bool,

    /// Print the generated code to stdout
    #[arg(long)]
    print: bool,

    /// Print a JSON report to stdout
    #[arg(long, conflicts_with = "print")]
    json: bool,
}

fn main() -> ExitCode {
    prep_core::tracing::init_tracing();
    let cli = Cli::parse();

    let Some(import_path) = cli.package.clone() else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(&cli, import_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("prep: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, import_path: String) -> anyhow::Result<()> {
    let search_root = std::env::current_dir().context("cannot determine working directory")?;

    let overrides = CliOverrides {
        include_tests: cli.no_tests.then_some(false),
        output_file: cli.output_file.clone(),
        dry_run: cli.dry_run.then_some(true),
    };
    let config = PrepConfig::load(&search_root, Some(&overrides))
        .map_err(|e| anyhow!(e.diagnostic()))?;

    let spec = PackageSpec {
        import_path,
        dir: cli.dir.clone(),
        search_root,
    };
    let report = pipeline::run(&config, &spec).map_err(|e| anyhow!(e.diagnostic()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if cli.print {
        println!("{}", report.code);
    }

    tracing::debug!(output = %report.output_path.display(), written = report.written, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flag_f() {
        let cli = Cli::try_parse_from(["prep", "-f", "github.com/acme/store"]).unwrap();
        assert_eq!(cli.package.as_deref(), Some("github.com/acme/store"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_print_and_json_conflict() {
        let res = Cli::try_parse_from(["prep", "-f", "x", "--print", "--json"]);
        assert!(res.is_err());
    }
}
