//! Tests for layered prep configuration.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use prep_core::config::prep_config::PROJECT_CONFIG_FILE;
use prep_core::config::{CliOverrides, PrepConfig};
use prep_core::errors::ConfigError;
use tempfile::TempDir;

/// Serializes tests that read or write process environment.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_VARS: &[&str] = &[
    "PREP_INCLUDE_TESTS",
    "PREP_GOPATH",
    "PREP_OUTPUT_FILE",
    "PREP_DRY_RUN",
];

/// Points `HOME` at an empty directory and clears `PREP_*` for the
/// lifetime of the guard.
struct IsolatedEnv {
    home: TempDir,
    old_home: Option<std::ffi::OsString>,
}

impl IsolatedEnv {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let old_home = std::env::var_os("HOME");
        std::env::set_var("HOME", home.path());
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        Self { home, old_home }
    }

    fn write_user_config(&self, content: &str) {
        let dir = self.home.path().join(".prep");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), content).unwrap();
    }
}

impl Drop for IsolatedEnv {
    fn drop(&mut self) {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        match &self.old_home {
            Some(home) => std::env::set_var("HOME", home),
            None => std::env::remove_var("HOME"),
        }
    }
}

#[test]
fn test_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let _env = IsolatedEnv::new();
    let project = TempDir::new().unwrap();

    let config = PrepConfig::load(project.path(), None).unwrap();
    assert!(config.package.effective_include_tests());
    assert_eq!(config.output.effective_file_name(), "prepared_statements.go");
    assert!(!config.output.effective_dry_run());
}

#[test]
fn test_project_overrides_user() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let env = IsolatedEnv::new();
    env.write_user_config("[package]\ninclude_tests = false\n\n[output]\nfile_name = \"user.go\"\n");

    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "[output]\nfile_name = \"project.go\"\n",
    )
    .unwrap();

    let config = PrepConfig::load(project.path(), None).unwrap();
    assert_eq!(config.output.effective_file_name(), "project.go");
    assert!(!config.package.effective_include_tests());
}

#[test]
fn test_env_overrides_project() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let _env = IsolatedEnv::new();
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "[output]\ndry_run = false\n",
    )
    .unwrap();
    std::env::set_var("PREP_DRY_RUN", "true");
    std::env::set_var("PREP_INCLUDE_TESTS", "not-a-bool");

    let config = PrepConfig::load(project.path(), None).unwrap();
    assert!(config.output.effective_dry_run());
    assert!(config.package.effective_include_tests());
}

#[test]
fn test_cli_overrides_everything() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let _env = IsolatedEnv::new();
    let project = TempDir::new().unwrap();
    std::env::set_var("PREP_OUTPUT_FILE", "env.go");

    let cli = CliOverrides {
        include_tests: Some(false),
        output_file: Some("cli.go".to_string()),
        dry_run: Some(true),
    };
    let config = PrepConfig::load(project.path(), Some(&cli)).unwrap();
    assert_eq!(config.output.effective_file_name(), "cli.go");
    assert!(!config.package.effective_include_tests());
    assert!(config.output.effective_dry_run());
}

#[test]
fn test_gopath_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let env = IsolatedEnv::new();
    let old_gopath = std::env::var_os("GOPATH");
    std::env::remove_var("GOPATH");

    let config = PrepConfig::default();
    assert_eq!(
        config.package.effective_gopath(),
        vec![env.home.path().join("go")]
    );

    let joined = std::env::join_paths(["/opt/go", "/srv/go"]).unwrap();
    std::env::set_var("GOPATH", &joined);
    assert_eq!(
        config.package.effective_gopath(),
        vec![PathBuf::from("/opt/go"), PathBuf::from("/srv/go")]
    );

    let config = PrepConfig::from_toml("[package]\ngopath = \"/custom\"\n").unwrap();
    assert_eq!(
        config.package.effective_gopath(),
        vec![PathBuf::from("/custom")]
    );

    match old_gopath {
        Some(v) => std::env::set_var("GOPATH", v),
        None => std::env::remove_var("GOPATH"),
    }
}

#[test]
fn test_invalid_project_config_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let _env = IsolatedEnv::new();
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(PROJECT_CONFIG_FILE), "[output\n").unwrap();

    let err = PrepConfig::load(project.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_output_file_name_validation() {
    for bad in ["", "gen/out.go", "out\\gen.go", "statements.txt"] {
        let mut config = PrepConfig::default();
        config.output.file_name = Some(bad.to_string());
        let err = PrepConfig::validate(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "output.file_name"),
            "{bad:?} should be rejected"
        );
    }

    let mut config = PrepConfig::default();
    config.output.file_name = Some("queries_gen.go".to_string());
    assert!(PrepConfig::validate(&config).is_ok());
}

#[test]
fn test_unknown_keys_ignored_and_toml_round_trip() {
    let config = PrepConfig::from_toml(
        "[package]\ninclude_tests = false\nfuture_option = 3\n\n[output]\ndry_run = true\n",
    )
    .unwrap();
    assert!(!config.package.effective_include_tests());

    let rendered = config.to_toml().unwrap();
    let reparsed = PrepConfig::from_toml(&rendered).unwrap();
    assert_eq!(reparsed.package.include_tests, Some(false));
    assert_eq!(reparsed.output.dry_run, Some(true));
}
