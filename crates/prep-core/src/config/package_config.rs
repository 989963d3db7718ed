//! Package discovery configuration.

use serde::{Deserialize, Serialize};

/// Configuration for locating and loading the source package.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PackageConfig {
    /// Visit `_test.go` files that belong to the package. Default: true.
    pub include_tests: Option<bool>,
    /// GOPATH override, `:`-separated. Default: `$GOPATH`, then `$HOME/go`.
    pub gopath: Option<String>,
}

impl PackageConfig {
    /// Returns the effective include_tests flag, defaulting to true.
    pub fn effective_include_tests(&self) -> bool {
        self.include_tests.unwrap_or(true)
    }

    /// Returns the GOPATH entries to search, in order.
    pub fn effective_gopath(&self) -> Vec<std::path::PathBuf> {
        let raw = self
            .gopath
            .clone()
            .or_else(|| std::env::var("GOPATH").ok().filter(|s| !s.is_empty()));

        match raw {
            Some(list) => std::env::split_paths(&list)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => super::prep_config::home_dir()
                .map(|h| vec![h.join("go")])
                .unwrap_or_default(),
        }
    }
}
