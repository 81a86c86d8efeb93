//! Validator configuration file
//!
//! `validation_config.yaml` may tune the builtin service domains, the
//! nesting limit and which documents are picked up. Keys this validator
//! does not use are ignored, so the file can be shared with other tools.

use std::fs;
use std::path::Path;

use haref_core::traversal::DEFAULT_MAX_DEPTH;
use haref_core::{ValidationOptions, DEFAULT_BUILTIN_DOMAINS};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "validation_config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Service domains accepted without a registry entry
    pub builtin_service_domains: Vec<String>,
    pub max_depth: usize,
    /// Top-level file names never validated
    pub skip_files: Vec<String>,
    /// Top-level file names validated with a dashboard root
    pub dashboard_files: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            builtin_service_domains: DEFAULT_BUILTIN_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            skip_files: vec!["secrets.yaml".to_string()],
            dashboard_files: vec!["ui-lovelace.yaml".to_string()],
        }
    }
}

impl ValidatorConfig {
    /// Read the configuration file at `path`
    ///
    /// Never fails: a missing file gives the defaults, an unreadable or
    /// invalid one logs a warning and gives the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                component = module_path!(),
                path = %path.display(),
                "config file not found, using defaults"
            );
            return Self::default();
        }
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_yaml(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => config,
            Err(reason) => {
                tracing::warn!(
                    component = module_path!(),
                    path = %path.display(),
                    "invalid config file, using defaults: {}",
                    reason
                );
                Self::default()
            }
        }
    }

    /// Parse configuration text; an empty document gives the defaults
    ///
    /// # Errors
    ///
    /// The YAML error if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn is_skipped(&self, file_name: &str) -> bool {
        self.skip_files.iter().any(|f| f == file_name)
    }

    pub fn is_dashboard(&self, file_name: &str) -> bool {
        self.dashboard_files.iter().any(|f| f == file_name)
    }

    pub fn to_options(&self, verbose: bool) -> ValidationOptions {
        ValidationOptions {
            builtin_domains: self.builtin_service_domains.iter().cloned().collect(),
            verbose,
            max_depth: self.max_depth,
        }
    }
}
