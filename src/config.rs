//! Configuration file schema for cpcheck.
//!
//! A config file tunes the scanner and the HTTP service. Every field is
//! optional; an absent file means defaults throughout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detect::{IssueType, DEFAULT_SNIPPET_CONTEXT};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["cpcheck.yaml", ".cpcheck.yaml"];

/// Default address for `cpcheck serve`.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

/// Errors raised while loading or validating a config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unknown issue type {0:?} in disabled_checks")]
    UnknownIssueType(String),
    #[error("listen address must not be empty")]
    EmptyListen,
}

/// Top-level config definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Characters of context on each side of a statement snippet (default: 60)
    #[serde(default = "default_snippet_context")]
    pub snippet_context: usize,
    /// Issue type names that are never reported
    #[serde(default)]
    pub disabled_checks: Vec<String>,
    /// Socket address for the HTTP service
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Scan batches on the rayon thread pool (default: true)
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_snippet_context() -> usize {
    DEFAULT_SNIPPET_CONTEXT
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snippet_context: default_snippet_context(),
            disabled_checks: Vec::new(),
            listen: default_listen(),
            parallel: true,
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config from YAML text. An empty document yields defaults.
    pub fn parse_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load the config at `path`, or discover one in `dir`, or fall back to defaults.
    pub fn load(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::parse_file(p)?,
            None => match discover(dir) {
                Some(p) => Self::parse_file(p)?,
                None => Self::default(),
            },
        };
        validate(&config)?;
        Ok(config)
    }

    /// Disabled checks as issue types. Unknown names are skipped.
    pub fn disabled_issue_types(&self) -> Vec<IssueType> {
        self.disabled_checks
            .iter()
            .filter_map(|name| IssueType::parse(name))
            .collect()
    }
}

/// Find a config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Check a config for values the scanner cannot use.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for name in &config.disabled_checks {
        if IssueType::parse(name).is_none() {
            return Err(ConfigError::UnknownIssueType(name.clone()));
        }
    }

    if config.listen.trim().is_empty() {
        return Err(ConfigError::EmptyListen);
    }

    Ok(())
}

/// Default config written by `cpcheck init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# cpcheck configuration

# Characters of source kept on each side of a statement in snippets.
snippet_context: 60

# Issue types to suppress. Valid names:
#   TranslateObsoleteCodepage, TranslateLegacyCp1Cp2,
#   TranslateMissingFromTo, TranslateNonCharacterRisk
disabled_checks: []

# Address for `cpcheck serve`.
listen: "127.0.0.1:8000"

# Scan units of a batch in parallel.
parallel: true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
snippet_context: 20
disabled_checks:
  - TranslateNonCharacterRisk
listen: "0.0.0.0:9000"
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert_eq!(config.snippet_context, 20);
        assert_eq!(
            config.disabled_issue_types(),
            vec![IssueType::TranslateNonCharacterRisk]
        );
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert!(config.parallel);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse_str("").unwrap();
        assert_eq!(config.snippet_context, DEFAULT_SNIPPET_CONTEXT);
        assert_eq!(config.listen, DEFAULT_LISTEN);
        assert!(config.disabled_checks.is_empty());
    }

    #[test]
    fn test_template_parses_and_validates() {
        let config = Config::parse_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(validate(&config).is_ok());
        assert_eq!(config.snippet_context, 60);
    }

    #[test]
    fn test_validate_rejects_unknown_issue_type() {
        let config = Config {
            disabled_checks: vec!["TranslateEverything".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::UnknownIssueType(name)) if name == "TranslateEverything"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_listen() {
        let config = Config {
            listen: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(validate(&config), Err(ConfigError::EmptyListen)));
    }

    #[test]
    fn test_load_discovers_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".cpcheck.yaml"), "snippet_context: 5\n").unwrap();

        let config = Config::load(None, temp.path()).unwrap();
        assert_eq!(config.snippet_context, 5);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(None, temp.path()).unwrap();
        assert_eq!(config.snippet_context, DEFAULT_SNIPPET_CONTEXT);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        std::fs::write(&path, "snippet_context: [1, 2\n").unwrap();

        let err = Config::load(Some(path.as_path()), temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }
}
