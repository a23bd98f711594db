//! # Service Configuration
//!
//! [`ServiceConfig`] carries the settings that shape a service at startup:
//! the binding policy handlers are built with and the schema documentation
//! endpoints. Every field has a default, so an empty file is a valid
//! configuration.
//!
//! ```yaml
//! binding: strict
//! docs:
//!   enabled: true
//!   json_path: /swagger/doc.json
//!   docs_path: /swagger
//!   title: Pet Store
//!   version: 2.1.0
//! ```
//!
//! ## Environment Overrides
//!
//! | variable | field |
//! |---|---|
//! | `IZROUTE_BINDING_POLICY` | `binding` (`lenient` or `strict`) |
//! | `IZROUTE_DOCS_ENABLED` | `docs.enabled` |
//! | `IZROUTE_DOCS_JSON_PATH` | `docs.json_path` |
//! | `IZROUTE_DOCS_PATH` | `docs.docs_path` |
//! | `IZROUTE_DOCS_TITLE` | `docs.title` |
//! | `IZROUTE_DOCS_VERSION` | `docs.version` |
//!
//! Values that do not parse are ignored with a warning.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::binding::{parse_bool, BindingPolicy};
use crate::schema::Info;

const ENV_PREFIX: &str = "IZROUTE_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Policy every handler is built with
    pub binding: BindingPolicy,
    pub docs: DocsConfig,
}

/// Schema document and viewer page settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub enabled: bool,
    /// Path serving the JSON schema document
    pub json_path: String,
    /// Path serving the HTML viewer
    pub docs_path: String,
    pub title: String,
    pub description: String,
    pub version: String,
    /// Favicon URL for the viewer page
    pub icon: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            json_path: "/openapi.json".to_string(),
            docs_path: "/docs".to_string(),
            title: "API".to_string(),
            description: String::new(),
            version: "1.0.0".to_string(),
            icon: None,
        }
    }
}

impl DocsConfig {
    /// `info` block of the generated document.
    #[must_use]
    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
        }
    }
}

impl ServiceConfig {
    /// Load from a YAML file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid YAML for this
    /// structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "Service configuration loaded");
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails on malformed YAML or unknown enum values.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Invalid service configuration")
    }

    /// Apply `IZROUTE_*` overrides from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_overrides(env::vars().filter(|(k, _)| k.starts_with(ENV_PREFIX)))
    }

    /// Apply `IZROUTE_*` overrides from `vars`. Unknown keys are ignored.
    #[must_use]
    pub fn apply_overrides<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            let value: String = value.into();
            match key {
                "IZROUTE_BINDING_POLICY" => match value.parse() {
                    Ok(policy) => self.binding = policy,
                    Err(_) => invalid(key, &value),
                },
                "IZROUTE_DOCS_ENABLED" => match parse_bool(&value) {
                    Some(enabled) => self.docs.enabled = enabled,
                    None => invalid(key, &value),
                },
                "IZROUTE_DOCS_JSON_PATH" => match normalize_path(&value) {
                    Some(path) => self.docs.json_path = path,
                    None => invalid(key, &value),
                },
                "IZROUTE_DOCS_PATH" => match normalize_path(&value) {
                    Some(path) => self.docs.docs_path = path,
                    None => invalid(key, &value),
                },
                "IZROUTE_DOCS_TITLE" => self.docs.title = value,
                "IZROUTE_DOCS_VERSION" => self.docs.version = value,
                _ => {}
            }
        }
        self
    }
}

fn invalid(key: &str, value: &str) {
    warn!(variable = %key, value = %value, "Ignoring invalid configuration override");
}

fn normalize_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.binding, BindingPolicy::Lenient);
        assert!(config.docs.enabled);
        assert_eq!(config.docs.json_path, "/openapi.json");
        assert_eq!(config.docs.docs_path, "/docs");
        assert_eq!(config.docs.version, "1.0.0");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ServiceConfig::from_yaml_str("binding: strict\ndocs:\n  title: Pets\n").unwrap();
        assert_eq!(config.binding, BindingPolicy::Strict);
        assert_eq!(config.docs.title, "Pets");
        assert_eq!(config.docs.json_path, "/openapi.json");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ServiceConfig::from_yaml_str("").unwrap(), ServiceConfig::default());
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        assert!(ServiceConfig::from_yaml_str("binding: sloppy").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::default().apply_overrides([
            ("IZROUTE_BINDING_POLICY", "strict"),
            ("IZROUTE_DOCS_ENABLED", "false"),
            ("IZROUTE_DOCS_JSON_PATH", "swagger/doc.json"),
            ("IZROUTE_DOCS_TITLE", "Pet Store"),
            ("IZROUTE_UNRELATED", "x"),
        ]);
        assert_eq!(config.binding, BindingPolicy::Strict);
        assert!(!config.docs.enabled);
        assert_eq!(config.docs.json_path, "/swagger/doc.json");
        assert_eq!(config.docs.title, "Pet Store");
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = ServiceConfig::default().apply_overrides([
            ("IZROUTE_BINDING_POLICY", "sloppy"),
            ("IZROUTE_DOCS_ENABLED", "maybe"),
            ("IZROUTE_DOCS_PATH", "  "),
        ]);
        assert_eq!(config, ServiceConfig::default());
    }
}
