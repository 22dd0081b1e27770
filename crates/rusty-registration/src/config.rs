// File: src/config.rs
// Purpose: Configuration parsing from registration.toml

use crate::ports::ConfigurationSource;
use crate::rules::RuleSet;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub plugin: PluginConfig,

    /// Rule-sets keyed by controller, then by validation name
    #[serde(default)]
    pub settings: ValidationSettings,
}

/// Plugin naming
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Prefix shared by all plugin parameter namespaces (default: "tx_femanager")
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Extension name the settings are registered under (default: "Femanager")
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// `controller -> validation name -> rule-set`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ValidationSettings {
    controllers: BTreeMap<String, BTreeMap<String, RuleSet>>,
}

// Default values
fn default_prefix() -> String {
    "tx_femanager".to_string()
}

fn default_extension() -> String {
    "Femanager".to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            extension: default_extension(),
        }
    }
}

impl ValidationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, controller: &str, validation: &str, rule_set: RuleSet) -> Self {
        self.insert(controller, validation, rule_set);
        self
    }

    pub fn insert(&mut self, controller: &str, validation: &str, rule_set: RuleSet) {
        self.controllers
            .entry(controller.to_string())
            .or_default()
            .insert(validation.to_string(), rule_set);
    }

    /// Rule-set at `[controller][validation]`
    pub fn rule_set(&self, controller: &str, validation: &str) -> Option<&RuleSet> {
        self.controllers.get(controller)?.get(validation)
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./registration.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("registration.toml")
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }
}

impl ConfigurationSource for Config {
    fn validation_settings(&self, extension: &str) -> ValidationSettings {
        if extension == self.plugin.extension {
            self.settings.clone()
        } else {
            tracing::debug!("No validation settings registered for extension {}", extension);
            ValidationSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, RuleKind};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        [plugin]
        prefix = "tx_femanager"

        [settings.new.validation.username]
        required = 1
        uniqueInDb = 1
        min = 3

        [settings.new.validation.email]
        required = 1
        email = 1

        [settings.invitation.validationEdit.password]
        required = 1
        mustInclude = "number,uppercase"
    "#;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.plugin.prefix, "tx_femanager");
        assert_eq!(config.plugin.extension, "Femanager");
        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_toml("  \n").unwrap();
        assert_eq!(config.plugin.prefix, "tx_femanager");
        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load("does/not/exist/registration.toml").unwrap();
        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_settings_lookup() {
        let config = Config::from_toml(SAMPLE).unwrap();

        let new = config.settings.rule_set("new", "validation").unwrap();
        assert_eq!(new.len(), 2);
        assert_eq!(
            new.get("username").unwrap().rules,
            vec![
                Rule::new(RuleKind::Required, "1"),
                Rule::new(RuleKind::UniqueDb, "1"),
                Rule::new(RuleKind::Min, "3"),
            ]
        );

        let invitation = config
            .settings
            .rule_set("invitation", "validationEdit")
            .unwrap();
        assert_eq!(
            invitation.get("password").unwrap().rules[1],
            Rule::new(RuleKind::MustInclude, "number,uppercase")
        );

        assert!(config.settings.rule_set("edit", "validation").is_none());
    }

    #[test]
    fn test_configuration_source_by_extension() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert!(!config.validation_settings("Femanager").is_empty());
        assert!(config.validation_settings("Other").is_empty());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = Config::from_toml("[settings.new").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
