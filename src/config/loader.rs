// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration loading and merging.
//!
//! Override files are partial: every key they set replaces the built-in
//! value, everything else is inherited.

use crate::error::{CgError, ConfigError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::schema::{LintConfig, MessageKey, RuleEntry, RuleName};

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &["cg.toml", ".cg.toml", ".config/cg.toml", ".cg.json"];

/// Format of an override file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, defaulting to TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// A partial configuration as written in an override file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverlay {
    pub ignores: Option<Vec<String>>,
    pub rules: BTreeMap<RuleName, RuleEntry>,
    pub custom_rules: CustomRulesOverlay,
}

/// Partial `customRules` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomRulesOverlay {
    pub body_required_for_types: Option<BTreeSet<String>>,
    pub enforce_breaking_change_consistency: Option<bool>,
    pub footer_counts_as_body: Option<bool>,
    pub messages: BTreeMap<MessageKey, String>,
}

impl ConfigOverlay {
    /// Apply this overlay on top of a base configuration.
    pub fn apply(self, mut base: LintConfig) -> LintConfig {
        if let Some(ignores) = self.ignores {
            base.ignores = ignores;
        }

        for (name, entry) in self.rules {
            tracing::debug!("Overriding rule {}", name);
            base.rules.insert(name, entry);
        }

        let custom = self.custom_rules;
        if let Some(types) = custom.body_required_for_types {
            base.custom_rules.body_required_for_types = types;
        }
        if let Some(enforce) = custom.enforce_breaking_change_consistency {
            base.custom_rules.enforce_breaking_change_consistency = enforce;
        }
        if let Some(counts) = custom.footer_counts_as_body {
            base.custom_rules.footer_counts_as_body = counts;
        }
        for (key, template) in custom.messages {
            base.custom_rules.messages.insert(key, template);
        }

        base
    }
}

/// Find the configuration file in the current directory or parent directories.
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_config_file_from(&current_dir)
}

/// Find the configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for config_name in CONFIG_FILES {
            let config_path = current.join(config_name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    if let Some(home) = dirs::home_dir() {
        for config_name in CONFIG_FILES {
            let config_path = home.join(config_name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }
    }

    // XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        let cg_config = config_dir.join("cg").join("config.toml");
        if cg_config.is_file() {
            return Some(cg_config);
        }
    }

    None
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<LintConfig> {
    match find_config_file() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("No configuration file found, using built-in rules");
            Ok(LintConfig::builtin().clone())
        }
    }
}

/// Load an override file and merge it over the built-in configuration.
pub fn load_config_from(path: &Path) -> Result<LintConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(CgError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        CgError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    parse_config(&content, ConfigFormat::from_path(path))
}

/// Parse an override document and merge it over the built-in configuration.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LintConfig> {
    let overlay = parse_overlay(content, format)?;
    let config = merge_configs(LintConfig::builtin().clone(), overlay);
    config.validate()?;
    Ok(config)
}

/// Parse an override document without merging.
pub fn parse_overlay(content: &str, format: ConfigFormat) -> Result<ConfigOverlay> {
    match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
            CgError::Config(ConfigError::ParseError {
                message: format!("Failed to parse TOML: {}", e),
            })
        }),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
            CgError::Config(ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
            })
        }),
    }
}

/// Merge an overlay into a base configuration, with the overlay taking precedence.
pub fn merge_configs(base: LintConfig, overlay: ConfigOverlay) -> LintConfig {
    overlay.apply(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Applicability, RuleParam, Severity};
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_config_is_builtin() {
        let config = parse_config("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, *LintConfig::builtin());
    }

    #[test]
    fn test_parse_rule_override() {
        let toml = r#"
[rules]
header-max-length = [1, "always", 100]
scope-empty = [0, "never"]
"#;
        let config = parse_config(toml, ConfigFormat::Toml).unwrap();

        let header = config.rule(RuleName::HeaderMaxLength).unwrap();
        assert_eq!(header.severity, Severity::Warn);
        assert_eq!(header.param, Some(RuleParam::Integer(100)));

        let scope = config.rule(RuleName::ScopeEmpty).unwrap();
        assert!(!scope.is_enabled());

        // Untouched rules keep their built-in values
        assert_eq!(
            config.rule(RuleName::BodyMaxLineLength),
            LintConfig::builtin().rule(RuleName::BodyMaxLineLength)
        );
    }

    #[test]
    fn test_parse_custom_rules_override() {
        let toml = r#"
[customRules]
bodyRequiredForTypes = ["feat"]
footerCountsAsBody = false

[customRules.messages]
headerTooLong = "Header has {length} characters, limit is {max}"
"#;
        let config = parse_config(toml, ConfigFormat::Toml).unwrap();
        let custom = &config.custom_rules;

        assert_eq!(custom.body_required_for_types.len(), 1);
        assert!(custom.body_required_for_types.contains("feat"));
        assert!(!custom.footer_counts_as_body);
        assert!(custom.enforce_breaking_change_consistency);
        assert_eq!(
            custom.messages.get(MessageKey::HeaderTooLong),
            Some("Header has {length} characters, limit is {max}")
        );
        assert_eq!(
            custom.messages.get(MessageKey::CannotBeEmpty),
            Some("Commit message cannot be empty")
        );
    }

    #[test]
    fn test_parse_json_override() {
        let json = r#"{
            "rules": { "type-enum": [2, "always", ["feat", "fix", "docs"]] },
            "ignores": []
        }"#;
        let config = parse_config(json, ConfigFormat::Json).unwrap();

        let types = config.rule(RuleName::TypeEnum).unwrap();
        assert_eq!(types.applicability, Applicability::Always);
        assert_eq!(
            types.param.as_ref().and_then(RuleParam::as_list).map(|l| l.len()),
            Some(3)
        );
        assert!(config.ignores.is_empty());
    }

    #[test]
    fn test_reject_unknown_rule() {
        let toml = r#"
[rules]
scope-enum = [2, "always", ["core"]]
"#;
        let result = parse_config(toml, ConfigFormat::Toml);
        assert!(matches!(
            result,
            Err(CgError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_reject_unknown_section() {
        let result = parse_config("[security]\nenabled = true\n", ConfigFormat::Toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_wrong_param_kind() {
        let toml = r#"
[rules]
header-max-length = [2, "always", "seventy-two"]
"#;
        let result = parse_config(toml, ConfigFormat::Toml);
        assert!(matches!(
            result,
            Err(CgError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_reject_unknown_placeholder() {
        let toml = r#"
[customRules.messages]
bodyLeadingBlank = "Blank line required after {header}"
"#;
        let result = parse_config(toml, ConfigFormat::Toml);
        assert!(matches!(
            result,
            Err(CgError::Config(ConfigError::UnknownPlaceholder { .. }))
        ));
    }

    #[test]
    fn test_reject_bad_severity() {
        let toml = r#"
[rules]
subject-empty = [3, "never"]
"#;
        assert!(parse_config(toml, ConfigFormat::Toml).is_err());
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("cg.toml"), "").unwrap();

        let found = find_config_file_from(&nested).unwrap();
        assert_eq!(found, dir.path().join("cg.toml"));
    }

    #[test]
    fn test_load_config_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config_from(&dir.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(CgError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".cg.json");
        std::fs::write(&path, r#"{ "customRules": { "footerCountsAsBody": false } }"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(!config.custom_rules.footer_counts_as_body);
    }

    #[test]
    fn test_loading_twice_is_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cg.toml");
        std::fs::write(&path, "[rules]\nsubject-min-length = [2, \"always\", 5]\n").unwrap();

        let first = load_config_from(&path).unwrap();
        let second = load_config_from(&path).unwrap();
        assert_eq!(first, second);
    }
}
