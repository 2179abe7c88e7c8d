// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule engine for commit validation.

use crate::commit::CommitMessage;
use crate::config::LintConfig;
use crate::error::Result;
use crate::git;

use super::builtin::{apply_builtin_rules, apply_custom_rules, empty_message_issue, Rule};
use super::validator::ValidationResult;

/// Rule engine for validating commit messages.
#[derive(Debug)]
pub struct RuleEngine {
    config: LintConfig,
    ignores: Vec<glob::Pattern>,
    extra_rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Create a new rule engine with the given configuration.
    pub fn new(config: LintConfig) -> Self {
        let ignores = config
            .ignores
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!("Ignoring invalid ignore pattern '{}': {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            config,
            ignores,
            extra_rules: Vec::new(),
        }
    }

    /// Create a rule engine over the built-in configuration.
    pub fn builtin() -> Self {
        Self::new(LintConfig::builtin().clone())
    }

    /// The configuration this engine evaluates.
    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Add a rule to the engine.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.extra_rules.push(rule);
    }

    /// Whether a header matches one of the ignore patterns.
    pub fn is_ignored(&self, header: &str) -> bool {
        self.ignores.iter().any(|pattern| pattern.matches(header))
    }

    /// Validate a parsed commit message.
    pub fn validate(&self, message: &CommitMessage) -> ValidationResult {
        let mut result = ValidationResult::new(message.header.clone());

        if self.is_ignored(&message.header) {
            tracing::debug!("Header '{}' matches an ignore pattern", message.header);
            result.ignored = true;
            return result;
        }

        for issue in apply_builtin_rules(message, &self.config) {
            result.push(issue);
        }

        for issue in apply_custom_rules(message, &self.config) {
            result.push(issue);
        }

        for rule in &self.extra_rules {
            tracing::debug!("Applying rule {}", rule.name());
            for issue in rule.check(message, &self.config) {
                result.push(issue);
            }
        }

        result
    }

    /// Validate a raw commit message.
    ///
    /// An empty message is reported as an issue rather than an error.
    pub fn validate_str(&self, raw: &str) -> ValidationResult {
        match CommitMessage::parse(raw) {
            Ok(message) => {
                let mut result = self.validate(&message);
                result.message = raw.trim_end().to_string();
                result
            }
            Err(e) => {
                tracing::debug!("Message did not parse: {}", e);
                let mut result = ValidationResult::new(raw);
                result.push(empty_message_issue(&self.config));
                result
            }
        }
    }

    /// Check a specific commit by reference.
    pub fn check_commit(&self, reference: &str) -> Result<ValidationResult> {
        let (oid, message) = git::get_commit(reference)?;
        let mut result = self.validate_str(&message);
        result.commit_sha = Some(oid);
        Ok(result)
    }

    /// Check a range of commits.
    pub fn check_range(&self, range: &str) -> Result<Vec<ValidationResult>> {
        let commits = git::get_commit_range(range)?;

        Ok(commits
            .into_iter()
            .map(|(oid, message)| {
                let mut result = self.validate_str(&message);
                result.commit_sha = Some(oid);
                result
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MessageKey, Severity};
    use crate::rules::ValidationIssue;

    #[test]
    fn test_valid_message() {
        let engine = RuleEngine::builtin();
        let result = engine.validate_str(
            "feat(core): add rule engine\n\nEvaluate each configured rule against the message.",
        );
        assert!(result.is_valid(), "{:?}", result.errors);
        assert_eq!(result.issue_count(), 0);
    }

    #[test]
    fn test_missing_scope_flagged() {
        let engine = RuleEngine::builtin();
        let result = engine.validate_str("feat: add x");

        assert!(!result.is_valid());
        let issue = result
            .errors
            .iter()
            .find(|e| e.code == "scope-empty")
            .expect("scope-empty should fire");
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_empty_message() {
        let engine = RuleEngine::builtin();
        let result = engine.validate_str("\n\n");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            engine
                .config()
                .custom_rules
                .messages
                .render(MessageKey::CannotBeEmpty, &[])
        );
    }

    #[test]
    fn test_ignored_merge_commit() {
        let engine = RuleEngine::builtin();
        let result = engine.validate_str("Merge branch 'main' into feature/x");

        assert!(result.ignored);
        assert!(result.is_valid());
        assert_eq!(result.issue_count(), 0);
    }

    #[test]
    fn test_custom_ignores() {
        let mut config = LintConfig::default();
        config.ignores = vec!["WIP*".to_string(), "[".to_string()];
        let engine = RuleEngine::new(config);

        assert!(engine.is_ignored("WIP: scratch"));
        assert!(!engine.is_ignored("Merge branch 'main'"));
    }

    #[test]
    fn test_warning_severity_keeps_result_valid() {
        let toml = r#"
[rules]
scope-empty = [1, "never"]
"#;
        let config = crate::config::parse_config(toml, crate::config::ConfigFormat::Toml).unwrap();
        let engine = RuleEngine::new(config);
        let result = engine.validate_str("fix: patch the parser\n\nHandle trailing commas.");

        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, "scope-empty");
    }

    #[derive(Debug)]
    struct NoWipRule;

    impl Rule for NoWipRule {
        fn check(&self, message: &CommitMessage, _config: &LintConfig) -> Vec<ValidationIssue> {
            if message.header.contains("wip") {
                vec![ValidationIssue {
                    code: "no-wip".to_string(),
                    message: "Work in progress".to_string(),
                    severity: Severity::Warn,
                    line: Some(1),
                }]
            } else {
                Vec::new()
            }
        }

        fn name(&self) -> &str {
            "no-wip"
        }
    }

    #[test]
    fn test_extra_rule() {
        let mut engine = RuleEngine::builtin();
        engine.add_rule(Box::new(NoWipRule));

        let result = engine.validate_str("chore(ci): wip pipeline\n\nStill tuning caches.");
        assert!(result.is_valid());
        assert!(result.has_code("no-wip"));
    }
}
