// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! The shape mirrors the on-disk form:
//!
//! ```text
//! rules: { <rule-name>: [severity, "always"|"never", param?] }
//! customRules: { bodyRequiredForTypes, enforceBreakingChangeConsistency,
//!                footerCountsAsBody, messages: { <message-key>: template } }
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{CgError, ConfigError, Result};

lazy_static! {
    /// Matches `{name}` placeholders in message templates.
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

/// The full lint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintConfig {
    /// Glob patterns matched against the header; matching messages are skipped.
    pub ignores: Vec<String>,

    /// Rule thresholds keyed by rule name.
    pub rules: RulesTable,

    /// Checks that go beyond single-rule thresholds, plus message templates.
    pub custom_rules: CustomRulesConfig,
}

impl LintConfig {
    /// The built-in configuration, constructed once per process.
    pub fn builtin() -> &'static LintConfig {
        super::default::builtin()
    }

    /// Load the effective configuration from the default locations.
    pub fn load() -> Result<Self> {
        super::loader::load_config()
    }

    /// Load the effective configuration from a specific override file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        super::loader::load_config_from(path)
    }

    /// Look up a rule entry.
    pub fn rule(&self, name: RuleName) -> Option<&RuleEntry> {
        self.rules.get(name)
    }

    /// Check that the tables are complete, then every rule parameter,
    /// template and ignore pattern.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = RuleName::all().iter().find(|name| !self.rules.contains(**name)) {
            return Err(CgError::Config(ConfigError::InvalidValue {
                key: format!("rules.{}", name),
                message: "missing rule entry".to_string(),
            }));
        }

        if let Some(key) = MessageKey::all()
            .iter()
            .find(|key| self.custom_rules.messages.get(**key).is_none())
        {
            return Err(CgError::Config(ConfigError::InvalidValue {
                key: format!("customRules.messages.{}", key),
                message: "missing message template".to_string(),
            }));
        }

        for (name, entry) in self.rules.iter() {
            name.check_param(entry.param.as_ref())?;
        }

        for (key, template) in self.custom_rules.messages.iter() {
            for placeholder in placeholders_in(template) {
                if !key.placeholders().contains(&placeholder) {
                    return Err(CgError::Config(ConfigError::UnknownPlaceholder {
                        key: key.to_string(),
                        placeholder: placeholder.to_string(),
                    }));
                }
            }
        }

        for pattern in &self.ignores {
            glob::Pattern::new(pattern).map_err(|e| {
                CgError::Config(ConfigError::InvalidValue {
                    key: "ignores".to_string(),
                    message: format!("'{}': {}", pattern, e),
                })
            })?;
        }

        Ok(())
    }
}

/// Rule severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    /// Rule disabled.
    Off = 0,
    /// Violations are reported as warnings.
    Warn = 1,
    /// Violations are reported as errors.
    Error = 2,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, String> {
        match value {
            0 => Ok(Severity::Off),
            1 => Ok(Severity::Warn),
            2 => Ok(Severity::Error),
            other => Err(format!("invalid severity {} (expected 0, 1 or 2)", other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a rule asserts its condition or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Applicability {
    Always,
    Never,
}

impl Applicability {
    /// Whether an observed condition violates the rule.
    pub fn is_violated(&self, condition_holds: bool) -> bool {
        match self {
            Applicability::Always => !condition_holds,
            Applicability::Never => condition_holds,
        }
    }
}

/// The threshold parameter of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleParam {
    List(Vec<String>),
    Integer(usize),
    Text(String),
}

impl RuleParam {
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            RuleParam::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<usize> {
        match self {
            RuleParam::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleParam::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RuleParam::List(_) => "a list of strings",
            RuleParam::Integer(_) => "an integer",
            RuleParam::Text(_) => "a string",
        }
    }
}

impl From<usize> for RuleParam {
    fn from(n: usize) -> Self {
        RuleParam::Integer(n)
    }
}

impl From<&str> for RuleParam {
    fn from(s: &str) -> Self {
        RuleParam::Text(s.to_string())
    }
}

/// One rule's threshold: `[severity, applicability, param?]`.
///
/// The parameter slot is always present in memory; rules that take no
/// parameter hold `None` and are written as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleEntryRepr", into = "RuleEntryRepr")]
pub struct RuleEntry {
    pub severity: Severity,
    pub applicability: Applicability,
    pub param: Option<RuleParam>,
}

impl RuleEntry {
    /// Create an entry without a parameter.
    pub fn new(severity: Severity, applicability: Applicability) -> Self {
        Self {
            severity,
            applicability,
            param: None,
        }
    }

    /// Set the parameter.
    pub fn with_param(mut self, param: impl Into<RuleParam>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Whether the rule is switched on.
    pub fn is_enabled(&self) -> bool {
        self.severity != Severity::Off
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RuleEntryRepr {
    WithParam(Severity, Applicability, RuleParam),
    Bare(Severity, Applicability),
}

impl From<RuleEntryRepr> for RuleEntry {
    fn from(repr: RuleEntryRepr) -> Self {
        match repr {
            RuleEntryRepr::WithParam(severity, applicability, param) => Self {
                severity,
                applicability,
                param: Some(param),
            },
            RuleEntryRepr::Bare(severity, applicability) => Self::new(severity, applicability),
        }
    }
}

impl From<RuleEntry> for RuleEntryRepr {
    fn from(entry: RuleEntry) -> Self {
        match entry.param {
            Some(param) => RuleEntryRepr::WithParam(entry.severity, entry.applicability, param),
            None => RuleEntryRepr::Bare(entry.severity, entry.applicability),
        }
    }
}

/// The kind of parameter a rule expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    None,
    List,
    Integer,
    Text,
}

/// Names of the rules understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleName {
    TypeEnum,
    ScopeEmpty,
    SubjectEmpty,
    HeaderMaxLength,
    BodyMaxLineLength,
    FooterMaxLineLength,
    SubjectCase,
    SubjectFullStop,
    SubjectMinLength,
    BodyLeadingBlank,
}

impl RuleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::TypeEnum => "type-enum",
            RuleName::ScopeEmpty => "scope-empty",
            RuleName::SubjectEmpty => "subject-empty",
            RuleName::HeaderMaxLength => "header-max-length",
            RuleName::BodyMaxLineLength => "body-max-line-length",
            RuleName::FooterMaxLineLength => "footer-max-line-length",
            RuleName::SubjectCase => "subject-case",
            RuleName::SubjectFullStop => "subject-full-stop",
            RuleName::SubjectMinLength => "subject-min-length",
            RuleName::BodyLeadingBlank => "body-leading-blank",
        }
    }

    /// All rule names.
    pub fn all() -> &'static [RuleName] {
        &[
            RuleName::TypeEnum,
            RuleName::ScopeEmpty,
            RuleName::SubjectEmpty,
            RuleName::HeaderMaxLength,
            RuleName::BodyMaxLineLength,
            RuleName::FooterMaxLineLength,
            RuleName::SubjectCase,
            RuleName::SubjectFullStop,
            RuleName::SubjectMinLength,
            RuleName::BodyLeadingBlank,
        ]
    }

    /// The parameter kind this rule reads.
    pub fn param_kind(&self) -> ParamKind {
        match self {
            RuleName::TypeEnum => ParamKind::List,
            RuleName::HeaderMaxLength
            | RuleName::BodyMaxLineLength
            | RuleName::FooterMaxLineLength
            | RuleName::SubjectMinLength => ParamKind::Integer,
            RuleName::SubjectCase | RuleName::SubjectFullStop => ParamKind::Text,
            RuleName::ScopeEmpty | RuleName::SubjectEmpty | RuleName::BodyLeadingBlank => {
                ParamKind::None
            }
        }
    }

    fn check_param(&self, param: Option<&RuleParam>) -> Result<()> {
        let invalid = |message: String| {
            Err(CgError::Config(ConfigError::InvalidValue {
                key: self.as_str().to_string(),
                message,
            }))
        };

        match (self.param_kind(), param) {
            (ParamKind::None, None) => Ok(()),
            (ParamKind::None, Some(p)) => invalid(format!("takes no parameter, got {}", p.kind())),
            (_, None) => invalid("missing parameter".to_string()),
            (ParamKind::List, Some(RuleParam::List(_))) => Ok(()),
            (ParamKind::Integer, Some(RuleParam::Integer(_))) => Ok(()),
            (ParamKind::Text, Some(RuleParam::Text(text))) => {
                if *self == RuleName::SubjectCase && text.parse::<SubjectCase>().is_err() {
                    invalid(format!(
                        "unsupported case '{}' (expected lower-case, upper-case or sentence-case)",
                        text
                    ))
                } else {
                    Ok(())
                }
            }
            (kind, Some(p)) => invalid(format!(
                "expected {}, got {}",
                match kind {
                    ParamKind::List => "a list of strings",
                    ParamKind::Integer => "an integer",
                    _ => "a string",
                },
                p.kind()
            )),
        }
    }
}

impl std::str::FromStr for RuleName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RuleName::all()
            .iter()
            .find(|name| name.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown rule '{}'", s))
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RuleName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Mapping from rule name to entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulesTable(BTreeMap<RuleName, RuleEntry>);

impl RulesTable {
    pub fn get(&self, name: RuleName) -> Option<&RuleEntry> {
        self.0.get(&name)
    }

    pub fn contains(&self, name: RuleName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleName, &RuleEntry)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, name: RuleName, entry: RuleEntry) {
        self.0.insert(name, entry);
    }
}

impl FromIterator<(RuleName, RuleEntry)> for RulesTable {
    fn from_iter<I: IntoIterator<Item = (RuleName, RuleEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Settings for checks that span more than one part of the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRulesConfig {
    /// Commit types whose messages must carry a body.
    pub body_required_for_types: BTreeSet<String>,

    /// Require `!` in the header and a `BREAKING CHANGE:` footer to agree.
    pub enforce_breaking_change_consistency: bool,

    /// Let footer content satisfy the body requirement.
    pub footer_counts_as_body: bool,

    /// Message templates.
    pub messages: MessagesTable,
}

/// Keys of the message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKey {
    HeaderFormat,
    InvalidType,
    ScopeRequired,
    DescriptionRequired,
    DescriptionTooShort,
    LowercaseRequired,
    NoTrailingPeriod,
    HeaderTooLong,
    BodyRequiredForType,
    BodyLeadingBlank,
    BodyLineTooLong,
    FooterLineTooLong,
    BreakingNeedsFooter,
    FooterNeedsBang,
    CannotBeEmpty,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::HeaderFormat => "headerFormat",
            MessageKey::InvalidType => "invalidType",
            MessageKey::ScopeRequired => "scopeRequired",
            MessageKey::DescriptionRequired => "descriptionRequired",
            MessageKey::DescriptionTooShort => "descriptionTooShort",
            MessageKey::LowercaseRequired => "lowercaseRequired",
            MessageKey::NoTrailingPeriod => "noTrailingPeriod",
            MessageKey::HeaderTooLong => "headerTooLong",
            MessageKey::BodyRequiredForType => "bodyRequiredForType",
            MessageKey::BodyLeadingBlank => "bodyLeadingBlank",
            MessageKey::BodyLineTooLong => "bodyLineTooLong",
            MessageKey::FooterLineTooLong => "footerLineTooLong",
            MessageKey::BreakingNeedsFooter => "breakingNeedsFooter",
            MessageKey::FooterNeedsBang => "footerNeedsBang",
            MessageKey::CannotBeEmpty => "cannotBeEmpty",
        }
    }

    /// All message keys.
    pub fn all() -> &'static [MessageKey] {
        &[
            MessageKey::HeaderFormat,
            MessageKey::InvalidType,
            MessageKey::ScopeRequired,
            MessageKey::DescriptionRequired,
            MessageKey::DescriptionTooShort,
            MessageKey::LowercaseRequired,
            MessageKey::NoTrailingPeriod,
            MessageKey::HeaderTooLong,
            MessageKey::BodyRequiredForType,
            MessageKey::BodyLeadingBlank,
            MessageKey::BodyLineTooLong,
            MessageKey::FooterLineTooLong,
            MessageKey::BreakingNeedsFooter,
            MessageKey::FooterNeedsBang,
            MessageKey::CannotBeEmpty,
        ]
    }

    /// Placeholders the engine supplies when rendering this message.
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            MessageKey::InvalidType => &["type", "types"],
            MessageKey::DescriptionTooShort => &["length", "min"],
            MessageKey::LowercaseRequired => &["case"],
            MessageKey::NoTrailingPeriod => &["stop"],
            MessageKey::HeaderTooLong
            | MessageKey::BodyLineTooLong
            | MessageKey::FooterLineTooLong => &["length", "max"],
            MessageKey::BodyRequiredForType => &["type"],
            _ => &[],
        }
    }
}

impl std::str::FromStr for MessageKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MessageKey::all()
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown message key '{}'", s))
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for MessageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Mapping from message key to template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessagesTable(BTreeMap<MessageKey, String>);

impl MessagesTable {
    /// Get the raw template for a key.
    pub fn get(&self, key: MessageKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MessageKey, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render a template, substituting `{name}` placeholders from `vars`.
    ///
    /// Placeholders without a value are left as written. A missing template
    /// renders as the key itself.
    pub fn render(&self, key: MessageKey, vars: &[(&str, String)]) -> String {
        let Some(template) = self.get(key) else {
            tracing::warn!("No template for message '{}'", key);
            return key.to_string();
        };

        PLACEHOLDER_REGEX
            .replace_all(template, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                vars.iter()
                    .find(|(var, _)| *var == name)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    pub(crate) fn insert(&mut self, key: MessageKey, template: String) {
        self.0.insert(key, template);
    }
}

impl FromIterator<(MessageKey, String)> for MessagesTable {
    fn from_iter<I: IntoIterator<Item = (MessageKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extract the placeholder names used in a template.
pub fn placeholders_in(template: &str) -> Vec<&str> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Case styles accepted by `subject-case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectCase {
    /// First character is not uppercase.
    LowerCase,
    /// No lowercase characters at all.
    UpperCase,
    /// First character is not lowercase.
    SentenceCase,
}

impl SubjectCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectCase::LowerCase => "lower-case",
            SubjectCase::UpperCase => "upper-case",
            SubjectCase::SentenceCase => "sentence-case",
        }
    }

    /// Whether the subject is written in this case.
    pub fn matches(&self, subject: &str) -> bool {
        match self {
            SubjectCase::LowerCase => !subject.chars().next().is_some_and(char::is_uppercase),
            SubjectCase::UpperCase => !subject.chars().any(char::is_lowercase),
            SubjectCase::SentenceCase => !subject.chars().next().is_some_and(char::is_lowercase),
        }
    }
}

impl std::str::FromStr for SubjectCase {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lower-case" | "lowercase" => Ok(SubjectCase::LowerCase),
            "upper-case" | "uppercase" => Ok(SubjectCase::UpperCase),
            "sentence-case" | "sentencecase" => Ok(SubjectCase::SentenceCase),
            _ => Err(()),
        }
    }
}
