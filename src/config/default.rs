// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Built-in configuration values.

use lazy_static::lazy_static;

use super::schema::{
    Applicability, CustomRulesConfig, LintConfig, MessageKey, RuleEntry, RuleName, RuleParam,
    RulesTable, Severity,
};

/// Commit types accepted by `type-enum` and requiring a body.
const COMMIT_TYPES: &[&str] = &["feat", "fix", "chore", "refactor"];

/// Maximum line length for header, body and footer.
const MAX_LINE_LENGTH: usize = 72;

/// Headers skipped by default: generated merge, revert and autosquash commits.
const DEFAULT_IGNORES: &[&str] = &["Merge *", "Revert \"*", "fixup! *", "squash! *"];

lazy_static! {
    static ref BUILTIN: LintConfig = LintConfig::default();
}

/// The process-wide built-in configuration.
pub fn builtin() -> &'static LintConfig {
    &BUILTIN
}

/// Get the default configuration.
pub fn default_config() -> LintConfig {
    LintConfig::default()
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            ignores: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
            rules: RulesTable::default_rules(),
            custom_rules: CustomRulesConfig::default(),
        }
    }
}

impl RulesTable {
    fn default_rules() -> Self {
        use Applicability::{Always, Never};

        let error = |applicability| RuleEntry::new(Severity::Error, applicability);

        [
            (
                RuleName::TypeEnum,
                error(Always).with_param(RuleParam::List(
                    COMMIT_TYPES.iter().map(|t| t.to_string()).collect(),
                )),
            ),
            (RuleName::ScopeEmpty, error(Never)),
            (RuleName::SubjectEmpty, error(Never)),
            (
                RuleName::HeaderMaxLength,
                error(Always).with_param(MAX_LINE_LENGTH),
            ),
            (
                RuleName::BodyMaxLineLength,
                error(Always).with_param(MAX_LINE_LENGTH),
            ),
            (
                RuleName::FooterMaxLineLength,
                error(Always).with_param(MAX_LINE_LENGTH),
            ),
            (RuleName::SubjectCase, error(Always).with_param("lower-case")),
            (RuleName::SubjectFullStop, error(Never).with_param(".")),
            (RuleName::SubjectMinLength, error(Always).with_param(3usize)),
            (RuleName::BodyLeadingBlank, error(Always)),
        ]
        .into_iter()
        .collect()
    }
}

impl Default for CustomRulesConfig {
    fn default() -> Self {
        Self {
            body_required_for_types: COMMIT_TYPES.iter().map(|t| t.to_string()).collect(),
            enforce_breaking_change_consistency: true,
            footer_counts_as_body: true,
            messages: MessageKey::all()
                .iter()
                .map(|key| (*key, key.default_template().to_string()))
                .collect(),
        }
    }
}

impl MessageKey {
    /// The built-in template for this key.
    pub fn default_template(&self) -> &'static str {
        match self {
            MessageKey::HeaderFormat => "Header must follow format: type(scope): description",
            MessageKey::InvalidType => {
                "Invalid commit type. Valid types: feat, fix, chore, refactor"
            }
            MessageKey::ScopeRequired => {
                "Scope is required and cannot be empty. Use format: type(scope): description"
            }
            MessageKey::DescriptionRequired => "Description is required after \": \"",
            MessageKey::DescriptionTooShort => "Description too short (minimum 3 characters)",
            MessageKey::LowercaseRequired => "Description should start with lowercase letter",
            MessageKey::NoTrailingPeriod => "Header should not end with a period",
            MessageKey::HeaderTooLong => "Header too long ({length} chars, max 72)",
            MessageKey::BodyRequiredForType => {
                "Body is required for {type} commits. Add a blank line after header, then describe what and why."
            }
            MessageKey::BodyLeadingBlank => "Blank line required after header",
            MessageKey::BodyLineTooLong => "Body line too long ({length} chars, max 72)",
            MessageKey::FooterLineTooLong => "Footer line too long ({length} chars, max 72)",
            MessageKey::BreakingNeedsFooter => {
                "Breaking change '!' in header requires 'BREAKING CHANGE:' in footer"
            }
            MessageKey::FooterNeedsBang => "'BREAKING CHANGE:' in footer requires '!' in header",
            MessageKey::CannotBeEmpty => "Commit message cannot be empty",
        }
    }
}

/// Generate an example configuration file.
///
/// Every value matches the built-in configuration, so the file is a
/// starting point for overrides.
pub fn example_config() -> &'static str {
    r#"# cg configuration file
# Author: Eshan Roy
# SPDX-License-Identifier: MIT
#
# Rule entries are [severity, applicability, parameter]:
#   severity      0 = off, 1 = warn, 2 = error
#   applicability "always" | "never"
# Any key left out keeps its built-in value.

# Headers matching these globs are not linted
ignores = ["Merge *", "Revert \"*", "fixup! *", "squash! *"]

[rules]
type-enum = [2, "always", ["feat", "fix", "chore", "refactor"]]
scope-empty = [2, "never"]
subject-empty = [2, "never"]
header-max-length = [2, "always", 72]
body-max-line-length = [2, "always", 72]
footer-max-line-length = [2, "always", 72]
subject-case = [2, "always", "lower-case"]
subject-full-stop = [2, "never", "."]
subject-min-length = [2, "always", 3]
body-leading-blank = [2, "always"]

[customRules]
bodyRequiredForTypes = ["feat", "fix", "chore", "refactor"]
enforceBreakingChangeConsistency = true
footerCountsAsBody = true

[customRules.messages]
headerFormat = "Header must follow format: type(scope): description"
invalidType = "Invalid commit type. Valid types: feat, fix, chore, refactor"
scopeRequired = "Scope is required and cannot be empty. Use format: type(scope): description"
descriptionRequired = 'Description is required after ": "'
descriptionTooShort = "Description too short (minimum 3 characters)"
lowercaseRequired = "Description should start with lowercase letter"
noTrailingPeriod = "Header should not end with a period"
headerTooLong = "Header too long ({length} chars, max 72)"
bodyRequiredForType = "Body is required for {type} commits. Add a blank line after header, then describe what and why."
bodyLeadingBlank = "Blank line required after header"
bodyLineTooLong = "Body line too long ({length} chars, max 72)"
footerLineTooLong = "Footer line too long ({length} chars, max 72)"
breakingNeedsFooter = "Breaking change '!' in header requires 'BREAKING CHANGE:' in footer"
footerNeedsBang = "'BREAKING CHANGE:' in footer requires '!' in header"
cannotBeEmpty = "Commit message cannot be empty"
"#
}
