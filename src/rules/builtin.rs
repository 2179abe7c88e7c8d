// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Built-in validation rules.
//!
//! Every rule reads its entry from the configuration: severity `Off` skips
//! it, applicability flips the condition, and the parameter sets the
//! threshold. Messages come from the configured templates.

use crate::commit::CommitMessage;
use crate::config::{LintConfig, MessageKey, RuleEntry, RuleName, Severity, SubjectCase};

use super::validator::ValidationIssue;

/// Trait for additional rules registered on a [`RuleEngine`](super::RuleEngine).
pub trait Rule: std::fmt::Debug + Send + Sync {
    /// Check the commit message and return any issues found.
    fn check(&self, message: &CommitMessage, config: &LintConfig) -> Vec<ValidationIssue>;

    /// Get the rule name.
    fn name(&self) -> &str;
}

/// Codes reported by checks that are not part of the rules table.
pub mod codes {
    pub const HEADER_FORMAT: &str = "header-format";
    pub const EMPTY_MESSAGE: &str = "empty-message";
    pub const BODY_REQUIRED: &str = "body-required-for-type";
    pub const BREAKING_NEEDS_FOOTER: &str = "breaking-needs-footer";
    pub const FOOTER_NEEDS_BANG: &str = "footer-needs-bang";
}

type RuleCheck = fn(&CommitMessage, &LintConfig, &RuleEntry) -> Vec<ValidationIssue>;

/// Apply every enabled rule of the rules table.
pub fn apply_builtin_rules(message: &CommitMessage, config: &LintConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if message.conventional.is_none() {
        issues.push(custom_issue(
            config,
            codes::HEADER_FORMAT,
            MessageKey::HeaderFormat,
            &[],
            Some(message.header_line),
        ));
    }

    for name in RuleName::all() {
        let Some(entry) = config.rule(*name) else {
            continue;
        };
        if !entry.is_enabled() {
            tracing::debug!("Rule {} is off", name);
            continue;
        }

        issues.extend(rule_check(*name)(message, config, entry));
    }

    issues
}

/// Apply the `customRules` checks.
pub fn apply_custom_rules(message: &CommitMessage, config: &LintConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(issue) = check_body_required(message, config) {
        issues.push(issue);
    }

    if config.custom_rules.enforce_breaking_change_consistency {
        issues.extend(check_breaking_consistency(message, config));
    }

    issues
}

/// The issue reported for an empty message.
pub fn empty_message_issue(config: &LintConfig) -> ValidationIssue {
    custom_issue(
        config,
        codes::EMPTY_MESSAGE,
        MessageKey::CannotBeEmpty,
        &[],
        None,
    )
}

fn rule_check(name: RuleName) -> RuleCheck {
    match name {
        RuleName::TypeEnum => check_type_enum,
        RuleName::ScopeEmpty => check_scope_empty,
        RuleName::SubjectEmpty => check_subject_empty,
        RuleName::HeaderMaxLength => check_header_max_length,
        RuleName::BodyMaxLineLength => check_body_max_line_length,
        RuleName::FooterMaxLineLength => check_footer_max_line_length,
        RuleName::SubjectCase => check_subject_case,
        RuleName::SubjectFullStop => check_subject_full_stop,
        RuleName::SubjectMinLength => check_subject_min_length,
        RuleName::BodyLeadingBlank => check_body_leading_blank,
    }
}

/// Build an issue for a table rule.
fn rule_issue(
    config: &LintConfig,
    name: RuleName,
    entry: &RuleEntry,
    key: MessageKey,
    vars: &[(&str, String)],
    line: Option<usize>,
) -> ValidationIssue {
    ValidationIssue {
        code: name.to_string(),
        message: config.custom_rules.messages.render(key, vars),
        severity: entry.severity,
        line,
    }
}

/// Build an error-level issue for a check outside the rules table.
fn custom_issue(
    config: &LintConfig,
    code: &str,
    key: MessageKey,
    vars: &[(&str, String)],
    line: Option<usize>,
) -> ValidationIssue {
    ValidationIssue {
        code: code.to_string(),
        message: config.custom_rules.messages.render(key, vars),
        severity: Severity::Error,
        line,
    }
}

fn integer_param(name: RuleName, entry: &RuleEntry) -> Option<usize> {
    let value = entry.param.as_ref().and_then(|p| p.as_integer());
    if value.is_none() {
        tracing::warn!("Rule {} has no integer parameter, skipping", name);
    }
    value
}

/// Check the commit type against the allowed list.
fn check_type_enum(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let Some(header) = &message.conventional else {
        return Vec::new();
    };
    let Some(types) = entry.param.as_ref().and_then(|p| p.as_list()) else {
        tracing::warn!("Rule type-enum has no type list, skipping");
        return Vec::new();
    };

    let listed = types.iter().any(|t| *t == header.commit_type);
    if entry.applicability.is_violated(listed) {
        vec![rule_issue(
            config,
            RuleName::TypeEnum,
            entry,
            MessageKey::InvalidType,
            &[
                ("type", header.commit_type.clone()),
                ("types", types.join(", ")),
            ],
            Some(message.header_line),
        )]
    } else {
        Vec::new()
    }
}

/// Check whether the scope is empty.
fn check_scope_empty(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let Some(header) = &message.conventional else {
        return Vec::new();
    };

    if entry.applicability.is_violated(header.scope_is_empty()) {
        vec![rule_issue(
            config,
            RuleName::ScopeEmpty,
            entry,
            MessageKey::ScopeRequired,
            &[],
            Some(message.header_line),
        )]
    } else {
        Vec::new()
    }
}

/// Check whether the subject is empty.
fn check_subject_empty(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let Some(header) = &message.conventional else {
        return Vec::new();
    };

    if entry.applicability.is_violated(header.subject.is_empty()) {
        vec![rule_issue(
            config,
            RuleName::SubjectEmpty,
            entry,
            MessageKey::DescriptionRequired,
            &[],
            Some(message.header_line),
        )]
    } else {
        Vec::new()
    }
}

/// Check the header length. Applies to non-conventional headers too.
fn check_header_max_length(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let Some(max) = integer_param(RuleName::HeaderMaxLength, entry) else {
        return Vec::new();
    };

    let length = message.header_len();
    if entry.applicability.is_violated(length <= max) {
        vec![rule_issue(
            config,
            RuleName::HeaderMaxLength,
            entry,
            MessageKey::HeaderTooLong,
            &[("length", length.to_string()), ("max", max.to_string())],
            Some(message.header_line),
        )]
    } else {
        Vec::new()
    }
}

/// Check every body line's length.
fn check_body_max_line_length(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let (Some(max), Some(body)) = (
        integer_param(RuleName::BodyMaxLineLength, entry),
        message.body.as_ref(),
    ) else {
        return Vec::new();
    };

    line_length_issues(
        config,
        RuleName::BodyMaxLineLength,
        entry,
        MessageKey::BodyLineTooLong,
        max,
        body.numbered_lines(),
    )
}

/// Check every footer line's length.
fn check_footer_max_line_length(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let (Some(max), Some(footer)) = (
        integer_param(RuleName::FooterMaxLineLength, entry),
        message.footer.as_ref(),
    ) else {
        return Vec::new();
    };

    line_length_issues(
        config,
        RuleName::FooterMaxLineLength,
        entry,
        MessageKey::FooterLineTooLong,
        max,
        footer.numbered_lines(),
    )
}

fn line_length_issues<'a>(
    config: &LintConfig,
    name: RuleName,
    entry: &RuleEntry,
    key: MessageKey,
    max: usize,
    lines: impl Iterator<Item = (usize, &'a str)>,
) -> Vec<ValidationIssue> {
    lines
        .filter_map(|(number, line)| {
            let length = line.chars().count();
            entry.applicability.is_violated(length <= max).then(|| {
                rule_issue(
                    config,
                    name,
                    entry,
                    key,
                    &[("length", length.to_string()), ("max", max.to_string())],
                    Some(number),
                )
            })
        })
        .collect()
}

/// Check the case of the subject's first character.
fn check_subject_case(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let Some(header) = &message.conventional else {
        return Vec::new();
    };
    if header.subject.is_empty() {
        return Vec::new();
    }
    let Some(case) = entry
        .param
        .as_ref()
        .and_then(|p| p.as_text())
        .and_then(|text| text.parse::<SubjectCase>().ok())
    else {
        tracing::warn!("Rule subject-case has no supported case, skipping");
        return Vec::new();
    };

    if entry.applicability.is_violated(case.matches(&header.subject)) {
        vec![rule_issue(
            config,
            RuleName::SubjectCase,
            entry,
            MessageKey::LowercaseRequired,
            &[("case", case.as_str().to_string())],
            Some(message.header_line),
        )]
    } else {
        Vec::new()
    }
}

/// Check whether the subject ends with the configured stop character.
fn check_subject_full_stop(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let Some(header) = &message.conventional else {
        return Vec::new();
    };
    let Some(stop) = entry.param.as_ref().and_then(|p| p.as_text()) else {
        tracing::warn!("Rule subject-full-stop has no stop string, skipping");
        return Vec::new();
    };

    if entry.applicability.is_violated(header.subject.ends_with(stop)) {
        vec![rule_issue(
            config,
            RuleName::SubjectFullStop,
            entry,
            MessageKey::NoTrailingPeriod,
            &[("stop", stop.to_string())],
            Some(message.header_line),
        )]
    } else {
        Vec::new()
    }
}

/// Check the minimum subject length. Empty subjects are left to `subject-empty`.
fn check_subject_min_length(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    let Some(header) = &message.conventional else {
        return Vec::new();
    };
    if header.subject.is_empty() {
        return Vec::new();
    }
    let Some(min) = integer_param(RuleName::SubjectMinLength, entry) else {
        return Vec::new();
    };

    let length = header.subject.chars().count();
    if entry.applicability.is_violated(length >= min) {
        vec![rule_issue(
            config,
            RuleName::SubjectMinLength,
            entry,
            MessageKey::DescriptionTooShort,
            &[("length", length.to_string()), ("min", min.to_string())],
            Some(message.header_line),
        )]
    } else {
        Vec::new()
    }
}

/// Check for a blank line between header and body.
fn check_body_leading_blank(
    message: &CommitMessage,
    config: &LintConfig,
    entry: &RuleEntry,
) -> Vec<ValidationIssue> {
    if !message.has_content_after_header() {
        return Vec::new();
    }

    if entry.applicability.is_violated(message.has_leading_blank) {
        vec![rule_issue(
            config,
            RuleName::BodyLeadingBlank,
            entry,
            MessageKey::BodyLeadingBlank,
            &[],
            Some(message.header_line + 1),
        )]
    } else {
        Vec::new()
    }
}

/// Require a body for the configured commit types.
fn check_body_required(message: &CommitMessage, config: &LintConfig) -> Option<ValidationIssue> {
    let custom = &config.custom_rules;
    let commit_type = message.commit_type()?;

    if !custom.body_required_for_types.contains(commit_type) {
        return None;
    }

    let has_body = message.body.is_some()
        || (custom.footer_counts_as_body && message.footer.is_some());

    (!has_body).then(|| {
        custom_issue(
            config,
            codes::BODY_REQUIRED,
            MessageKey::BodyRequiredForType,
            &[("type", commit_type.to_string())],
            Some(message.header_line),
        )
    })
}

/// Require `!` and a `BREAKING CHANGE:` footer to appear together.
fn check_breaking_consistency(
    message: &CommitMessage,
    config: &LintConfig,
) -> Vec<ValidationIssue> {
    if message.conventional.is_none() {
        return Vec::new();
    }

    let has_marker = message.has_breaking_marker();
    let footer_line = message.breaking_footer_line();

    match (has_marker, footer_line) {
        (true, None) => vec![custom_issue(
            config,
            codes::BREAKING_NEEDS_FOOTER,
            MessageKey::BreakingNeedsFooter,
            &[],
            Some(message.header_line),
        )],
        (false, Some(line)) => vec![custom_issue(
            config,
            codes::FOOTER_NEEDS_BANG,
            MessageKey::FooterNeedsBang,
            &[],
            Some(line),
        )],
        _ => Vec::new(),
    }
}
