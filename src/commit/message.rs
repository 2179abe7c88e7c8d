// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit message structure and parsing.
//!
//! Parsing is lenient: a header that does not follow the conventional format
//! still produces a message, so the rule engine can report what is wrong
//! with it instead of failing outright.

use crate::error::{CgError, CommitError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Conventional commit header: `type(scope)!: subject`.
    static ref HEADER_REGEX: Regex = Regex::new(
        r"^(?P<type>\w+)(?:\((?P<scope>[^()\r\n]*)\))?(?P<breaking>!)?:(?: (?P<subject>.*))?$"
    ).unwrap();

    /// A trailer line that starts a footer: `Token: value` or `Token #value`.
    static ref TRAILER_REGEX: Regex = Regex::new(
        r"^(?:BREAKING[ -]CHANGE|[A-Za-z][A-Za-z0-9-]*)(?::\s|\s#)"
    ).unwrap();

    /// A breaking change note in the footer.
    static ref BREAKING_FOOTER_REGEX: Regex = Regex::new(
        r"^BREAKING[ -]CHANGE:\s"
    ).unwrap();
}

/// Marker line below which git ignores the message (`commit -v`).
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// The parsed parts of a conventional commit header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Commit type (feat, fix, etc.).
    pub commit_type: String,
    /// Scope as written between parentheses, if any.
    pub scope: Option<String>,
    /// Whether the header carries the `!` breaking marker.
    pub is_breaking: bool,
    /// Description after `": "`.
    pub subject: String,
}

impl Header {
    /// Parse a header line, returning `None` when it is not conventional.
    pub fn parse(line: &str) -> Option<Self> {
        let captures = HEADER_REGEX.captures(line)?;

        Some(Self {
            commit_type: captures["type"].to_string(),
            scope: captures.name("scope").map(|m| m.as_str().to_string()),
            is_breaking: captures.name("breaking").is_some(),
            subject: captures
                .name("subject")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
        })
    }

    /// Whether the scope is missing or blank.
    pub fn scope_is_empty(&self) -> bool {
        self.scope.as_deref().map_or(true, |s| s.trim().is_empty())
    }
}

/// A block of consecutive lines with the line number of the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// 1-based line number of the first line.
    pub start_line: usize,
    /// Text of the section.
    pub text: String,
}

impl Section {
    /// Iterate over lines with their 1-based line numbers.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.text
            .lines()
            .enumerate()
            .map(move |(i, line)| (self.start_line + i, line))
    }
}

/// A commit message split into header, body and footer.
#[derive(Debug, Clone)]
pub struct CommitMessage {
    /// The first non-blank line, verbatim.
    pub header: String,
    /// 1-based line number of the header.
    pub header_line: usize,
    /// The conventional parse of the header, if it matched.
    pub conventional: Option<Header>,
    /// Body text between header and footer.
    pub body: Option<Section>,
    /// Trailer block, from the first trailer paragraph to the end.
    pub footer: Option<Section>,
    /// Whether the line after the header is blank (or absent).
    pub has_leading_blank: bool,
}

impl CommitMessage {
    /// Parse a commit message.
    ///
    /// Fails only when the message is empty.
    pub fn parse(message: &str) -> Result<Self> {
        let message = message.trim_end();
        let lines: Vec<&str> = message.lines().collect();

        let header_index = lines
            .iter()
            .position(|line| !line.trim().is_empty())
            .ok_or(CgError::Commit(CommitError::EmptyMessage))?;

        let header = lines[header_index].trim_end().to_string();
        let rest = &lines[header_index + 1..];
        // Line numbers are 1-based; `rest[0]` is the line after the header.
        let rest_first_line = header_index + 2;

        let has_leading_blank = rest.first().map_or(true, |line| line.trim().is_empty());

        let footer_start = find_footer_start(rest);
        let (body_lines, footer_lines) = rest.split_at(footer_start.unwrap_or(rest.len()));

        let body = section(body_lines, rest_first_line);
        let footer = section(footer_lines, rest_first_line + body_lines.len());

        Ok(Self {
            conventional: Header::parse(&header),
            header,
            header_line: header_index + 1,
            body,
            footer,
            has_leading_blank,
        })
    }

    /// Remove git comment lines and everything below the scissors marker.
    pub fn strip_comments(message: &str) -> String {
        message
            .lines()
            .take_while(|line| *line != SCISSORS)
            .filter(|line| !line.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The commit type, if the header is conventional.
    pub fn commit_type(&self) -> Option<&str> {
        self.conventional.as_ref().map(|h| h.commit_type.as_str())
    }

    /// Whether the header carries the `!` marker.
    pub fn has_breaking_marker(&self) -> bool {
        self.conventional.as_ref().is_some_and(|h| h.is_breaking)
    }

    /// The footer line holding a `BREAKING CHANGE:` note, if any.
    pub fn breaking_footer_line(&self) -> Option<usize> {
        self.footer.as_ref().and_then(|footer| {
            footer
                .numbered_lines()
                .find(|(_, line)| BREAKING_FOOTER_REGEX.is_match(line))
                .map(|(number, _)| number)
        })
    }

    /// Whether anything follows the header.
    pub fn has_content_after_header(&self) -> bool {
        self.body.is_some() || self.footer.is_some()
    }

    /// Header length in characters.
    pub fn header_len(&self) -> usize {
        self.header.chars().count()
    }
}

/// Index into `rest` where the footer begins.
///
/// The footer opens with the first paragraph that starts with a trailer and
/// runs to the end of the message, since trailer values may span paragraphs.
fn find_footer_start(rest: &[&str]) -> Option<usize> {
    (0..rest.len()).find(|&i| {
        let starts_paragraph = i == 0 || rest[i - 1].trim().is_empty();
        starts_paragraph && TRAILER_REGEX.is_match(rest[i])
    })
}

/// Build a section from lines, dropping blank lines at either end.
fn section(lines: &[&str], first_line: usize) -> Option<Section> {
    let start = lines.iter().position(|line| !line.trim().is_empty())?;
    let end = lines.iter().rposition(|line| !line.trim().is_empty())?;

    Some(Section {
        start_line: first_line + start,
        text: lines[start..=end].join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_with_scope() {
        let msg = CommitMessage::parse("feat(core): add new feature").unwrap();
        let header = msg.conventional.unwrap();
        assert_eq!(header.commit_type, "feat");
        assert_eq!(header.scope.as_deref(), Some("core"));
        assert_eq!(header.subject, "add new feature");
        assert!(!header.is_breaking);
        assert!(msg.body.is_none());
        assert!(msg.footer.is_none());
        assert!(msg.has_leading_blank);
    }

    #[test]
    fn test_parse_header_without_scope() {
        let header = Header::parse("feat: add x").unwrap();
        assert!(header.scope.is_none());
        assert!(header.scope_is_empty());
        assert_eq!(header.subject, "add x");
    }

    #[test]
    fn test_parse_empty_scope() {
        let header = Header::parse("fix(): patch").unwrap();
        assert_eq!(header.scope.as_deref(), Some(""));
        assert!(header.scope_is_empty());
    }

    #[test]
    fn test_parse_breaking_marker() {
        let header = Header::parse("refactor(api)!: drop v1 endpoints").unwrap();
        assert!(header.is_breaking);
        assert_eq!(header.commit_type, "refactor");
    }

    #[test]
    fn test_parse_empty_subject() {
        let header = Header::parse("feat(core):").unwrap();
        assert!(header.subject.is_empty());
    }

    #[test]
    fn test_non_conventional_header() {
        assert!(Header::parse("Update readme").is_none());
        assert!(Header::parse("feat:missing space").is_none());

        let msg = CommitMessage::parse("Update readme").unwrap();
        assert!(msg.conventional.is_none());
        assert_eq!(msg.header, "Update readme");
    }

    #[test]
    fn test_parse_body() {
        let msg = CommitMessage::parse("fix(db): close pool\n\nThe pool leaked\nconnections.").unwrap();
        let body = msg.body.unwrap();
        assert_eq!(body.start_line, 3);
        assert_eq!(body.text, "The pool leaked\nconnections.");
        assert!(msg.footer.is_none());
        assert!(msg.has_leading_blank);
    }

    #[test]
    fn test_parse_body_and_footer() {
        let raw = "feat(api)!: drop v1\n\nRemove the old handlers.\n\nBREAKING CHANGE: v1 is gone\nRefs: #42";
        let msg = CommitMessage::parse(raw).unwrap();

        assert_eq!(msg.body.as_ref().unwrap().text, "Remove the old handlers.");
        let footer = msg.footer.as_ref().unwrap();
        assert_eq!(footer.start_line, 5);
        assert_eq!(footer.text, "BREAKING CHANGE: v1 is gone\nRefs: #42");
        assert!(msg.has_breaking_marker());
        assert_eq!(msg.breaking_footer_line(), Some(5));
    }

    #[test]
    fn test_footer_only() {
        let msg = CommitMessage::parse("chore(deps): bump serde\n\nRefs #12").unwrap();
        assert!(msg.body.is_none());
        assert_eq!(msg.footer.unwrap().text, "Refs #12");
    }

    #[test]
    fn test_leading_blank_lines_before_header() {
        let msg = CommitMessage::parse("\n\nfix(core): patch\n\nBody.").unwrap();
        assert_eq!(msg.header, "fix(core): patch");
        assert_eq!(msg.header_line, 3);
        assert_eq!(msg.body.unwrap().start_line, 5);
    }

    #[test]
    fn test_missing_leading_blank() {
        let msg = CommitMessage::parse("fix(core): patch\nno blank line here").unwrap();
        assert!(!msg.has_leading_blank);
        assert_eq!(msg.body.unwrap().start_line, 2);
    }

    #[test]
    fn test_breaking_change_with_hyphen() {
        let msg = CommitMessage::parse("feat(x): y\n\nBREAKING-CHANGE: removed z").unwrap();
        assert_eq!(msg.breaking_footer_line(), Some(3));
    }

    #[test]
    fn test_footer_followed_by_trailer_paragraph() {
        let raw = "feat(api)!: drop v1\n\nRemove the old handlers.\n\nBREAKING CHANGE: v1 is removed\n\nRefs: #42";
        let msg = CommitMessage::parse(raw).unwrap();

        assert_eq!(msg.body.as_ref().unwrap().text, "Remove the old handlers.");
        let footer = msg.footer.as_ref().unwrap();
        assert_eq!(footer.start_line, 5);
        assert_eq!(footer.text, "BREAKING CHANGE: v1 is removed\n\nRefs: #42");
        assert_eq!(msg.breaking_footer_line(), Some(5));
    }

    #[test]
    fn test_breaking_note_spans_paragraphs() {
        let raw = "feat(api)!: drop v1\n\nRemove the old handlers.\n\nBREAKING CHANGE: v1 is removed.\n\nMigrate callers to the v2 routes.";
        let msg = CommitMessage::parse(raw).unwrap();

        assert_eq!(msg.body.as_ref().unwrap().text, "Remove the old handlers.");
        assert_eq!(
            msg.footer.as_ref().unwrap().text,
            "BREAKING CHANGE: v1 is removed.\n\nMigrate callers to the v2 routes."
        );
        assert_eq!(msg.breaking_footer_line(), Some(5));
    }

    #[test]
    fn test_trailer_inside_paragraph_is_body() {
        let raw = "fix(db): close pool\n\nThe pool leaked.\nSee: the issue tracker";
        let msg = CommitMessage::parse(raw).unwrap();
        assert!(msg.footer.is_none());
        assert_eq!(msg.body.unwrap().text, "The pool leaked.\nSee: the issue tracker");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            CommitMessage::parse("   \n\n  "),
            Err(CgError::Commit(CommitError::EmptyMessage))
        ));
    }

    #[test]
    fn test_strip_comments() {
        let raw = "feat(cli): add flag\n\nBody text\n# Please enter the commit message\n# ------------------------ >8 ------------------------\ndiff --git a/x b/x";
        let stripped = CommitMessage::strip_comments(raw);
        assert_eq!(stripped, "feat(cli): add flag\n\nBody text");
    }

    #[test]
    fn test_header_len_counts_chars() {
        let msg = CommitMessage::parse("fix(i18n): handle naïve input").unwrap();
        assert_eq!(msg.header_len(), 29);
    }
}
