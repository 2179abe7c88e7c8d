// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! cg - Commit message linter
//!
//! A static table of commit lint rules and message templates, plus the
//! engine that checks commit messages against it.
//!
//! # Features
//!
//! - **Rule Table**: Built-in thresholds for header, subject, body and footer
//! - **Custom Rules**: Body-required types and breaking-change consistency
//! - **Message Templates**: Configurable wording with `{length}`/`{type}` placeholders
//! - **Overrides**: Partial TOML or JSON files layered over the built-in table
//! - **Git Integration**: Lint a single commit or a range
//!
//! # Example
//!
//! ```
//! use cg::config::{LintConfig, RuleName};
//! use cg::rules::RuleEngine;
//!
//! let config = LintConfig::builtin();
//! assert!(config.rule(RuleName::ScopeEmpty).is_some());
//!
//! let engine = RuleEngine::new(config.clone());
//! let result = engine.validate_str("feat: add x");
//! assert!(result.has_code("scope-empty"));
//! ```

// Module declarations
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod rules;

// Re-exports for convenience
pub use config::LintConfig;
pub use error::{CgError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of cg.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => {
                format!("{} ({} {})", VERSION, &sha[..7.min(sha.len())], date)
            }
            (Some(sha), None) => {
                format!("{} ({})", VERSION, &sha[..7.min(sha.len())])
            }
            _ => VERSION.to_string(),
        }
    }
}
