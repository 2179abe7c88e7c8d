// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule engine module for commit validation.
//!
//! This module evaluates the configured rules table and custom checks
//! against commit messages.

mod builtin;
mod engine;
mod validator;

pub use builtin::{apply_builtin_rules, apply_custom_rules, codes, Rule};
pub use engine::RuleEngine;
pub use validator::{ValidationIssue, ValidationResult};
