// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for cg.
//!
//! The built-in rule configuration itself cannot fail; everything around it
//! (override files, git access, reading messages) reports through the types
//! defined here.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cg operations.
#[derive(Error, Debug)]
pub enum CgError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // Lint outcome
    #[error("Lint error: {0}")]
    Lint(#[from] LintError),

    // Commit message input errors
    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Message '{key}' uses unknown placeholder '{{{placeholder}}}'")]
    UnknownPlaceholder { key: String, placeholder: String },

    #[error("Configuration file already exists: {path}")]
    AlreadyExists { path: PathBuf },
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {message}")]
    OpenFailed { message: String },

    #[error("Invalid commit reference: {reference}")]
    InvalidReference { reference: String },

    #[error("Invalid commit range '{range}': {message}")]
    InvalidRange { range: String, message: String },
}

/// Lint outcome errors, used to turn violations into a failing exit status.
#[derive(Error, Debug)]
pub enum LintError {
    #[error("{errors} error(s), {warnings} warning(s) found")]
    Failed { errors: usize, warnings: usize },
}

/// Errors reading a commit message.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Empty commit message")]
    EmptyMessage,

    #[error("Failed to read commit message from {source_name}: {message}")]
    ReadFailed {
        source_name: String,
        message: String,
    },
}

/// Result type alias for cg operations.
pub type Result<T> = std::result::Result<T, CgError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CgError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
