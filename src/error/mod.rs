// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for refcheck.
//!
//! Rule violations are never errors: they are recorded as failing
//! outcomes in the verification result. Everything in this module is an
//! infrastructure or configuration failure that aborts the validation
//! call that triggered it.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for refcheck operations.
#[derive(Error, Debug)]
pub enum RefCheckError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // Host services (user directory, issue tracker)
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    // Template rendering errors
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    // Hook errors
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    // Findings that refuse the update
    #[error("Push rejected: {count} ref update(s) failed validation")]
    Rejected { count: usize },

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

    #[error("Invalid pattern for '{key}': {message}")]
    InvalidPattern { key: String, message: String },
}

impl ConfigError {
    /// Wrap a regex compilation failure for the given configuration key.
    pub fn invalid_pattern(key: impl Into<String>, err: regex::Error) -> Self {
        ConfigError::InvalidPattern {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {message}")]
    OpenFailed { message: String },

    #[error("Failed to get diff: {message}")]
    DiffFailed { message: String },

    #[error("Invalid commit reference: {reference}")]
    InvalidReference { reference: String },

    #[error("Git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    #[error("Malformed ref update line: '{line}'")]
    MalformedUpdate { line: String },
}

/// Errors raised by host collaborators such as the user directory or the
/// issue tracker.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Authentication required by {service}")]
    AuthenticationRequired { service: String },

    #[error("{service} request failed: {message}")]
    Failed { service: String, message: String },

    #[error("{service} is not configured")]
    Unavailable { service: String },
}

/// Template rendering errors.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Failed to render template '{template}': {message}")]
    Failed { template: String, message: String },
}

/// Hook-related errors.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Failed to install hook '{hook}': {message}")]
    InstallFailed { hook: String, message: String },

    #[error("Hook already exists: {hook}")]
    AlreadyExists { hook: String },

    #[error("Hook not found: {hook}")]
    NotFound { hook: String },

    #[error("Failed to remove hook '{hook}': {message}")]
    RemoveFailed { hook: String, message: String },
}

/// Result type alias for refcheck operations.
pub type Result<T> = std::result::Result<T, RefCheckError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| RefCheckError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
