// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! refcheck - commit policy checks for pushed refs
//!
//! Validates the commits introduced by ref updates (pushes) and merge
//! proposals against a configurable set of rules, and reports every
//! violation at once.
//!
//! # Features
//!
//! - **Branch gating**: select which refs are validated and reject others by name
//! - **Message groups**: all/one/none pattern groups over commit messages
//! - **Identity checks**: author and committer must match the pusher
//! - **Content checks**: file size limits and forbidden diff patterns
//! - **Host lookups**: user directory and issue tracker queries
//! - **Git Hooks**: `pre-receive` and `update` hook installation
//!
//! # Example
//!
//! ```no_run
//! use refcheck::commit::RefUpdate;
//! use refcheck::config::RefCheckConfig;
//! use refcheck::git::GitResolver;
//! use refcheck::host::{CommandIssueTracker, StaticUserDirectory};
//! use refcheck::rules::RuleSet;
//! use refcheck::validator::RefUpdateValidator;
//!
//! let config = RefCheckConfig::load_from(std::path::Path::new("refcheck.toml")).unwrap();
//! let resolver = GitResolver::open(std::path::Path::new(".")).unwrap();
//! let directory = StaticUserDirectory::default();
//! let tracker = CommandIssueTracker::from_config(&config.issue_tracker);
//!
//! let validator = RefUpdateValidator::new(
//!     &config,
//!     &resolver,
//!     RuleSet::standard(&directory, &tracker),
//! )
//! .unwrap();
//!
//! let updates = RefUpdate::parse_lines("...").unwrap();
//! let batch = validator.validate_batch(&updates).unwrap();
//! if batch.has_reportables() {
//!     println!("{} update(s) rejected", batch.len());
//! }
//! ```

// Module declarations
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod host;
pub mod render;
pub mod rules;
pub mod validator;
pub mod verification;

// Re-exports for convenience
pub use config::RefCheckConfig;
pub use error::{RefCheckError, Result};
pub use validator::RefUpdateValidator;
pub use verification::{BatchVerificationResult, RefUpdateVerificationResult};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of refcheck.
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
