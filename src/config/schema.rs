// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from refcheck.toml.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The main configuration structure for refcheck.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RefCheckConfig {
    /// Which refs are checked and which branch names are rejected.
    pub branches: BranchesConfig,

    /// Rule configuration.
    pub rules: RulesConfig,

    /// Commits left out of change sets.
    pub exclusions: ExclusionsConfig,

    /// Report configuration.
    pub report: ReportConfig,

    /// User directory configuration.
    pub directory: DirectoryConfig,

    /// Issue tracker configuration.
    pub issue_tracker: IssueTrackerConfig,
}

impl RefCheckConfig {
    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }
}

/// Branch selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchesConfig {
    /// Only refs in which this pattern is found are validated.
    pub include: String,

    /// Ref names in which this pattern is found are rejected.
    pub reject: Option<String>,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        Self {
            include: ".*".to_string(),
            reject: None,
        }
    }
}

/// Rule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Commit message rule groups.
    pub groups: Vec<MessageGroup>,

    /// Author email must match the pusher.
    pub require_matching_author_email: bool,

    /// Committer email must match the pusher.
    pub require_matching_committer_email: bool,

    /// Template for a pattern the author email must match, replacing the
    /// equality check against the pusher's email.
    pub author_email_pattern: Option<String>,

    /// Same as `author_email_pattern`, for the committer.
    pub committer_email_pattern: Option<String>,

    /// Author name must match the pusher.
    pub require_matching_author_name: bool,

    /// Committer name must match the pusher.
    pub require_matching_committer_name: bool,

    /// Largest file a commit may add or modify, in kilobytes.
    pub max_file_size_kb: Option<u64>,

    /// Globs of paths ignored by the size check.
    pub size_exclude: Vec<String>,

    /// Pattern that may not appear in any added line.
    pub reject_diff_pattern: Option<String>,

    /// Author email must belong to a known user.
    pub require_author_email_in_directory: bool,

    /// Author name must belong to a known user.
    pub require_author_name_in_directory: bool,

    /// Pattern used to extract issue keys from commit messages.
    pub issue_key_pattern: String,

    /// Issue tracker queries that must return at least one issue.
    pub issue_queries: Vec<IssueQuery>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            require_matching_author_email: false,
            require_matching_committer_email: false,
            author_email_pattern: None,
            committer_email_pattern: None,
            require_matching_author_name: false,
            require_matching_committer_name: false,
            max_file_size_kb: None,
            size_exclude: Vec::new(),
            reject_diff_pattern: None,
            require_author_email_in_directory: false,
            require_author_name_in_directory: false,
            issue_key_pattern: r"\b[A-Z][A-Z0-9_]+-[0-9]+\b".to_string(),
            issue_queries: Vec::new(),
        }
    }
}

/// How the rules of a message group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupMatch {
    /// Every rule must match.
    #[default]
    All,
    /// At least one rule must match.
    One,
    /// No rule may match.
    None,
}

impl GroupMatch {
    /// Get the string representation of the match kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupMatch::All => "all",
            GroupMatch::One => "one",
            GroupMatch::None => "none",
        }
    }
}

impl std::fmt::Display for GroupMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A group of commit message rules.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MessageGroup {
    /// How the rules combine.
    #[serde(rename = "match")]
    pub match_kind: GroupMatch,

    /// Message shown when the group fails.
    pub message: Option<String>,

    /// The rules of the group.
    pub rules: Vec<MessageRule>,
}

/// A single commit message rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRule {
    /// Pattern searched for in the commit message.
    pub pattern: String,

    /// Message shown when this rule causes its group to fail.
    #[serde(default)]
    pub message: String,
}

/// An issue tracker query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueQuery {
    /// Query template.
    pub query: String,

    /// Message shown when the query returns nothing.
    #[serde(default)]
    pub message: Option<String>,
}

/// Commits excluded from change sets.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExclusionsConfig {
    /// Skip commits with more than one parent.
    pub exclude_merge_commits: bool,

    /// Skip commits whose message matches this pattern.
    pub exclude_commit_pattern: Option<String>,
}

/// Report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Template printed when every update is accepted.
    pub accept_message: Option<String>,

    /// Template printed above a report with findings.
    pub reject_message: String,

    /// Report findings without rejecting the update.
    pub dry_run: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            accept_message: None,
            reject_message: "Push rejected for {{pusher.name}} <{{pusher.email}}>".to_string(),
            dry_run: false,
        }
    }
}

/// User directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DirectoryConfig {
    /// TOML file listing the known users.
    pub users_file: Option<PathBuf>,
}

/// Issue tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IssueTrackerConfig {
    /// Command run for every query; prints one matching issue per line.
    pub command: Option<String>,

    /// Arguments passed before the query.
    pub args: Vec<String>,
}
