// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule categories and outcomes.

use serde::Serialize;

/// The fixed set of checks run against every commit.
///
/// [`RuleCategory::ALL`] is the evaluation order and therefore the order
/// outcomes appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    MessageGroups,
    AuthorEmail,
    CommitterEmail,
    AuthorName,
    CommitterName,
    ContentSize,
    ContentDiff,
    AuthorEmailKnown,
    AuthorNameKnown,
    IssueQuery,
}

impl RuleCategory {
    /// Every category, in evaluation order.
    pub const ALL: [RuleCategory; 10] = [
        RuleCategory::MessageGroups,
        RuleCategory::AuthorEmail,
        RuleCategory::CommitterEmail,
        RuleCategory::AuthorName,
        RuleCategory::CommitterName,
        RuleCategory::ContentSize,
        RuleCategory::ContentDiff,
        RuleCategory::AuthorEmailKnown,
        RuleCategory::AuthorNameKnown,
        RuleCategory::IssueQuery,
    ];

    /// Stable code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            RuleCategory::MessageGroups => "message-groups",
            RuleCategory::AuthorEmail => "author-email",
            RuleCategory::CommitterEmail => "committer-email",
            RuleCategory::AuthorName => "author-name",
            RuleCategory::CommitterName => "committer-name",
            RuleCategory::ContentSize => "content-size",
            RuleCategory::ContentDiff => "content-diff",
            RuleCategory::AuthorEmailKnown => "author-email-known",
            RuleCategory::AuthorNameKnown => "author-name-known",
            RuleCategory::IssueQuery => "issue-query",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The verdict of one rule for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RuleOutcome {
    /// A passing outcome.
    pub fn pass() -> Self {
        Self {
            passed: true,
            detail: None,
        }
    }

    /// A failing outcome.
    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: Some(detail.into()),
        }
    }

    /// Pass when `failures` is empty, otherwise fail with one line per failure.
    pub fn from_failures(failures: Vec<String>) -> Self {
        if failures.is_empty() {
            Self::pass()
        } else {
            Self::fail(failures.join("\n"))
        }
    }
}
