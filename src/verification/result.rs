// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Verification results for ref updates and batches of them.

use crate::commit::{Commit, Identity};
use crate::rules::{RuleCategory, RuleOutcome};
use serde::Serialize;

/// The outcome of one category for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOutcome {
    pub category: RuleCategory,
    #[serde(flatten)]
    pub outcome: RuleOutcome,
}

/// Every outcome recorded for one commit, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitVerification {
    pub id: String,
    pub subject: String,
    pub author: Identity,
    pub committer: Identity,
    pub outcomes: Vec<CategoryOutcome>,
}

impl CommitVerification {
    fn new(commit: &Commit) -> Self {
        Self {
            id: commit.id.clone(),
            subject: commit.subject().to_string(),
            author: commit.author.clone(),
            committer: commit.committer.clone(),
            outcomes: Vec::new(),
        }
    }

    /// The abbreviated commit hash.
    pub fn short_id(&self) -> &str {
        &self.id[..7.min(self.id.len())]
    }

    /// The outcome recorded for `category`, if any.
    pub fn outcome(&self, category: RuleCategory) -> Option<&RuleOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.category == category)
            .map(|o| &o.outcome)
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|o| !o.outcome.passed)
    }

    /// Whether any outcome failed.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Everything found while validating one ref update or merge proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefUpdateVerificationResult {
    pub ref_id: String,
    pub from_hash: String,
    pub to_hash: String,
    pub branch_name_accepted: bool,
    pub commits: Vec<CommitVerification>,
}

impl RefUpdateVerificationResult {
    /// Create an empty result. The branch name counts as accepted until
    /// [`set_branch_name_accepted`](Self::set_branch_name_accepted) says otherwise.
    pub fn new(
        ref_id: impl Into<String>,
        from_hash: impl Into<String>,
        to_hash: impl Into<String>,
    ) -> Self {
        Self {
            ref_id: ref_id.into(),
            from_hash: from_hash.into(),
            to_hash: to_hash.into(),
            branch_name_accepted: true,
            commits: Vec::new(),
        }
    }

    /// Record the branch name gate.
    pub fn set_branch_name_accepted(&mut self, accepted: bool) {
        self.branch_name_accepted = accepted;
    }

    /// Append the outcome of `category` for `commit`.
    ///
    /// Commits appear in the order they were first recorded; outcomes
    /// appear in the order they were recorded for their commit.
    pub fn record(&mut self, commit: &Commit, category: RuleCategory, outcome: RuleOutcome) {
        // Outcomes arrive commit by commit, so the last entry is the usual hit.
        let index = match self.commits.last() {
            Some(last) if last.id == commit.id => Some(self.commits.len() - 1),
            _ => self.commits.iter().rposition(|c| c.id == commit.id),
        };
        let index = index.unwrap_or_else(|| {
            self.commits.push(CommitVerification::new(commit));
            self.commits.len() - 1
        });
        self.commits[index]
            .outcomes
            .push(CategoryOutcome { category, outcome });
    }

    /// The entry for the commit with `id`, if any outcome was recorded.
    pub fn commit(&self, id: &str) -> Option<&CommitVerification> {
        self.commits.iter().find(|c| c.id == id)
    }

    /// Whether the branch name was rejected or any outcome failed.
    pub fn has_reportables(&self) -> bool {
        !self.branch_name_accepted || self.commits.iter().any(|c| c.has_failures())
    }

    /// Number of failing outcomes across all commits.
    pub fn failure_count(&self) -> usize {
        self.commits.iter().map(|c| c.failures().count()).sum()
    }
}

/// The reportable results of a validation request, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchVerificationResult {
    results: Vec<RefUpdateVerificationResult>,
}

impl BatchVerificationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, result: RefUpdateVerificationResult) {
        debug_assert!(result.has_reportables());
        self.results.push(result);
    }

    /// The per-update results.
    pub fn results(&self) -> &[RefUpdateVerificationResult] {
        &self.results
    }

    /// Iterate over the per-update results.
    pub fn iter(&self) -> impl Iterator<Item = &RefUpdateVerificationResult> {
        self.results.iter()
    }

    /// Whether nothing was reported, i.e. every update was accepted.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of reported updates.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether any update has something to report.
    pub fn has_reportables(&self) -> bool {
        self.results.iter().any(|r| r.has_reportables())
    }
}
