// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commits as seen by the rule evaluators.

use serde::Serialize;
use std::path::PathBuf;

/// A name and email pair, as recorded on a commit or known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Create a new identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A file added or modified by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path of the file in the commit tree.
    pub path: PathBuf,
    /// Size of the blob in bytes.
    pub size: u64,
}

/// Content introduced by a commit, relative to its first parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitContent {
    /// Files added or modified.
    pub files: Vec<FileEntry>,
    /// Unified diff, with `+`/`-`/` ` line origins.
    pub diff: String,
    /// Lines added by the commit, as recorded by the diff, without origin
    /// or line terminator.
    pub added: Vec<String>,
}

impl CommitContent {
    /// Iterate over the added lines of the diff.
    pub fn added_lines(&self) -> impl Iterator<Item = &str> {
        self.added.iter().map(String::as_str)
    }
}

/// A commit newly introduced by a ref update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full commit hash.
    pub id: String,
    /// Full commit message.
    pub message: String,
    /// Number of parents; more than one means a merge commit.
    pub parent_count: usize,
    pub author: Identity,
    pub committer: Identity,
    /// Files and diff introduced by the commit.
    #[serde(skip)]
    pub content: CommitContent,
}

impl Commit {
    /// Create a commit with the same author and committer and no content.
    pub fn new(id: impl Into<String>, message: impl Into<String>, author: Identity) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            parent_count: 1,
            committer: author.clone(),
            author,
            content: CommitContent::default(),
        }
    }

    /// Set the committer.
    pub fn with_committer(mut self, committer: Identity) -> Self {
        self.committer = committer;
        self
    }

    /// Set the parent count.
    pub fn with_parent_count(mut self, parent_count: usize) -> Self {
        self.parent_count = parent_count;
        self
    }

    /// Set the content.
    pub fn with_content(mut self, content: CommitContent) -> Self {
        self.content = content;
        self
    }

    /// The abbreviated commit hash.
    pub fn short_id(&self) -> &str {
        &self.id[..7.min(self.id.len())]
    }

    /// The first line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Whether the commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parent_count > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_accessors() {
        let commit = Commit::new(
            "0123456789abcdef",
            "PROJ-1 add thing\n\nbody",
            Identity::new("Jo", "jo@example.com"),
        );
        assert_eq!(commit.short_id(), "0123456");
        assert_eq!(commit.subject(), "PROJ-1 add thing");
        assert!(!commit.is_merge());
        assert_eq!(commit.committer, commit.author);
        assert!(commit.with_parent_count(2).is_merge());
    }

    #[test]
    fn test_added_lines() {
        let content = CommitContent {
            files: Vec::new(),
            diff: "+++ b/a.txt\n+added\n-removed\n+++again\n".to_string(),
            added: vec!["added".to_string(), "++again".to_string()],
        };
        let added: Vec<_> = content.added_lines().collect();
        assert_eq!(added, vec!["added", "++again"]);
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(
            Identity::new("Jo", "jo@example.com").to_string(),
            "Jo <jo@example.com>"
        );
    }
}
