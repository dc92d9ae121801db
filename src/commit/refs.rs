// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Ref updates and merge proposals.
//!
//! Hook input lines have the shape `<old-oid> <new-oid> <refname>`; an
//! all-zero old oid creates the ref and an all-zero new oid deletes it.

use crate::error::{GitError, RefCheckError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// SHA-1 or SHA-256 object id in hex.
    static ref OID_RE: Regex = Regex::new(r"^(?:[0-9a-fA-F]{40}|[0-9a-fA-F]{64})$").unwrap();
}

/// What a ref update does to the ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefChangeKind {
    Add,
    Update,
    Delete,
}

impl RefChangeKind {
    /// Get the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefChangeKind::Add => "add",
            RefChangeKind::Update => "update",
            RefChangeKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for RefChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A branch or tag moving from one commit to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefUpdate {
    pub ref_id: String,
    pub kind: RefChangeKind,
    pub from_hash: String,
    pub to_hash: String,
}

impl RefUpdate {
    /// Create an update, deriving its kind from zero hashes.
    pub fn new(
        ref_id: impl Into<String>,
        from_hash: impl Into<String>,
        to_hash: impl Into<String>,
    ) -> Self {
        let from_hash = from_hash.into();
        let to_hash = to_hash.into();
        let kind = if is_null_hash(&from_hash) {
            RefChangeKind::Add
        } else if is_null_hash(&to_hash) {
            RefChangeKind::Delete
        } else {
            RefChangeKind::Update
        };

        Self {
            ref_id: ref_id.into(),
            kind,
            from_hash,
            to_hash,
        }
    }

    /// Parse one `<old> <new> <ref>` hook input line.
    pub fn parse_line(line: &str) -> Result<Self> {
        let malformed = || {
            RefCheckError::Git(GitError::MalformedUpdate {
                line: line.to_string(),
            })
        };

        let mut parts = line.split_whitespace();
        let (Some(old), Some(new), Some(name), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        if !is_hex_oid(old) || !is_hex_oid(new) || (is_null_hash(old) && is_null_hash(new)) {
            return Err(malformed());
        }

        Ok(Self::new(name, old, new))
    }

    /// Parse every non-empty line of hook input.
    pub fn parse_lines(input: &str) -> Result<Vec<Self>> {
        input
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(Self::parse_line)
            .collect()
    }
}

/// A request to merge one ref into another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeProposal {
    pub from_ref_id: String,
    pub from_hash: String,
    pub to_ref_id: String,
    pub to_hash: String,
}

/// Whether `hash` is the all-zero object id.
pub fn is_null_hash(hash: &str) -> bool {
    !hash.is_empty() && hash.bytes().all(|b| b == b'0')
}

fn is_hex_oid(hash: &str) -> bool {
    OID_RE.is_match(hash)
}
