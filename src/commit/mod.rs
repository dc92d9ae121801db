// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit and ref update model.

mod changeset;
mod refs;

pub use changeset::{Commit, CommitContent, FileEntry, Identity};
pub use refs::{is_null_hash, MergeProposal, RefChangeKind, RefUpdate};
