// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Content introduced by a commit.

use crate::commit::{CommitContent, FileEntry};
use crate::error::{GitError, RefCheckError, Result};
use git2::{Delta, FileMode};

use super::repo::Repository;

/// Files and unified diff introduced by `commit` against its first parent.
///
/// Root commits are diffed against the empty tree. Deleted files and
/// submodule entries contribute no [`FileEntry`].
pub fn commit_content(repo: &Repository, commit: &git2::Commit<'_>) -> Result<CommitContent> {
    let parent = commit.parents().next();
    let parent_tree = parent.as_ref().and_then(|p| p.tree().ok());
    let commit_tree = commit.tree().map_err(diff_failed)?;

    let diff = repo
        .inner()
        .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)
        .map_err(diff_failed)?;

    let mut files = Vec::new();
    for delta in diff.deltas() {
        let added = matches!(
            delta.status(),
            Delta::Added | Delta::Modified | Delta::Renamed | Delta::Copied | Delta::Typechange
        );
        let new_file = delta.new_file();
        if !added || new_file.mode() == FileMode::Commit {
            continue;
        }
        let Some(path) = new_file.path() else {
            continue;
        };

        let blob = repo.inner().find_blob(new_file.id()).map_err(diff_failed)?;
        files.push(FileEntry {
            path: path.to_path_buf(),
            size: blob.size() as u64,
        });
    }

    let mut patch = String::new();
    let mut added = Vec::new();
    diff.print(git2::DiffFormat::Patch, |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            '+' => {
                patch.push('+');
                patch.push_str(&content);
                added.push(content.trim_end_matches(['\n', '\r']).to_string());
            }
            origin @ ('-' | ' ') => {
                patch.push(origin);
                patch.push_str(&content);
            }
            _ => patch.push_str(&content),
        }
        true
    })
    .map_err(diff_failed)?;

    Ok(CommitContent {
        files,
        diff: patch,
        added,
    })
}

fn diff_failed(e: git2::Error) -> RefCheckError {
    RefCheckError::Git(GitError::DiffFailed {
        message: e.message().to_string(),
    })
}
