// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Repository operations.

use crate::commit::{Commit, Identity};
use crate::error::{GitError, RefCheckError, Result};
use git2::{Oid, Repository as Git2Repo, Sort};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Variables naming a single object directory git wants hooks to read.
const OBJECT_DIR_VARS: &[&str] = &["GIT_QUARANTINE_PATH", "GIT_OBJECT_DIRECTORY"];

/// Variable listing extra object directories, separated like `PATH`.
const ALTERNATES_VAR: &str = "GIT_ALTERNATE_OBJECT_DIRECTORIES";

/// Wrapper around git2::Repository with the lookups the resolver needs.
///
/// Server-side hooks run inside bare repositories, so unlike a working
/// copy there is no requirement for a work tree.
pub struct Repository {
    inner: Git2Repo,
}

impl Repository {
    /// Open a repository from a path.
    ///
    /// Inside a `pre-receive` or `update` hook, git keeps the pushed objects
    /// in a quarantine directory named by the environment. Those directories
    /// are added as alternates so the pushed commits can be resolved.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                RefCheckError::Git(GitError::NotARepository)
            } else {
                RefCheckError::Git(GitError::OpenFailed {
                    message: e.message().to_string(),
                })
            }
        })?;

        Self { inner: repo }.with_object_dirs(&hook_object_dirs(|key| std::env::var_os(key)))
    }

    /// Make the objects stored in `dirs` readable through this repository.
    pub fn with_object_dirs(self, dirs: &[PathBuf]) -> Result<Self> {
        if dirs.is_empty() {
            return Ok(self);
        }

        {
            let odb = self.inner.odb().map_err(|e| command_failed("odb", e))?;
            for dir in dirs.iter().filter(|dir| dir.is_dir()) {
                let Some(alternate) = dir.to_str() else {
                    tracing::warn!("Skipping object directory {}: not UTF-8", dir.display());
                    continue;
                };
                tracing::debug!("Adding object directory {}", alternate);
                odb.add_disk_alternate(alternate)
                    .map_err(|e| command_failed("odb.add_disk_alternate", e))?;
            }
        }

        Ok(self)
    }

    /// Get a reference to the inner git2 repository.
    pub fn inner(&self) -> &Git2Repo {
        &self.inner
    }

    /// Get the git directory path (.git, or the repository itself when bare).
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Parse a full or abbreviated object id.
    pub fn resolve(&self, hash: &str) -> Result<Oid> {
        let obj = self.inner.revparse_single(hash).map_err(|e| {
            RefCheckError::Git(GitError::InvalidReference {
                reference: format!("{}: {}", hash, e.message()),
            })
        })?;
        let commit = obj.peel_to_commit().map_err(|e| {
            RefCheckError::Git(GitError::InvalidReference {
                reference: format!("{}: {}", hash, e.message()),
            })
        })?;
        Ok(commit.id())
    }

    /// Tips of every branch and tag except `ref_id`.
    pub fn ref_tips_except(&self, ref_id: &str) -> Result<Vec<Oid>> {
        let references = self.inner.references().map_err(|e| command_failed("references", e))?;

        let mut tips = Vec::new();
        for reference in references {
            let reference = reference.map_err(|e| command_failed("references", e))?;
            let Some(name) = reference.name() else {
                continue;
            };
            if name == ref_id || !(name.starts_with("refs/heads/") || name.starts_with("refs/tags/"))
            {
                continue;
            }
            // Tags may point at trees or blobs; those hide nothing.
            if let Ok(commit) = reference.peel_to_commit() {
                tips.push(commit.id());
            }
        }
        Ok(tips)
    }

    /// Commits reachable from `push` but not from any of `hide`, oldest first.
    pub fn commits_between(&self, push: Oid, hide: &[Oid]) -> Result<Vec<Oid>> {
        let mut revwalk = self.inner.revwalk().map_err(|e| command_failed("revwalk", e))?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
            .map_err(|e| command_failed("revwalk.set_sorting", e))?;
        revwalk
            .push(push)
            .map_err(|e| command_failed("revwalk.push", e))?;
        for oid in hide {
            revwalk
                .hide(*oid)
                .map_err(|e| command_failed("revwalk.hide", e))?;
        }

        revwalk
            .map(|oid| oid.map_err(|e| command_failed("revwalk", e)))
            .collect()
    }

    /// Load the commit `oid` with its metadata, without content.
    pub fn load_commit(&self, oid: Oid) -> Result<Commit> {
        let commit = self.find_commit(oid)?;
        let author = identity(&commit.author());
        let committer = identity(&commit.committer());

        let loaded = Commit::new(
            oid.to_string(),
            String::from_utf8_lossy(commit.message_bytes()),
            author,
        )
        .with_committer(committer)
        .with_parent_count(commit.parent_count());
        Ok(loaded)
    }

    /// Look up a git2 commit.
    pub fn find_commit(&self, oid: Oid) -> Result<git2::Commit<'_>> {
        self.inner.find_commit(oid).map_err(|e| {
            RefCheckError::Git(GitError::InvalidReference {
                reference: format!("{}: {}", oid, e.message()),
            })
        })
    }
}

/// Object directories named by the hook environment, in lookup order.
fn hook_object_dirs(var: impl Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    let single = OBJECT_DIR_VARS.iter().filter_map(|key| var(key)).map(PathBuf::from);
    let alternates = var(ALTERNATES_VAR)
        .map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut dirs: Vec<PathBuf> = Vec::new();
    for dir in single.chain(alternates) {
        if !dir.as_os_str().is_empty() && !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

fn identity(signature: &git2::Signature<'_>) -> Identity {
    Identity::new(
        String::from_utf8_lossy(signature.name_bytes()),
        String::from_utf8_lossy(signature.email_bytes()),
    )
}

pub(super) fn command_failed(command: &str, e: git2::Error) -> RefCheckError {
    RefCheckError::Git(GitError::CommandFailed {
        command: command.to_string(),
        message: e.message().to_string(),
    })
}
