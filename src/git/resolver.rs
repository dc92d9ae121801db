// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Change set resolution backed by a local repository.

use crate::commit::{Commit, MergeProposal, RefChangeKind, RefUpdate};
use crate::config::{ExclusionsConfig, RefCheckConfig};
use crate::error::{ConfigError, RefCheckError, Result};
use crate::host::ChangeSetResolver;
use git2::Oid;
use regex::Regex;
use std::path::Path;

use super::diff::commit_content;
use super::repo::Repository;

/// Resolves change sets by walking the repository the hook runs in.
pub struct GitResolver {
    repo: Repository,
}

impl GitResolver {
    /// Wrap an open repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Repository::open(path)?))
    }

    /// The underlying repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn collect(&self, exclusions: &ExclusionsConfig, push: Oid, hide: &[Oid]) -> Result<Vec<Commit>> {
        let exclude_pattern = exclusions
            .exclude_commit_pattern
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    RefCheckError::Config(ConfigError::invalid_pattern(
                        "exclusions.exclude_commit_pattern",
                        e,
                    ))
                })
            })
            .transpose()?;

        let mut commits = Vec::new();
        for oid in self.repo.commits_between(push, hide)? {
            let commit = self.repo.load_commit(oid)?;

            if exclusions.exclude_merge_commits && commit.is_merge() {
                tracing::debug!("Excluding merge commit {}", commit.short_id());
                continue;
            }
            if let Some(re) = &exclude_pattern {
                if re.is_match(&commit.message) {
                    tracing::debug!("Excluding commit {} by message", commit.short_id());
                    continue;
                }
            }

            let content = commit_content(&self.repo, &self.repo.find_commit(oid)?)?;
            commits.push(commit.with_content(content));
        }

        Ok(commits)
    }
}

impl ChangeSetResolver for GitResolver {
    fn new_commits(&self, config: &RefCheckConfig, update: &RefUpdate) -> Result<Vec<Commit>> {
        let hide = match update.kind {
            RefChangeKind::Delete => return Ok(Vec::new()),
            RefChangeKind::Add => self.repo.ref_tips_except(&update.ref_id)?,
            RefChangeKind::Update => vec![self.repo.resolve(&update.from_hash)?],
        };
        let to = self.repo.resolve(&update.to_hash)?;

        self.collect(&config.exclusions, to, &hide)
    }

    fn proposal_commits(
        &self,
        config: &RefCheckConfig,
        proposal: &MergeProposal,
    ) -> Result<Vec<Commit>> {
        let from = self.repo.resolve(&proposal.from_hash)?;
        let to = self.repo.resolve(&proposal.to_hash)?;
        self.collect(&config.exclusions, from, &[to])
    }
}
