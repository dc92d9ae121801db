// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Collaborators provided by the hosting side.
//!
//! The validator only talks to these traits. The git-backed resolver
//! lives in [`crate::git`]; the user directory and issue tracker used by
//! the command-line front end are in this module.

mod directory;
mod tracker;

pub use directory::{FileUserDirectory, StaticUserDirectory, UnconfiguredUserDirectory};
pub use tracker::{CommandIssueTracker, AUTH_REQUIRED_EXIT_CODE};

use crate::commit::{Commit, MergeProposal, RefUpdate};
use crate::config::RefCheckConfig;
use crate::error::Result;
use serde::Deserialize;

/// Produces the commits newly introduced by a ref update or merge
/// proposal, oldest first.
pub trait ChangeSetResolver {
    /// Commits introduced by `update`.
    fn new_commits(&self, config: &RefCheckConfig, update: &RefUpdate) -> Result<Vec<Commit>>;

    /// Commits a merge proposal would bring into its target.
    fn proposal_commits(
        &self,
        config: &RefCheckConfig,
        proposal: &MergeProposal,
    ) -> Result<Vec<Commit>>;
}

/// A user known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Looks up users known to the host.
pub trait UserDirectory {
    /// Find a user by email address, ignoring case.
    fn find_by_email(&self, email: &str) -> Result<Option<HostUser>>;

    /// Find a user by user name or display name, ignoring case.
    fn find_by_name(&self, name: &str) -> Result<Option<HostUser>>;
}

/// Runs queries against an issue tracker.
pub trait IssueTracker {
    /// Number of issues matching `query`.
    fn search(&self, query: &str) -> Result<usize>;
}
