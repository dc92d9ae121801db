// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Ref update validation.
//!
//! [`RefUpdateValidator`] expands ref updates and merge proposals into
//! their new commits, runs every rule against every commit and collects
//! the outcomes. Rule violations never stop validation; errors from the
//! resolver or from a rule abort the update being validated and are
//! returned to the caller.

use crate::commit::{Commit, Identity, MergeProposal, RefChangeKind, RefUpdate};
use crate::config::RefCheckConfig;
use crate::error::{ConfigError, RefCheckError, Result};
use crate::host::ChangeSetResolver;
use crate::render::Renderer;
use crate::rules::{RuleContext, RuleSet};
use crate::verification::{BatchVerificationResult, RefUpdateVerificationResult};
use regex::Regex;

/// Validates ref updates and merge proposals against a rule set.
pub struct RefUpdateValidator<'a> {
    config: &'a RefCheckConfig,
    resolver: &'a dyn ChangeSetResolver,
    rules: RuleSet<'a>,
    renderer: Renderer,
    pusher: Option<Identity>,
    include: Regex,
    reject: Option<Regex>,
}

impl<'a> RefUpdateValidator<'a> {
    /// Create a validator. Fails if a branch pattern does not compile.
    pub fn new(
        config: &'a RefCheckConfig,
        resolver: &'a dyn ChangeSetResolver,
        rules: RuleSet<'a>,
    ) -> Result<Self> {
        let include = Regex::new(&config.branches.include).map_err(|e| {
            RefCheckError::Config(ConfigError::invalid_pattern("branches.include", e))
        })?;
        let reject = config
            .branches
            .reject
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    RefCheckError::Config(ConfigError::invalid_pattern("branches.reject", e))
                })
            })
            .transpose()?;

        Ok(Self {
            config,
            resolver,
            rules,
            renderer: Renderer::new(),
            pusher: None,
            include,
            reject,
        })
    }

    /// Set the user performing the update.
    pub fn with_pusher(mut self, pusher: Identity) -> Self {
        self.pusher = Some(pusher);
        self
    }

    /// Use a custom renderer.
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Validate every update, keeping the results that have something to
    /// report. Deleted refs and refs outside `branches.include` are skipped.
    pub fn validate_batch(&self, updates: &[RefUpdate]) -> Result<BatchVerificationResult> {
        let mut batch = BatchVerificationResult::new();

        for update in updates {
            tracing::debug!(
                "RefChange {} {} {} {}",
                update.from_hash,
                update.ref_id,
                update.to_hash,
                update.kind
            );

            if !self.should_validate(update) {
                tracing::debug!("Skipping {} ({})", update.ref_id, update.kind);
                continue;
            }

            let result = self.validate_update(update)?;
            if result.has_reportables() {
                batch.add(result);
            }
        }

        tracing::info!(
            "Validated {} ref update(s), {} with findings",
            updates.len(),
            batch.len()
        );
        Ok(batch)
    }

    /// Whether `update` is validated by [`validate_batch`](Self::validate_batch).
    pub fn should_validate(&self, update: &RefUpdate) -> bool {
        update.kind != RefChangeKind::Delete && self.include.is_match(&update.ref_id)
    }

    /// Validate the commits introduced by one ref update.
    pub fn validate_update(&self, update: &RefUpdate) -> Result<RefUpdateVerificationResult> {
        let commits = self.resolver.new_commits(self.config, update)?;
        self.validate_commits(&update.ref_id, &update.from_hash, &update.to_hash, &commits)
    }

    /// Validate the commits a merge proposal would introduce. Proposals are
    /// always validated, whatever their source ref.
    pub fn validate_merge_proposal(
        &self,
        proposal: &MergeProposal,
    ) -> Result<RefUpdateVerificationResult> {
        tracing::debug!(
            "Merge proposal {}@{} -> {}@{}",
            proposal.from_ref_id,
            proposal.from_hash,
            proposal.to_ref_id,
            proposal.to_hash
        );

        let commits = self.resolver.proposal_commits(self.config, proposal)?;
        self.validate_commits(
            &proposal.from_ref_id,
            &proposal.from_hash,
            &proposal.to_hash,
            &commits,
        )
    }

    /// Validate several merge proposals, keeping the results that have
    /// something to report.
    pub fn validate_merge_proposals(
        &self,
        proposals: &[MergeProposal],
    ) -> Result<BatchVerificationResult> {
        let mut batch = BatchVerificationResult::new();
        for proposal in proposals {
            let result = self.validate_merge_proposal(proposal)?;
            if result.has_reportables() {
                batch.add(result);
            }
        }
        Ok(batch)
    }

    /// Whether `ref_id` passes the branch name gate. A ref is rejected when
    /// `branches.reject` is found in it.
    pub fn branch_name_accepted(&self, ref_id: &str) -> bool {
        match &self.reject {
            Some(reject) => !reject.is_match(ref_id),
            None => true,
        }
    }

    fn validate_commits(
        &self,
        ref_id: &str,
        from_hash: &str,
        to_hash: &str,
        commits: &[Commit],
    ) -> Result<RefUpdateVerificationResult> {
        let mut result = RefUpdateVerificationResult::new(ref_id, from_hash, to_hash);
        result.set_branch_name_accepted(self.branch_name_accepted(ref_id));

        for commit in commits {
            tracing::debug!(
                "ChangeSet {} {:?} {} {}",
                commit.id,
                commit.subject(),
                commit.parent_count,
                commit.committer
            );

            let ctx = RuleContext {
                config: self.config,
                commit,
                pusher: self.pusher.as_ref(),
                ref_id,
                renderer: &self.renderer,
            };

            for rule in self.rules.iter() {
                let outcome = rule.evaluate(&ctx)?;
                result.record(commit, rule.category(), outcome);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GroupMatch, MessageGroup, MessageRule};
    use crate::error::ServiceError;
    use crate::host::{HostUser, IssueTracker, StaticUserDirectory, UserDirectory};
    use crate::rules::{RuleCategory, RuleOutcome};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    const ZERO: &str = "0000000000000000000000000000000000000000";

    /// Resolver returning canned commits per target hash.
    #[derive(Default)]
    struct FakeResolver {
        commits: HashMap<String, Vec<Commit>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeResolver {
        fn with(mut self, to_hash: &str, commits: Vec<Commit>) -> Self {
            self.commits.insert(to_hash.to_string(), commits);
            self
        }
    }

    impl ChangeSetResolver for FakeResolver {
        fn new_commits(&self, _config: &RefCheckConfig, update: &RefUpdate) -> Result<Vec<Commit>> {
            self.calls.borrow_mut().push(update.ref_id.clone());
            Ok(self.commits.get(&update.to_hash).cloned().unwrap_or_default())
        }

        fn proposal_commits(
            &self,
            _config: &RefCheckConfig,
            proposal: &MergeProposal,
        ) -> Result<Vec<Commit>> {
            self.calls.borrow_mut().push(proposal.from_ref_id.clone());
            Ok(self.commits.get(&proposal.from_hash).cloned().unwrap_or_default())
        }
    }

    /// Tracker that fails with an authentication error on the nth search.
    struct FlakyTracker {
        fail_on: usize,
        seen: Cell<usize>,
    }

    impl IssueTracker for FlakyTracker {
        fn search(&self, _query: &str) -> Result<usize> {
            let n = self.seen.get() + 1;
            self.seen.set(n);
            if n == self.fail_on {
                return Err(RefCheckError::Service(ServiceError::AuthenticationRequired {
                    service: "issue tracker".to_string(),
                }));
            }
            Ok(1)
        }
    }

    fn tracker() -> FlakyTracker {
        FlakyTracker {
            fail_on: usize::MAX,
            seen: Cell::new(0),
        }
    }

    fn ann() -> Identity {
        Identity::new("ann", "ann@example.com")
    }

    fn commit(id: &str, message: &str) -> Commit {
        Commit::new(id, message, ann())
    }

    fn update(ref_id: &str, from: &str, to: &str) -> RefUpdate {
        RefUpdate::new(ref_id, from, to)
    }

    fn hash(c: char) -> String {
        std::iter::repeat(c).take(40).collect()
    }

    fn no_wip_config() -> RefCheckConfig {
        let mut config = RefCheckConfig::default();
        config.branches.reject = Some("^refs/heads/master$".to_string());
        config.rules.groups = vec![MessageGroup {
            match_kind: GroupMatch::None,
            message: None,
            rules: vec![MessageRule {
                pattern: "^WIP".to_string(),
                message: "work in progress".to_string(),
            }],
        }];
        config
    }

    #[test]
    fn test_single_failing_rule_scenario() {
        let config = no_wip_config();
        let resolver = FakeResolver::default().with(&hash('b'), vec![commit(&hash('c'), "WIP")]);
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap()
                .with_pusher(ann());

        let batch = validator
            .validate_batch(&[update("refs/heads/feature/x", &hash('a'), &hash('b'))])
            .unwrap();

        assert_eq!(batch.len(), 1);
        let result = &batch.results()[0];
        assert!(result.branch_name_accepted);
        assert_eq!(result.commits.len(), 1);

        let outcomes = &result.commits[0].outcomes;
        let categories: Vec<_> = outcomes.iter().map(|o| o.category).collect();
        assert_eq!(categories, RuleCategory::ALL.to_vec());
        assert_eq!(outcomes.iter().filter(|o| !o.outcome.passed).count(), 1);
        assert!(!outcomes[0].outcome.passed);
        assert_eq!(outcomes[0].category, RuleCategory::MessageGroups);
    }

    #[test]
    fn test_delete_is_never_resolved() {
        let config = no_wip_config();
        let resolver = FakeResolver::default().with(ZERO, vec![commit(&hash('c'), "WIP")]);
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap();

        let batch = validator
            .validate_batch(&[update("refs/heads/master", &hash('a'), ZERO)])
            .unwrap();

        assert!(batch.is_empty());
        assert!(resolver.calls.borrow().is_empty());
    }

    #[test]
    fn test_include_pattern_filters_refs() {
        let mut config = no_wip_config();
        config.branches.include = "heads/release".to_string();
        let resolver = FakeResolver::default()
            .with(&hash('b'), vec![commit(&hash('c'), "WIP")])
            .with(&hash('d'), vec![commit(&hash('e'), "WIP")]);
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap();

        let batch = validator
            .validate_batch(&[
                update("refs/heads/feature/x", &hash('a'), &hash('b')),
                update("refs/heads/release/1.0", &hash('a'), &hash('d')),
            ])
            .unwrap();

        assert_eq!(*resolver.calls.borrow(), vec!["refs/heads/release/1.0".to_string()]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.results()[0].ref_id, "refs/heads/release/1.0");
    }

    #[test]
    fn test_only_reportable_updates_are_kept() {
        let mut config = RefCheckConfig::default();
        config.rules.require_matching_author_name = true;
        let resolver = FakeResolver::default()
            .with(&hash('b'), vec![commit(&hash('c'), "fine")])
            .with(
                &hash('d'),
                vec![Commit::new(hash('e'), "fine", Identity::new("mallory", "ann@example.com"))],
            );
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap()
                .with_pusher(ann());

        let batch = validator
            .validate_batch(&[
                update("refs/heads/a", &hash('a'), &hash('b')),
                update("refs/heads/b", &hash('a'), &hash('d')),
            ])
            .unwrap();

        assert_eq!(batch.len(), 1);
        let result = &batch.results()[0];
        assert_eq!(result.ref_id, "refs/heads/b");
        assert_eq!(result.failure_count(), 1);
        assert!(!result.commits[0]
            .outcome(RuleCategory::AuthorName)
            .unwrap()
            .passed);
    }

    #[test]
    fn test_rejected_branch_is_reported_without_commits() {
        let config = no_wip_config();
        let resolver = FakeResolver::default();
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap();

        let batch = validator
            .validate_batch(&[update("refs/heads/master", &hash('a'), &hash('b'))])
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert!(!batch.results()[0].branch_name_accepted);
        assert!(batch.results()[0].commits.is_empty());
    }

    #[test]
    fn test_no_short_circuit_within_commit() {
        let mut config = no_wip_config();
        config.rules.require_matching_author_email = true;
        config.rules.require_author_email_in_directory = true;
        let resolver = FakeResolver::default().with(
            &hash('b'),
            vec![Commit::new(hash('c'), "WIP", Identity::new("eve", "eve@example.com"))],
        );
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap()
                .with_pusher(ann());

        let result = validator
            .validate_update(&update("refs/heads/x", &hash('a'), &hash('b')))
            .unwrap();

        let failing: Vec<_> = result.commits[0].failures().map(|f| f.category).collect();
        assert_eq!(
            failing,
            vec![
                RuleCategory::MessageGroups,
                RuleCategory::AuthorEmail,
                RuleCategory::AuthorEmailKnown
            ]
        );
        assert_eq!(result.commits[0].outcomes.len(), 10);
    }

    #[test]
    fn test_service_error_aborts_update() {
        let mut config = RefCheckConfig::default();
        config.rules.issue_queries = vec![crate::config::IssueQuery {
            query: "project = PROJ".to_string(),
            message: None,
        }];
        let resolver = FakeResolver::default().with(
            &hash('b'),
            vec![
                commit(&hash('1'), "one"),
                commit(&hash('2'), "two"),
                commit(&hash('3'), "three"),
            ],
        );
        let directory = StaticUserDirectory::default();
        let tracker = FlakyTracker {
            fail_on: 2,
            seen: Cell::new(0),
        };
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap();

        let err = validator
            .validate_batch(&[update("refs/heads/x", &hash('a'), &hash('b'))])
            .unwrap_err();

        assert!(matches!(
            err,
            RefCheckError::Service(ServiceError::AuthenticationRequired { .. })
        ));
        assert_eq!(tracker.seen.get(), 2);
    }

    #[test]
    fn test_directory_is_consulted_per_commit() {
        struct CountingDirectory(Cell<usize>);

        impl UserDirectory for CountingDirectory {
            fn find_by_email(&self, _email: &str) -> Result<Option<HostUser>> {
                self.0.set(self.0.get() + 1);
                Ok(None)
            }

            fn find_by_name(&self, _name: &str) -> Result<Option<HostUser>> {
                Ok(None)
            }
        }

        let mut config = RefCheckConfig::default();
        config.rules.require_author_email_in_directory = true;
        let resolver = FakeResolver::default().with(
            &hash('b'),
            vec![commit(&hash('1'), "one"), commit(&hash('2'), "two")],
        );
        let directory = CountingDirectory(Cell::new(0));
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap();

        let result = validator
            .validate_update(&update("refs/heads/x", &hash('a'), &hash('b')))
            .unwrap();

        assert_eq!(directory.0.get(), 2);
        assert_eq!(result.failure_count(), 2);
    }

    #[test]
    fn test_validation_is_repeatable() {
        let config = no_wip_config();
        let resolver = FakeResolver::default().with(
            &hash('b'),
            vec![commit(&hash('1'), "WIP one"), commit(&hash('2'), "two")],
        );
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap();
        let updates = [update("refs/heads/x", &hash('a'), &hash('b'))];

        assert_eq!(
            validator.validate_batch(&updates).unwrap(),
            validator.validate_batch(&updates).unwrap()
        );
    }

    #[test]
    fn test_merge_proposal_skips_gating() {
        let mut config = no_wip_config();
        config.branches.include = "^refs/heads/release/".to_string();
        let resolver = FakeResolver::default().with(&hash('b'), vec![commit(&hash('c'), "WIP")]);
        let directory = StaticUserDirectory::default();
        let tracker = tracker();
        let validator =
            RefUpdateValidator::new(&config, &resolver, RuleSet::standard(&directory, &tracker))
                .unwrap();

        let proposal = MergeProposal {
            from_ref_id: "refs/heads/feature/y".to_string(),
            from_hash: hash('b'),
            to_ref_id: "refs/heads/master".to_string(),
            to_hash: hash('a'),
        };
        let result = validator.validate_merge_proposal(&proposal).unwrap();
        assert_eq!(result.ref_id, "refs/heads/feature/y");
        assert_eq!(result.from_hash, hash('b'));
        assert_eq!(result.to_hash, hash('a'));
        assert!(result.has_reportables());

        let batch = validator.validate_merge_proposals(&[proposal]).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_custom_rule_order_is_respected() {
        struct Always(RuleCategory, bool);

        impl crate::rules::Rule for Always {
            fn category(&self) -> RuleCategory {
                self.0
            }

            fn evaluate(&self, _ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
                Ok(if self.1 {
                    RuleOutcome::pass()
                } else {
                    RuleOutcome::fail("no")
                })
            }
        }

        let config = RefCheckConfig::default();
        let resolver = FakeResolver::default().with(&hash('b'), vec![commit(&hash('c'), "x")]);
        let mut rules = RuleSet::new();
        rules.register(Always(RuleCategory::ContentDiff, false));
        rules.register(Always(RuleCategory::AuthorName, true));
        let validator = RefUpdateValidator::new(&config, &resolver, rules).unwrap();

        let result = validator
            .validate_update(&update("refs/heads/x", &hash('a'), &hash('b')))
            .unwrap();
        let categories: Vec<_> = result.commits[0].outcomes.iter().map(|o| o.category).collect();
        assert_eq!(categories, vec![RuleCategory::ContentDiff, RuleCategory::AuthorName]);
    }

    #[test]
    fn test_invalid_branch_pattern() {
        let mut config = RefCheckConfig::default();
        config.branches.reject = Some("(".to_string());
        let resolver = FakeResolver::default();
        let result = RefUpdateValidator::new(&config, &resolver, RuleSet::new());
        assert!(matches!(result, Err(RefCheckError::Config(_))));
    }

    #[test]
    fn test_branch_gate_uses_find_semantics() {
        let mut config = RefCheckConfig::default();
        config.branches.reject = Some("tmp/".to_string());
        let resolver = FakeResolver::default();
        let validator = RefUpdateValidator::new(&config, &resolver, RuleSet::new()).unwrap();

        assert!(!validator.branch_name_accepted("refs/heads/tmp/x"));
        assert!(validator.branch_name_accepted("refs/heads/main"));
    }

    #[test]
    fn test_add_update_is_validated() {
        let config = no_wip_config();
        let resolver = FakeResolver::default().with(&hash('b'), vec![commit(&hash('c'), "WIP")]);
        let validator = RefUpdateValidator::new(&config, &resolver, RuleSet::new()).unwrap();
        assert!(validator.should_validate(&update("refs/heads/new", ZERO, &hash('b'))));
    }
}
