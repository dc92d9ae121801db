// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule trait and the ordered rule set.

use crate::commit::{Commit, Identity};
use crate::config::RefCheckConfig;
use crate::error::{ConfigError, RefCheckError, Result};
use crate::host::{IssueTracker, UserDirectory};
use crate::render::{RenderContext, Renderer};
use regex::Regex;

use super::category::{RuleCategory, RuleOutcome};
use super::content::{ContentDiffRule, ContentSizeRule};
use super::directory::{KnownEmailRule, KnownNameRule};
use super::identity::{EmailMatchRule, NameMatchRule, Role};
use super::issues::IssueQueryRule;
use super::message::MessageGroupsRule;

/// Everything a rule may look at while evaluating one commit.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub config: &'a RefCheckConfig,
    pub commit: &'a Commit,
    /// The authenticated user performing the update, if known.
    pub pusher: Option<&'a Identity>,
    pub ref_id: &'a str,
    pub renderer: &'a Renderer,
}

impl<'a> RuleContext<'a> {
    /// Template data bound to this commit.
    pub fn render_context(&self) -> RenderContext<'a> {
        RenderContext::for_ref(self.pusher, self.ref_id).with_commit(self.commit)
    }

    /// Render `template` for this commit.
    pub fn render(&self, template: &str) -> Result<String> {
        self.renderer.render(template, &self.render_context())
    }
}

/// A check run against every commit.
pub trait Rule {
    /// The category this rule reports under.
    fn category(&self) -> RuleCategory;

    /// Evaluate the commit in `ctx`.
    ///
    /// Violations are returned as failing outcomes; `Err` is reserved for
    /// failures that should abort the whole validation.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome>;
}

/// An ordered list of rules. Evaluation order is registration order.
pub struct RuleSet<'a> {
    rules: Vec<Box<dyn Rule + 'a>>,
}

impl std::fmt::Debug for RuleSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.category()))
            .finish()
    }
}

impl<'a> RuleSet<'a> {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rules, one per category, in [`RuleCategory::ALL`] order.
    pub fn standard(directory: &'a dyn UserDirectory, tracker: &'a dyn IssueTracker) -> Self {
        let mut set = Self::new();
        set.register(MessageGroupsRule);
        set.register(EmailMatchRule::new(Role::Author));
        set.register(EmailMatchRule::new(Role::Committer));
        set.register(NameMatchRule::new(Role::Author));
        set.register(NameMatchRule::new(Role::Committer));
        set.register(ContentSizeRule);
        set.register(ContentDiffRule);
        set.register(KnownEmailRule::new(directory));
        set.register(KnownNameRule::new(directory));
        set.register(IssueQueryRule::new(tracker));

        debug_assert!(set.categories().eq(RuleCategory::ALL.iter().copied()));
        set
    }

    /// Append a rule to the end of the evaluation order.
    pub fn register(&mut self, rule: impl Rule + 'a) {
        self.rules.push(Box::new(rule));
    }

    /// Iterate over the rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Rule + 'a)> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// The categories in evaluation order.
    pub fn categories(&self) -> impl Iterator<Item = RuleCategory> + '_ {
        self.rules.iter().map(|r| r.category())
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile a configured pattern, reporting failures against `key`.
pub(crate) fn compile_pattern(key: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| RefCheckError::Config(ConfigError::invalid_pattern(key, e)))
}
