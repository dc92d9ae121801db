// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Issue tracker query rule.

use crate::error::Result;
use crate::host::IssueTracker;
use lazy_static::lazy_static;
use regex::Regex;

use super::category::{RuleCategory, RuleOutcome};
use super::engine::{compile_pattern, Rule, RuleContext};

lazy_static! {
    /// A template expression naming `issue_keys` or `issue_key_list`.
    static ref ISSUE_KEYS_RE: Regex =
        Regex::new(r"\{\{[^}]*\bissue_key(?:s|_list)\b[^}]*\}\}").unwrap();
}

/// Whether `query` is rendered with the issue keys of the commit.
fn uses_issue_keys(query: &str) -> bool {
    ISSUE_KEYS_RE.is_match(query)
}

/// Every configured query, rendered for the commit, must return at least
/// one issue.
///
/// A query that uses the issue keys fails without searching when the
/// message has none.
pub struct IssueQueryRule<'a> {
    tracker: &'a dyn IssueTracker,
}

impl<'a> IssueQueryRule<'a> {
    pub fn new(tracker: &'a dyn IssueTracker) -> Self {
        Self { tracker }
    }
}

impl Rule for IssueQueryRule<'_> {
    fn category(&self) -> RuleCategory {
        RuleCategory::IssueQuery
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let rules = &ctx.config.rules;
        if rules.issue_queries.is_empty() {
            return Ok(RuleOutcome::pass());
        }

        let key_re = compile_pattern("rules.issue_key_pattern", &rules.issue_key_pattern)?;
        let mut keys: Vec<String> = Vec::new();
        for m in key_re.find_iter(&ctx.commit.message) {
            if !keys.iter().any(|k| k == m.as_str()) {
                keys.push(m.as_str().to_string());
            }
        }

        let render_ctx = ctx.render_context().with_issue_keys(&keys);
        let mut failures = Vec::new();

        for issue_query in &rules.issue_queries {
            if keys.is_empty() && uses_issue_keys(&issue_query.query) {
                failures.push(format!(
                    "No issue key found in message for query '{}'",
                    issue_query.query
                ));
                continue;
            }

            let query = ctx.renderer.render(&issue_query.query, &render_ctx)?;
            let query = query.trim();
            if query.is_empty() {
                continue;
            }

            let count = self.tracker.search(query)?;
            tracing::debug!("Issue query '{}' returned {} issue(s)", query, count);

            if count == 0 {
                let failure = match &issue_query.message {
                    Some(message) => ctx.renderer.render(message, &render_ctx)?,
                    None => format!("No issue matches '{}'", query),
                };
                failures.push(failure);
            }
        }

        Ok(RuleOutcome::from_failures(failures))
    }
}
