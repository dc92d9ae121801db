// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit message groups.

use crate::config::{GroupMatch, MessageGroup};
use crate::error::Result;

use super::category::{RuleCategory, RuleOutcome};
use super::engine::{compile_pattern, Rule, RuleContext};

/// Checks the commit message against every configured group.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageGroupsRule;

impl Rule for MessageGroupsRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::MessageGroups
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let mut failures = Vec::new();

        for (index, group) in ctx.config.rules.groups.iter().enumerate() {
            if let Some(failure) = check_group(index, group, ctx)? {
                failures.push(failure);
            }
        }

        Ok(RuleOutcome::from_failures(failures))
    }
}

/// Evaluate one group, returning the failure line if it does not hold.
fn check_group(index: usize, group: &MessageGroup, ctx: &RuleContext<'_>) -> Result<Option<String>> {
    if group.rules.is_empty() {
        return Ok(None);
    }

    let mut matched = Vec::with_capacity(group.rules.len());
    for (rule_index, rule) in group.rules.iter().enumerate() {
        let key = format!("rules.groups[{}].rules[{}].pattern", index, rule_index);
        let re = compile_pattern(&key, &rule.pattern)?;
        matched.push(re.is_match(&ctx.commit.message));
    }

    // Rules whose messages explain the failure.
    let offending: Vec<_> = match group.match_kind {
        GroupMatch::All => group
            .rules
            .iter()
            .zip(&matched)
            .filter(|(_, m)| !**m)
            .map(|(r, _)| r)
            .collect(),
        GroupMatch::One => {
            if matched.iter().any(|m| *m) {
                Vec::new()
            } else {
                group.rules.iter().collect()
            }
        }
        GroupMatch::None => group
            .rules
            .iter()
            .zip(&matched)
            .filter(|(_, m)| **m)
            .map(|(r, _)| r)
            .collect(),
    };

    if offending.is_empty() {
        return Ok(None);
    }

    let heading = match &group.message {
        Some(message) => ctx.render(message)?,
        None => default_heading(group.match_kind).to_string(),
    };

    let mut reasons = Vec::with_capacity(offending.len());
    for rule in offending {
        if rule.message.is_empty() {
            reasons.push(rule.pattern.clone());
        } else {
            reasons.push(ctx.render(&rule.message)?);
        }
    }

    Ok(Some(format!("{}: {}", heading, reasons.join("; "))))
}

fn default_heading(kind: GroupMatch) -> &'static str {
    match kind {
        GroupMatch::All => "Commit message must match all of",
        GroupMatch::One => "Commit message must match at least one of",
        GroupMatch::None => "Commit message must match none of",
    }
}
