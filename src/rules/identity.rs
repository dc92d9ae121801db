// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Author and committer identity rules.

use crate::commit::Identity;
use crate::error::Result;

use super::category::{RuleCategory, RuleOutcome};
use super::engine::{compile_pattern, Rule, RuleContext};

/// Which identity of a commit a rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Author,
    Committer,
}

impl Role {
    fn label(&self) -> &'static str {
        match self {
            Role::Author => "Author",
            Role::Committer => "Committer",
        }
    }

    fn identity<'c>(&self, ctx: &RuleContext<'c>) -> &'c Identity {
        match self {
            Role::Author => &ctx.commit.author,
            Role::Committer => &ctx.commit.committer,
        }
    }
}

/// A field of the pusher's identity. An empty field is as unknown as a
/// missing pusher.
fn pusher_field<'c>(ctx: &RuleContext<'c>, field: fn(&Identity) -> &str) -> Option<&'c str> {
    ctx.pusher.map(field).filter(|value| !value.is_empty())
}

/// Email of the author or committer must match the pusher, or a
/// configured pattern.
///
/// Patterns are rendered before compiling. `{{pusher.email}}` is inserted
/// as is, so its `.` and `+` act as regex syntax; `{{pusher.email_regex}}`
/// matches the address literally.
#[derive(Debug, Clone, Copy)]
pub struct EmailMatchRule {
    role: Role,
}

impl EmailMatchRule {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    fn settings<'c>(&self, ctx: &RuleContext<'c>) -> (bool, Option<&'c str>, &'static str) {
        let rules = &ctx.config.rules;
        match self.role {
            Role::Author => (
                rules.require_matching_author_email,
                rules.author_email_pattern.as_deref(),
                "rules.author_email_pattern",
            ),
            Role::Committer => (
                rules.require_matching_committer_email,
                rules.committer_email_pattern.as_deref(),
                "rules.committer_email_pattern",
            ),
        }
    }
}

impl Rule for EmailMatchRule {
    fn category(&self) -> RuleCategory {
        match self.role {
            Role::Author => RuleCategory::AuthorEmail,
            Role::Committer => RuleCategory::CommitterEmail,
        }
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let (required, pattern, key) = self.settings(ctx);
        let email = &self.role.identity(ctx).email;

        if let Some(template) = pattern {
            let rendered = ctx.render(template)?;
            let re = compile_pattern(key, &rendered)?;
            return Ok(if re.is_match(email) {
                RuleOutcome::pass()
            } else {
                RuleOutcome::fail(format!(
                    "{} email '{}' does not match '{}'",
                    self.role.label(),
                    email,
                    rendered
                ))
            });
        }

        if !required {
            return Ok(RuleOutcome::pass());
        }

        Ok(match pusher_field(ctx, |p| p.email.as_str()) {
            Some(pusher_email) if pusher_email.eq_ignore_ascii_case(email) => RuleOutcome::pass(),
            Some(pusher_email) => RuleOutcome::fail(format!(
                "{} email '{}' does not match pusher email '{}'",
                self.role.label(),
                email,
                pusher_email
            )),
            None => RuleOutcome::fail(format!(
                "{} email '{}' cannot be checked: no pushing user",
                self.role.label(),
                email
            )),
        })
    }
}

/// Name of the author or committer must match the pusher.
#[derive(Debug, Clone, Copy)]
pub struct NameMatchRule {
    role: Role,
}

impl NameMatchRule {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

impl Rule for NameMatchRule {
    fn category(&self) -> RuleCategory {
        match self.role {
            Role::Author => RuleCategory::AuthorName,
            Role::Committer => RuleCategory::CommitterName,
        }
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let required = match self.role {
            Role::Author => ctx.config.rules.require_matching_author_name,
            Role::Committer => ctx.config.rules.require_matching_committer_name,
        };
        if !required {
            return Ok(RuleOutcome::pass());
        }

        let name = &self.role.identity(ctx).name;
        Ok(match pusher_field(ctx, |p| p.name.as_str()) {
            Some(pusher_name) if pusher_name.eq_ignore_ascii_case(name) => RuleOutcome::pass(),
            Some(pusher_name) => RuleOutcome::fail(format!(
                "{} name '{}' does not match pusher name '{}'",
                self.role.label(),
                name,
                pusher_name
            )),
            None => RuleOutcome::fail(format!(
                "{} name '{}' cannot be checked: no pushing user",
                self.role.label(),
                name
            )),
        })
    }
}
