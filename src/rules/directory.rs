// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rules that look the author up in the host's user directory.

use crate::error::Result;
use crate::host::UserDirectory;

use super::category::{RuleCategory, RuleOutcome};
use super::engine::{Rule, RuleContext};

/// The author email must belong to a known user.
pub struct KnownEmailRule<'a> {
    directory: &'a dyn UserDirectory,
}

impl<'a> KnownEmailRule<'a> {
    pub fn new(directory: &'a dyn UserDirectory) -> Self {
        Self { directory }
    }
}

impl Rule for KnownEmailRule<'_> {
    fn category(&self) -> RuleCategory {
        RuleCategory::AuthorEmailKnown
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        if !ctx.config.rules.require_author_email_in_directory {
            return Ok(RuleOutcome::pass());
        }

        let email = &ctx.commit.author.email;
        Ok(match self.directory.find_by_email(email)? {
            Some(_) => RuleOutcome::pass(),
            None => RuleOutcome::fail(format!("Author email '{}' is not a known user", email)),
        })
    }
}

/// The author name must belong to a known user.
pub struct KnownNameRule<'a> {
    directory: &'a dyn UserDirectory,
}

impl<'a> KnownNameRule<'a> {
    pub fn new(directory: &'a dyn UserDirectory) -> Self {
        Self { directory }
    }
}

impl Rule for KnownNameRule<'_> {
    fn category(&self) -> RuleCategory {
        RuleCategory::AuthorNameKnown
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        if !ctx.config.rules.require_author_name_in_directory {
            return Ok(RuleOutcome::pass());
        }

        let name = &ctx.commit.author.name;
        Ok(match self.directory.find_by_name(name)? {
            Some(_) => RuleOutcome::pass(),
            None => RuleOutcome::fail(format!("Author name '{}' is not a known user", name)),
        })
    }
}
