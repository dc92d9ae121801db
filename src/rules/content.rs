// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Content size and diff rules.

use crate::error::{ConfigError, RefCheckError, Result};

use super::category::{RuleCategory, RuleOutcome};
use super::engine::{compile_pattern, Rule, RuleContext};

/// Offending diff lines listed before the rest are summarized.
const MAX_REPORTED_LINES: usize = 5;

/// No added or modified file may exceed `rules.max_file_size_kb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSizeRule;

impl Rule for ContentSizeRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::ContentSize
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let Some(max_kb) = ctx.config.rules.max_file_size_kb else {
            return Ok(RuleOutcome::pass());
        };

        let excludes = ctx
            .config
            .rules
            .size_exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    RefCheckError::Config(ConfigError::InvalidPattern {
                        key: "rules.size_exclude".to_string(),
                        message: format!("{}: {}", p, e),
                    })
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let limit = max_kb.saturating_mul(1024);
        let failures = ctx
            .commit
            .content
            .files
            .iter()
            .filter(|f| f.size > limit)
            .filter(|f| !excludes.iter().any(|p| p.matches_path(&f.path)))
            .map(|f| {
                format!(
                    "{} is {} kb, larger than {} kb",
                    f.path.display(),
                    f.size.div_ceil(1024),
                    max_kb
                )
            })
            .collect();

        Ok(RuleOutcome::from_failures(failures))
    }
}

/// No added line may contain `rules.reject_diff_pattern`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDiffRule;

impl Rule for ContentDiffRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::ContentDiff
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        let Some(pattern) = ctx.config.rules.reject_diff_pattern.as_deref() else {
            return Ok(RuleOutcome::pass());
        };
        let re = compile_pattern("rules.reject_diff_pattern", pattern)?;

        let offending: Vec<_> = ctx
            .commit
            .content
            .added_lines()
            .filter(|line| re.is_match(line))
            .collect();

        if offending.is_empty() {
            return Ok(RuleOutcome::pass());
        }

        let mut failures: Vec<String> = offending
            .iter()
            .take(MAX_REPORTED_LINES)
            .map(|line| format!("Added line matches '{}': {}", pattern, line.trim()))
            .collect();
        if offending.len() > MAX_REPORTED_LINES {
            failures.push(format!(
                "... and {} more",
                offending.len() - MAX_REPORTED_LINES
            ));
        }

        Ok(RuleOutcome::from_failures(failures))
    }
}
