// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Report rendering for verification results.

use crate::cli::args::OutputFormat;
use crate::commit::Identity;
use crate::config::ReportConfig;
use crate::error::{RefCheckError, RenderError, Result};
use crate::render::{RenderContext, Renderer};
use console::style;
use serde::Serialize;

use super::result::{BatchVerificationResult, RefUpdateVerificationResult};

#[derive(Serialize)]
struct JsonReport<'a> {
    accepted: bool,
    dry_run: bool,
    message: Option<String>,
    results: &'a [RefUpdateVerificationResult],
}

/// Renders a batch result for the person who pushed.
pub struct Report<'a> {
    batch: &'a BatchVerificationResult,
    config: &'a ReportConfig,
    pusher: Option<&'a Identity>,
    dry_run: bool,
}

impl<'a> Report<'a> {
    /// Create a report over `batch`.
    pub fn new(
        batch: &'a BatchVerificationResult,
        config: &'a ReportConfig,
        pusher: Option<&'a Identity>,
    ) -> Self {
        Self {
            batch,
            config,
            pusher,
            dry_run: config.dry_run,
        }
    }

    /// Force dry-run reporting regardless of configuration.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = self.dry_run || dry_run;
        self
    }

    /// Whether the update should be refused.
    pub fn rejects(&self) -> bool {
        self.batch.has_reportables() && !self.dry_run
    }

    /// The accept or reject headline, if any.
    pub fn headline(&self, renderer: &Renderer) -> Result<Option<String>> {
        let ref_id = self.batch.results().first().map(|r| r.ref_id.as_str()).unwrap_or("");
        let ctx = RenderContext::for_ref(self.pusher, ref_id);

        if self.batch.is_empty() {
            return self
                .config
                .accept_message
                .as_deref()
                .map(|t| renderer.render(t, &ctx))
                .transpose();
        }

        let mut headline = renderer.render(&self.config.reject_message, &ctx)?;
        if self.dry_run {
            headline.push_str(" (dry run, not enforced)");
        }
        Ok(Some(headline))
    }

    /// Render in the requested format.
    pub fn render(&self, renderer: &Renderer, format: Option<OutputFormat>) -> Result<String> {
        match format {
            Some(OutputFormat::Json) => self.render_json(renderer),
            _ => self.render_text(renderer),
        }
    }

    /// Render as text.
    pub fn render_text(&self, renderer: &Renderer) -> Result<String> {
        let mut lines = Vec::new();

        if let Some(headline) = self.headline(renderer)? {
            let prefix = if self.batch.is_empty() {
                style("✓").green().bold()
            } else {
                style("✗").red().bold()
            };
            lines.push(format!("{} {}", prefix, headline));
        }

        for result in self.batch.iter() {
            lines.extend(format_result(result));
        }

        Ok(lines.join("\n"))
    }

    /// Render as pretty-printed JSON.
    pub fn render_json(&self, renderer: &Renderer) -> Result<String> {
        let report = JsonReport {
            accepted: !self.rejects(),
            dry_run: self.dry_run,
            message: self.headline(renderer)?,
            results: self.batch.results(),
        };

        serde_json::to_string_pretty(&report).map_err(json_failed)
    }
}

fn json_failed(e: serde_json::Error) -> RefCheckError {
    RefCheckError::Render(RenderError::Failed {
        template: "json report".to_string(),
        message: e.to_string(),
    })
}

fn format_result(result: &RefUpdateVerificationResult) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}..{}",
        style(&result.ref_id).cyan().bold(),
        short(&result.from_hash),
        short(&result.to_hash)
    )];

    if !result.branch_name_accepted {
        lines.push(format!(
            "  {} branch name '{}' is rejected",
            style("✗").red().bold(),
            result.ref_id
        ));
    }

    for commit in result.commits.iter().filter(|c| c.has_failures()) {
        lines.push(format!(
            "  {} {} {}",
            style("✗").red().bold(),
            style(commit.short_id()).cyan(),
            commit.subject
        ));
        for failure in commit.failures() {
            let detail = failure.outcome.detail.as_deref().unwrap_or("");
            let mut detail_lines = detail.lines();
            lines.push(format!(
                "    {} {}",
                style(failure.category.code()).red(),
                detail_lines.next().unwrap_or("")
            ));
            for more in detail_lines {
                lines.push(format!("      {}", more));
            }
        }
    }

    lines
}

fn short(hash: &str) -> &str {
    &hash[..7.min(hash.len())]
}
