// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Template rendering for rule messages, identity patterns and issue
//! queries.
//!
//! Templates are Handlebars strings rendered without HTML escaping. The
//! data available to a template is:
//!
//! - `pusher.name`, `pusher.email`, and `pusher.name_regex`,
//!   `pusher.email_regex` with regex metacharacters escaped
//! - `ref_id`
//! - `commit.id`, `commit.short_id`, `commit.message`, `commit.subject`,
//!   `commit.author.{name,email}`, `commit.committer.{name,email}`
//! - `issue_keys` (comma separated) and `issue_key_list`

use crate::commit::{Commit, Identity};
use crate::error::{RefCheckError, RenderError, Result};
use handlebars::{Handlebars, Template};
use serde_json::{json, Value};

/// Data a template is rendered against.
///
/// The current commit is passed explicitly with every evaluation instead
/// of being bound on the renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub pusher: Option<&'a Identity>,
    pub ref_id: &'a str,
    pub commit: Option<&'a Commit>,
    pub issue_keys: &'a [String],
}

impl<'a> RenderContext<'a> {
    /// Context for a ref update, before any commit is known.
    pub fn for_ref(pusher: Option<&'a Identity>, ref_id: &'a str) -> Self {
        Self {
            pusher,
            ref_id,
            commit: None,
            issue_keys: &[],
        }
    }

    /// The same context bound to `commit`.
    pub fn with_commit(self, commit: &'a Commit) -> Self {
        Self {
            commit: Some(commit),
            ..self
        }
    }

    /// The same context with the issue keys found in the commit.
    pub fn with_issue_keys(self, issue_keys: &'a [String]) -> Self {
        Self { issue_keys, ..self }
    }

    fn data(&self) -> Value {
        let pusher = self.pusher.cloned().unwrap_or_default();
        let pusher = json!({
            "name": pusher.name,
            "email": pusher.email,
            "name_regex": regex::escape(&pusher.name),
            "email_regex": regex::escape(&pusher.email),
        });
        let commit = self.commit.map(|c| {
            json!({
                "id": c.id,
                "short_id": c.short_id(),
                "message": c.message,
                "subject": c.subject(),
                "author": c.author,
                "committer": c.committer,
                "parent_count": c.parent_count,
            })
        });

        json!({
            "pusher": pusher,
            "ref_id": self.ref_id,
            "commit": commit,
            "issue_keys": self.issue_keys.join(","),
            "issue_key_list": self.issue_keys,
        })
    }
}

/// Renders templates against a [`RenderContext`].
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer that does not escape output.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Render `template` against `context`.
    pub fn render(&self, template: &str, context: &RenderContext<'_>) -> Result<String> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }

        Template::compile(template).map_err(|e| {
            RefCheckError::Render(RenderError::InvalidTemplate {
                template: template.to_string(),
                message: e.to_string(),
            })
        })?;

        self.registry
            .render_template(template, &context.data())
            .map_err(|e| {
                RefCheckError::Render(RenderError::Failed {
                    template: template.to_string(),
                    message: e.to_string(),
                })
            })
    }
}
