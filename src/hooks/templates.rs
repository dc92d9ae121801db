// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Server-side hook scripts.

use crate::version::VERSION;
use std::str::FromStr;

/// Marker line identifying scripts written by refcheck.
pub(super) const HOOK_MARKER: &str = "# refcheck hook";

/// A server-side hook refcheck can install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookTemplate {
    /// Validates every ref update of a push at once.
    PreReceive,
    /// Validates one ref update at a time.
    Update,
}

impl HookTemplate {
    /// Every installable hook.
    pub fn all() -> &'static [HookTemplate] {
        &[HookTemplate::PreReceive, HookTemplate::Update]
    }

    /// File name inside the hooks directory.
    pub fn filename(&self) -> &'static str {
        match self {
            HookTemplate::PreReceive => "pre-receive",
            HookTemplate::Update => "update",
        }
    }

    /// The hook script.
    pub fn generate(&self) -> String {
        let invocation = match self {
            HookTemplate::PreReceive => "exec refcheck pre-receive",
            HookTemplate::Update => "exec refcheck update \"$1\" \"$2\" \"$3\"",
        };

        format!(
            "#!/bin/sh\n{}\n# Generated by refcheck v{}\n\n{}\n",
            HOOK_MARKER, VERSION, invocation
        )
    }
}

impl FromStr for HookTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-receive" => Ok(HookTemplate::PreReceive),
            "update" => Ok(HookTemplate::Update),
            _ => Err(format!("Unknown hook: {}", s)),
        }
    }
}
