// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Issue tracker backed by an external command.

use crate::config::IssueTrackerConfig;
use crate::error::{RefCheckError, Result, ServiceError};
use std::process::Command;

use super::IssueTracker;

/// Exit code a tracker command uses to report missing credentials.
pub const AUTH_REQUIRED_EXIT_CODE: i32 = 77;

const SERVICE: &str = "issue tracker";

/// Runs `command [args..] <query>` and counts the non-empty lines it prints.
#[derive(Debug, Clone)]
pub struct CommandIssueTracker {
    command: Option<String>,
    args: Vec<String>,
}

impl CommandIssueTracker {
    /// Create a tracker from configuration.
    pub fn from_config(config: &IssueTrackerConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }
}

impl IssueTracker for CommandIssueTracker {
    fn search(&self, query: &str) -> Result<usize> {
        let Some(command) = &self.command else {
            return Err(RefCheckError::Service(ServiceError::Unavailable {
                service: SERVICE.to_string(),
            }));
        };

        tracing::debug!("Running issue query '{}' with {}", query, command);

        let output = Command::new(command)
            .args(&self.args)
            .arg(query)
            .output()
            .map_err(|e| {
                RefCheckError::Service(ServiceError::Failed {
                    service: SERVICE.to_string(),
                    message: format!("Failed to run {}: {}", command, e),
                })
            })?;

        match output.status.code() {
            Some(0) => {}
            Some(AUTH_REQUIRED_EXIT_CODE) => {
                return Err(RefCheckError::Service(ServiceError::AuthenticationRequired {
                    service: SERVICE.to_string(),
                }))
            }
            _ => {
                return Err(RefCheckError::Service(ServiceError::Failed {
                    service: SERVICE.to_string(),
                    message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                }))
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().filter(|l| !l.trim().is_empty()).count())
    }
}
