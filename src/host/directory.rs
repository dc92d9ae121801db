// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! User directories backed by a file or an in-memory list.

use crate::error::{ConfigError, RefCheckError, Result, ServiceError};
use serde::Deserialize;
use std::path::Path;

use super::{HostUser, UserDirectory};

#[derive(Debug, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<HostUser>,
}

/// A fixed list of users.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: Vec<HostUser>,
}

impl StaticUserDirectory {
    /// Create a directory from a list of users.
    pub fn new(users: Vec<HostUser>) -> Self {
        Self { users }
    }
}

impl UserDirectory for StaticUserDirectory {
    fn find_by_email(&self, email: &str) -> Result<Option<HostUser>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<HostUser>> {
        Ok(self
            .users
            .iter()
            .find(|u| {
                u.name.eq_ignore_ascii_case(name)
                    || u
                        .display_name
                        .as_deref()
                        .is_some_and(|d| d.eq_ignore_ascii_case(name))
            })
            .cloned())
    }
}

/// Stands in when no users file is configured. Every lookup fails with
/// [`ServiceError::Unavailable`], so directory rules cannot pass silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredUserDirectory;

impl UnconfiguredUserDirectory {
    fn unavailable() -> RefCheckError {
        RefCheckError::Service(ServiceError::Unavailable {
            service: "user directory".to_string(),
        })
    }
}

impl UserDirectory for UnconfiguredUserDirectory {
    fn find_by_email(&self, _email: &str) -> Result<Option<HostUser>> {
        Err(Self::unavailable())
    }

    fn find_by_name(&self, _name: &str) -> Result<Option<HostUser>> {
        Err(Self::unavailable())
    }
}

/// Users listed in a TOML file of `[[users]]` tables.
///
/// ```toml
/// [[users]]
/// name = "ann"
/// email = "ann@example.com"
/// display_name = "Ann Example"
/// ```
#[derive(Debug, Clone)]
pub struct FileUserDirectory {
    inner: StaticUserDirectory,
}

impl FileUserDirectory {
    /// Load the users file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading users from: {:?}", path);

        if !path.exists() {
            return Err(RefCheckError::Config(ConfigError::NotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path)?;
        let file: UsersFile = toml::from_str(&content).map_err(|e| {
            RefCheckError::Config(ConfigError::ParseError {
                message: format!("Failed to parse users file: {}", e),
            })
        })?;

        Ok(Self {
            inner: StaticUserDirectory::new(file.users),
        })
    }
}

impl UserDirectory for FileUserDirectory {
    fn find_by_email(&self, email: &str) -> Result<Option<HostUser>> {
        self.inner.find_by_email(email)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<HostUser>> {
        self.inner.find_by_name(name)
    }
}
