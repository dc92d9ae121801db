// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration loading.

use crate::error::{ConfigError, RefCheckError, Result};
use std::path::{Path, PathBuf};

use super::schema::RefCheckConfig;

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &["refcheck.toml", ".refcheck.toml", ".config/refcheck.toml"];

/// Find the configuration file for the repository at `start_dir`.
///
/// Searches the repository directory and its parents, then the user
/// configuration directory. Hooks run with a relative `GIT_DIR`, so the
/// start directory is made absolute first.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir
        .canonicalize()
        .unwrap_or_else(|_| start_dir.to_path_buf());

    loop {
        for config_name in CONFIG_FILES {
            let config_path = current.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    // XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("refcheck").join("config.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    None
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<RefCheckConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(RefCheckError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        RefCheckError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<RefCheckConfig> {
    toml::from_str(content).map_err(|e| {
        RefCheckError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })
}
