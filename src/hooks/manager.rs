// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Hook manager for installing the server-side hooks.

use crate::error::{HookError, RefCheckError, Result};
use crate::git::Repository;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use super::templates::{HookTemplate, HOOK_MARKER};

/// Manager for the hooks of one repository.
pub struct HookManager {
    hooks_dir: PathBuf,
}

impl HookManager {
    /// Create a hook manager for `repo`.
    pub fn new(repo: &Repository) -> Result<Self> {
        Self::with_hooks_dir(repo.git_dir().join("hooks"))
    }

    /// Create a hook manager writing to `hooks_dir`, creating it if needed.
    pub fn with_hooks_dir(hooks_dir: PathBuf) -> Result<Self> {
        if !hooks_dir.exists() {
            fs::create_dir_all(&hooks_dir).map_err(|e| {
                RefCheckError::Hook(HookError::InstallFailed {
                    hook: "all".to_string(),
                    message: format!("Failed to create hooks directory: {}", e),
                })
            })?;
        }

        Ok(Self { hooks_dir })
    }

    /// The directory hooks are installed into.
    pub fn hooks_dir(&self) -> &Path {
        &self.hooks_dir
    }

    /// Install a specific hook.
    pub fn install_hook(&self, hook_name: &str, force: bool) -> Result<()> {
        let template = parse_hook(hook_name)?;
        self.install_template(&template, force)
    }

    /// Install all hooks.
    pub fn install_all(&self, force: bool) -> Result<()> {
        for template in HookTemplate::all() {
            self.install_template(template, force)?;
        }
        Ok(())
    }

    fn install_template(&self, template: &HookTemplate, force: bool) -> Result<()> {
        let hook_path = self.hooks_dir.join(template.filename());
        let backup_path = self
            .hooks_dir
            .join(format!("{}.backup", template.filename()));

        let foreign = hook_path.exists() && !self.is_refcheck_hook(&hook_path)?;
        if foreign && !force {
            return Err(RefCheckError::Hook(HookError::AlreadyExists {
                hook: template.filename().to_string(),
            }));
        }

        // Keep a foreign hook so uninstall can restore it.
        if foreign {
            fs::rename(&hook_path, &backup_path).map_err(|e| {
                RefCheckError::Hook(HookError::InstallFailed {
                    hook: template.filename().to_string(),
                    message: format!("Failed to backup existing hook: {}", e),
                })
            })?;
        }

        fs::write(&hook_path, template.generate()).map_err(|e| {
            RefCheckError::Hook(HookError::InstallFailed {
                hook: template.filename().to_string(),
                message: format!("Failed to write hook: {}", e),
            })
        })?;

        let mut perms = fs::metadata(&hook_path)
            .map_err(|e| {
                RefCheckError::Hook(HookError::InstallFailed {
                    hook: template.filename().to_string(),
                    message: format!("Failed to get permissions: {}", e),
                })
            })?
            .permissions();

        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms).map_err(|e| {
            RefCheckError::Hook(HookError::InstallFailed {
                hook: template.filename().to_string(),
                message: format!("Failed to set permissions: {}", e),
            })
        })?;

        tracing::debug!("Installed {}", hook_path.display());
        Ok(())
    }

    /// Uninstall a specific hook, restoring any hook it replaced.
    pub fn uninstall_hook(&self, hook_name: &str) -> Result<()> {
        let template = parse_hook(hook_name)?;

        let hook_path = self.hooks_dir.join(template.filename());
        let backup_path = self
            .hooks_dir
            .join(format!("{}.backup", template.filename()));

        if !hook_path.exists() {
            return Ok(());
        }

        if !self.is_refcheck_hook(&hook_path)? {
            return Err(RefCheckError::Hook(HookError::RemoveFailed {
                hook: hook_name.to_string(),
                message: "Hook was not installed by refcheck".to_string(),
            }));
        }

        fs::remove_file(&hook_path).map_err(|e| {
            RefCheckError::Hook(HookError::RemoveFailed {
                hook: hook_name.to_string(),
                message: format!("Failed to remove hook: {}", e),
            })
        })?;

        if backup_path.exists() {
            fs::rename(&backup_path, &hook_path).map_err(|e| {
                RefCheckError::Hook(HookError::RemoveFailed {
                    hook: hook_name.to_string(),
                    message: format!("Failed to restore backup: {}", e),
                })
            })?;
        }

        Ok(())
    }

    /// Uninstall all hooks.
    pub fn uninstall_all(&self) -> Result<()> {
        for template in HookTemplate::all() {
            self.uninstall_hook(template.filename())?;
        }
        Ok(())
    }

    /// Whether each hook is installed.
    pub fn status(&self) -> Vec<(String, bool)> {
        HookTemplate::all()
            .iter()
            .map(|template| {
                let hook_path = self.hooks_dir.join(template.filename());
                let installed =
                    hook_path.exists() && self.is_refcheck_hook(&hook_path).unwrap_or(false);
                (template.filename().to_string(), installed)
            })
            .collect()
    }

    fn is_refcheck_hook(&self, path: &Path) -> Result<bool> {
        let content = fs::read_to_string(path).map_err(|e| {
            RefCheckError::Hook(HookError::InstallFailed {
                hook: path.display().to_string(),
                message: format!("Failed to read hook: {}", e),
            })
        })?;

        Ok(content.contains(HOOK_MARKER))
    }
}

fn parse_hook(hook_name: &str) -> Result<HookTemplate> {
    hook_name.parse::<HookTemplate>().map_err(|_| {
        RefCheckError::Hook(HookError::NotFound {
            hook: hook_name.to_string(),
        })
    })
}
