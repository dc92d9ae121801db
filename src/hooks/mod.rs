// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Server-side hook management.

mod manager;
mod templates;

pub use manager::HookManager;
pub use templates::HookTemplate;
