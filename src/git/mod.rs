// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! Resolves the commits introduced by ref updates and merge proposals
//! from the repository a hook runs in.

mod diff;
mod repo;
mod resolver;

pub use diff::commit_content;
pub use repo::Repository;
pub use resolver::GitResolver;
