// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for refcheck.
//!
//! This module handles loading and parsing configuration from
//! refcheck.toml, falling back to defaults.

pub mod default;
mod loader;
mod schema;

pub use loader::{find_config_file_from, load_config_from, parse_config};
pub use schema::*;
