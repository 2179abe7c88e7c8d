// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for cg.
//!
//! This module holds the built-in rule table, its schema, and the loader
//! that merges optional override files on top of it.

pub mod default;
mod loader;
mod schema;

pub use default::{default_config, example_config};
pub use loader::{
    find_config_file, find_config_file_from, load_config, load_config_from, merge_configs,
    parse_config, parse_overlay, ConfigFormat, ConfigOverlay, CustomRulesOverlay,
};
pub use schema::*;
