// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! Reads the messages of existing commits so they can be linted.

mod repo;

pub use repo::{get_commit, get_commit_range, Repository};
