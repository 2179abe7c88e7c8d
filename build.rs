// Author: Eshan Roy
// SPDX-License-Identifier: MIT

use std::path::Path;
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    // Source tarballs have no history; `cg version` then prints the bare version.
    if !Path::new(".git").exists() {
        return Ok(());
    }

    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .emit()?;
    Ok(())
}
