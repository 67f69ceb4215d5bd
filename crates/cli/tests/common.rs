// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub const ACTOR: &str = "alice";

/// A `wit` command running as [`ACTOR`].
pub fn wit() -> Command {
    let mut cmd = cargo_bin_cmd!("wit");
    cmd.env("WIT_ACTOR", ACTOR).env_remove("WIT_LOG");
    cmd
}

/// Helper to create an initialized temp directory with a space named "Project"
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    wit()
        .args(["init", "--space", "Project", "--actor", ACTOR])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Runs `wit` with `args` plus `-o id` and returns the printed ID.
pub fn create(temp: &TempDir, args: &[&str]) -> String {
    let output = wit()
        .args(args)
        .args(["-o", "id"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "wit {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to create a work item and return its ID
pub fn create_item(temp: &TempDir, title: &str) -> String {
    create(temp, &["item", "new", title])
}

/// Helper to create a link type in the default space and return its ID
pub fn create_link_type(temp: &TempDir, name: &str, topology: &str) -> String {
    let category = "system";
    let exists = wit()
        .args(["category", "list", "-o", "id"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    if String::from_utf8_lossy(&exists.stdout).trim().is_empty() {
        create(temp, &["category", "new", category]);
    }
    create(
        temp,
        &[
            "link-type",
            "new",
            name,
            "-c",
            category,
            "-t",
            topology,
            "--forward",
            &format!("{} of", name),
            "--reverse",
            &format!("{} by", name),
        ],
    )
}

/// Helper to link two work items and return the link ID
pub fn create_link(temp: &TempDir, source: &str, link_type: &str, target: &str) -> String {
    create(temp, &["link", "new", source, link_type, target])
}

/// IDs printed by `wit <args> -o id`, one per line.
pub fn ids(temp: &TempDir, args: &[&str]) -> Vec<String> {
    let output = wit()
        .args(args)
        .args(["-o", "id"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}
