// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn creates_work_dir() {
    let temp = TempDir::new().unwrap();

    wit()
        .args(["init", "--space", "Project"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized wit"))
        .stdout(predicate::str::contains("Space: Project"))
        .stdout(predicate::str::contains("Owner: alice"));

    assert!(temp.path().join(".wit").exists());
    assert!(temp.path().join(".wit/config.toml").exists());
    assert!(temp.path().join(".wit/wit.db").exists());
    assert!(temp.path().join(".wit/.gitignore").exists());
}

#[test]
fn fails_if_already_initialized() {
    let temp = init_temp();

    wit()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn commands_need_init() {
    let temp = TempDir::new().unwrap();

    wit()
        .args(["item", "list"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn default_space_has_root_iteration() {
    let temp = init_temp();

    wit()
        .args(["iteration", "list"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(new)"))
        .stdout(predicate::str::contains("Project"))
        .stdout(predicate::str::contains("0/0 closed"));
}

#[test]
fn space_use_switches_default() {
    let temp = init_temp();
    create(&temp, &["space", "new", "Other"]);

    wit()
        .args(["space", "use", "Other"])
        .current_dir(temp.path())
        .assert()
        .success();
    create_item(&temp, "Elsewhere");

    assert_eq!(ids(&temp, &["item", "list"]).len(), 1);
    assert!(ids(&temp, &["item", "list", "--space", "Project"]).is_empty());
}
