// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn one_active_iteration_per_space() {
    let temp = init_temp();
    let i1 = create(&temp, &["iteration", "new", "I1"]);
    let i2 = create(&temp, &["iteration", "new", "I2"]);

    wit()
        .args(["iteration", "start", &i1])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("new -> start"));

    wit()
        .args(["iteration", "start", &i2])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already active"));

    wit()
        .args(["iteration", "close", &i1])
        .current_dir(temp.path())
        .assert()
        .success();

    wit()
        .args(["iteration", "start", &i2])
        .current_dir(temp.path())
        .assert()
        .success();
}

#[test]
fn root_iteration_cannot_start() {
    let temp = init_temp();
    let root = ids(&temp, &["iteration", "list"]).remove(0);

    wit()
        .args(["iteration", "start", &root])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be started"));
}

#[test]
fn nested_iterations_resolve_names() {
    let temp = init_temp();
    let release = create(&temp, &["iteration", "new", "Release 1"]);
    let sprint = create(
        &temp,
        &[
            "iteration",
            "new",
            "Sprint 1",
            "--parent",
            &release,
            "--start",
            "2026-01-05",
            "--end",
            "2026-01-19",
        ],
    );

    wit()
        .args(["iteration", "show", &sprint])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Path: /Project/Release 1"))
        .stdout(predicate::str::contains("Dates: 2026-01-05 - 2026-01-19"));
}

#[test]
fn counts_follow_item_state() {
    let temp = init_temp();
    let sprint = create(&temp, &["iteration", "new", "Sprint"]);
    let done = create(&temp, &["item", "new", "Done", "--iteration", &sprint]);
    create(&temp, &["item", "new", "Open", "--iteration", &sprint]);

    wit()
        .args(["item", "edit", &done, "--state", "closed"])
        .current_dir(temp.path())
        .assert()
        .success();

    wit()
        .args(["iteration", "show", &sprint])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Work items: 2 total, 1 closed, 1 open",
        ));
}

#[test]
fn only_owner_creates_iterations() {
    let temp = init_temp();

    wit()
        .env("WIT_ACTOR", "mallory")
        .args(["iteration", "new", "Sneaky"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("only the space owner"));

    // State changes are not restricted
    let sprint = create(&temp, &["iteration", "new", "Sprint"]);
    wit()
        .env("WIT_ACTOR", "mallory")
        .args(["iteration", "start", &sprint])
        .current_dir(temp.path())
        .assert()
        .success();
}

#[test]
fn invalid_dates_are_rejected() {
    let temp = init_temp();

    wit()
        .args([
            "iteration",
            "new",
            "Backwards",
            "--start",
            "2026-02-01",
            "--end",
            "2026-01-01",
        ])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("start date is after"));

    wit()
        .args([
            "iteration",
            "new",
            "Vague",
            "--start",
            "soon",
            "--end",
            "2026-01-01",
        ])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}
