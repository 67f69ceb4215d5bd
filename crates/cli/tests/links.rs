// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn tree_allows_many_children_one_parent() {
    let temp = init_temp();
    let bug1 = create_item(&temp, "bug1");
    let bug2 = create_item(&temp, "bug2");
    let bug3 = create_item(&temp, "bug3");
    let bug4 = create_item(&temp, "bug4");
    create_link_type(&temp, "parenting", "tree");

    create_link(&temp, &bug1, "parenting", &bug2);
    create_link(&temp, &bug1, "parenting", &bug3);

    wit()
        .args(["link", "new", &bug4, "parenting", &bug2])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already has a parent"));

    assert_eq!(ids(&temp, &["children", &bug1]), [bug2.clone(), bug3]);
    assert!(ids(&temp, &["children", &bug4]).is_empty());
}

#[test]
fn deleting_link_hides_child() {
    let temp = init_temp();
    let bug1 = create_item(&temp, "bug1");
    let bug2 = create_item(&temp, "bug2");
    create_link_type(&temp, "parenting", "tree");
    let link = create_link(&temp, &bug1, "parenting", &bug2);

    wit()
        .args(["item", "show", &bug1])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Children: see 'wit children"));

    wit()
        .args(["link", "delete", &link])
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(ids(&temp, &["children", &bug1]).is_empty());
    wit()
        .args(["item", "show", &bug1])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Children:").not());

    // History survives the delete
    wit()
        .args(["log", &link])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("unlinked"))
        .stdout(predicate::str::contains("linked"))
        .stdout(predicate::str::contains("by alice"));
}

#[test]
fn tree_rejects_cycles_and_self_links() {
    let temp = init_temp();
    let a = create_item(&temp, "A");
    let b = create_item(&temp, "B");
    create_link_type(&temp, "parenting", "tree");
    create_link(&temp, &a, "parenting", &b);

    wit()
        .args(["link", "new", &b, "parenting", &a])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));

    wit()
        .args(["link", "new", &a, "parenting", &a])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("itself"));
}

#[parameterized(
    network = { "network" },
    dependency = { "dependency" },
)]
fn non_tree_types_reject_duplicates(topology: &str) {
    let temp = init_temp();
    let a = create_item(&temp, "A");
    let b = create_item(&temp, "B");
    create_link_type(&temp, "related", topology);
    create_link(&temp, &a, "related", &b);

    wit()
        .args(["link", "new", &a, "related", &b])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("link already exists"));

    // Non-tree links never make children
    assert!(ids(&temp, &["children", &a]).is_empty());
}

#[test]
fn link_list_reads_from_either_end() {
    let temp = init_temp();
    let epic = create_item(&temp, "Epic");
    let story = create_item(&temp, "Story");
    create_link_type(&temp, "parenting", "tree");
    create_link(&temp, &epic, "parenting", &story);

    wit()
        .args(["link", "list", &epic])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("parenting of"))
        .stdout(predicate::str::contains("(Story)"));

    wit()
        .args(["link", "list", &story])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("parenting by"))
        .stdout(predicate::str::contains("(Epic)"));
}

#[test]
fn link_type_in_use_cannot_be_deleted() {
    let temp = init_temp();
    let a = create_item(&temp, "A");
    let b = create_item(&temp, "B");
    create_link_type(&temp, "related", "network");
    let link = create_link(&temp, &a, "related", &b);

    wit()
        .args(["link-type", "delete", "related"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("still in use"));

    wit()
        .args(["link", "delete", &link])
        .current_dir(temp.path())
        .assert()
        .success();
    wit()
        .args(["link-type", "delete", "related"])
        .current_dir(temp.path())
        .assert()
        .success();
}

#[test]
fn stale_link_version_conflicts() {
    let temp = init_temp();
    let a = create_item(&temp, "A");
    let b = create_item(&temp, "B");
    let c = create_item(&temp, "C");
    create_link_type(&temp, "related", "network");
    let link = create_link(&temp, &a, "related", &b);

    wit()
        .args(["link", "edit", &link, "--target", &c, "--expect-version", "5"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("version conflict"));

    wit()
        .args(["link", "edit", &link, "--target", &c, "--expect-version", "0"])
        .current_dir(temp.path())
        .assert()
        .success();
}
