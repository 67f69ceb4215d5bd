// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::{TestContext, ACTOR};
use wit_core::{Action, ErrorKind, Topology};

#[test]
fn new_link_by_type_name() {
    let mut ctx = TestContext::new();
    let epic = ctx.item("Epic");
    let story = ctx.item("Story");
    ctx.link_type("parenting", Topology::Tree);

    let view = new_impl(
        &mut ctx.db,
        &epic.id,
        "parenting",
        &story.id,
        ACTOR,
        OutputFormat::Text,
    )
    .unwrap();
    assert_eq!(view.link.source_id, epic.id);
    assert_eq!(view.link.target_id, story.id);
    assert_eq!(view.link.version, 0);
    assert_eq!(view.forward_label(), "parenting of");

    let events = ctx.db.get_events(&view.link.id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, Action::Linked);
    assert_eq!(events[0].actor, ACTOR);
}

#[test]
fn tree_rules_are_enforced() {
    let mut ctx = TestContext::new();
    let bug1 = ctx.item("bug1");
    let bug2 = ctx.item("bug2");
    let bug3 = ctx.item("bug3");
    let tree = ctx.link_type("parenting", Topology::Tree);
    ctx.link(&bug1, &bug2, &tree);
    ctx.link(&bug2, &bug3, &tree);

    let second_parent = new_impl(
        &mut ctx.db,
        &bug1.id,
        &tree.id,
        &bug3.id,
        ACTOR,
        OutputFormat::Id,
    )
    .unwrap_err();
    assert_eq!(second_parent.kind(), ErrorKind::Conflict);

    let cycle = new_impl(
        &mut ctx.db,
        &bug3.id,
        &tree.id,
        &bug1.id,
        ACTOR,
        OutputFormat::Id,
    )
    .unwrap_err();
    assert_eq!(cycle.kind(), ErrorKind::BadParameter);

    let itself = new_impl(
        &mut ctx.db,
        &bug1.id,
        &tree.id,
        &bug1.id,
        ACTOR,
        OutputFormat::Id,
    )
    .unwrap_err();
    assert!(matches!(
        itself,
        Error::Engine(wit_core::Error::SelfLink(_))
    ));
}

#[test]
fn network_rejects_duplicates_only() {
    let mut ctx = TestContext::new();
    let a = ctx.item("A");
    let b = ctx.item("B");
    let related = ctx.link_type("related", Topology::Network);
    ctx.link(&a, &b, &related);

    new_impl(&mut ctx.db, &b.id, "related", &a.id, ACTOR, OutputFormat::Id).unwrap();
    let err = new_impl(&mut ctx.db, &a.id, "related", &b.id, ACTOR, OutputFormat::Id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn unknown_link_type_is_not_found() {
    let mut ctx = TestContext::new();
    let a = ctx.item("A");
    let b = ctx.item("B");
    let err = new_impl(&mut ctx.db, &a.id, "blocks", &b.id, ACTOR, OutputFormat::Id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn list_shows_both_directions() {
    let mut ctx = TestContext::new();
    let epic = ctx.item("Epic");
    let story = ctx.item("Story");
    let task = ctx.item("Task");
    let tree = ctx.link_type("parenting", Topology::Tree);
    ctx.link(&epic, &story, &tree);
    ctx.link(&story, &task, &tree);

    let views = list_impl(&ctx.db, &story.id, OutputFormat::Text).unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(
        crate::display::format_link_from(&views[0], &story.id),
        format!("parenting by {} (Epic) [{}]", epic.id, views[0].link.id)
    );
    assert_eq!(
        crate::display::format_link_from(&views[1], &story.id),
        format!("parenting of {} (Task) [{}]", task.id, views[1].link.id)
    );
}

#[test]
fn show_loads_category() {
    let mut ctx = TestContext::new();
    let a = ctx.item("A");
    let b = ctx.item("B");
    let related = ctx.link_type("related", Topology::Network);
    let link = ctx.link(&a, &b, &related);

    let view = show_impl(&ctx.db, &link.id, OutputFormat::Json).unwrap();
    assert_eq!(view.category.map(|c| c.name), Some("system".to_string()));
}

#[test]
fn edit_retargets_and_records_event() {
    let mut ctx = TestContext::new();
    let epic = ctx.item("Epic");
    let story = ctx.item("Story");
    let task = ctx.item("Task");
    let tree = ctx.link_type("parenting", Topology::Tree);
    let link = ctx.link(&epic, &story, &tree);

    let edit = LinkEdit {
        target: Some(task.id.clone()),
        ..LinkEdit::default()
    };
    let view = edit_impl(&mut ctx.db, &link.id, edit, ACTOR, VersionArgs::default()).unwrap();
    assert_eq!(view.link.target_id, task.id);
    assert_eq!(view.link.version, 1);
    assert!(ctx.db.parent_of(&story.id).unwrap().is_none());

    let actions: Vec<_> = ctx
        .db
        .get_events(&link.id)
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(actions, [Action::Linked, Action::Relinked]);
}

#[test]
fn edit_with_stale_version_conflicts() {
    let mut ctx = TestContext::new();
    let a = ctx.item("A");
    let b = ctx.item("B");
    let c = ctx.item("C");
    let related = ctx.link_type("related", Topology::Network);
    let link = ctx.link(&a, &b, &related);

    let edit = LinkEdit {
        target: Some(c.id.clone()),
        ..LinkEdit::default()
    };
    let err = edit_impl(
        &mut ctx.db,
        &link.id,
        edit,
        ACTOR,
        VersionArgs { expected: Some(4) },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(
        edit_impl(
            &mut ctx.db,
            &link.id,
            LinkEdit::default(),
            ACTOR,
            VersionArgs::default()
        ),
        Err(Error::NothingToUpdate)
    ));
}

#[test]
fn delete_hides_link_and_frees_child() {
    let mut ctx = TestContext::new();
    let epic = ctx.item("Epic");
    let story = ctx.item("Story");
    let tree = ctx.link_type("parenting", Topology::Tree);
    let link = ctx.link(&epic, &story, &tree);

    delete_impl(&mut ctx.db, &link.id, ACTOR).unwrap();
    assert_eq!(
        show_impl(&ctx.db, &link.id, OutputFormat::Text)
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
    assert!(!ctx.db.has_children(&epic.id).unwrap());
    assert!(list_impl(&ctx.db, &story.id, OutputFormat::Id)
        .unwrap()
        .is_empty());

    let err = delete_impl(&mut ctx.db, &link.id, ACTOR).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
