// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::db::testing::{TestContext, OWNER};
use crate::error::ErrorKind;
use crate::work_item::Page;
use yare::parameterized;

fn ids(items: &[&WorkItem]) -> Vec<VersionedId> {
    items.iter().map(|item| item.versioned_id()).collect()
}

/// Creates items titled after `titles` and returns them in creation order.
fn seed(ctx: &mut TestContext, titles: &[&str]) -> Vec<WorkItem> {
    titles.iter().map(|title| ctx.item(title)).collect()
}

#[test]
fn block_moves_above_reference() {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["X", "Y", "A", "B"]);
    let (x, a, b) = (&items[0], &items[2], &items[3]);

    let moved = ctx
        .db
        .reorder_work_items(&ids(&[a, b]), &Placement::Above(x.id.clone()))
        .unwrap();

    assert_eq!(ctx.titles(), ["A", "B", "X", "Y"]);
    assert_eq!(moved.len(), 2);
    assert_eq!(moved[0].id, a.id);
    assert_eq!(moved[0].version, a.version + 1);
    assert_eq!(moved[1].version, b.version + 1);
    assert_eq!(ctx.db.get_work_item(&x.id).unwrap().version, x.version);
}

#[parameterized(
    above_middle = { &[0], true, 2, &["B", "A", "C", "D", "E"] },
    above_first = { &[4], true, 0, &["E", "A", "B", "C", "D"] },
    below_first = { &[3, 4], false, 0, &["A", "D", "E", "B", "C"] },
    below_last = { &[0], false, 4, &["B", "C", "D", "E", "A"] },
)]
fn relative_placements(movers: &[usize], above: bool, anchor: usize, expected: &[&str]) {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["A", "B", "C", "D", "E"]);
    let movers: Vec<&WorkItem> = movers.iter().map(|&i| &items[i]).collect();
    let reference = items[anchor].id.clone();
    let placement = if above {
        Placement::Above(reference)
    } else {
        Placement::Below(reference)
    };

    ctx.db.reorder_work_items(&ids(&movers), &placement).unwrap();
    assert_eq!(ctx.titles(), expected);
}

#[test]
fn top_and_bottom() {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["A", "B", "C", "D"]);

    ctx.db
        .reorder_work_items(&ids(&[&items[2], &items[3]]), &Placement::Top)
        .unwrap();
    assert_eq!(ctx.titles(), ["C", "D", "A", "B"]);

    let a = ctx.db.get_work_item(&items[0].id).unwrap();
    ctx.db
        .reorder_work_items(&ids(&[&a]), &Placement::Bottom)
        .unwrap();
    assert_eq!(ctx.titles(), ["C", "D", "B", "A"]);
}

#[test]
fn block_keeps_caller_order() {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["A", "B", "C"]);

    ctx.db
        .reorder_work_items(&ids(&[&items[2], &items[0]]), &Placement::Bottom)
        .unwrap();
    assert_eq!(ctx.titles(), ["B", "C", "A"]);
}

#[test]
fn moving_whole_list_to_top() {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["A", "B", "C"]);

    ctx.db
        .reorder_work_items(&ids(&[&items[2], &items[1], &items[0]]), &Placement::Top)
        .unwrap();
    assert_eq!(ctx.titles(), ["C", "B", "A"]);
}

#[test]
fn repeated_moves_into_a_shrinking_gap() {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["A", "B", "C"]);
    let below_a = Placement::Below(items[0].id.clone());

    // Alternate B and C directly below A so each move halves the gap.
    for round in 0..30 {
        let id = if round % 2 == 0 { &items[2].id } else { &items[1].id };
        let mover = ctx.db.get_work_item(id).unwrap();
        ctx.db
            .reorder_work_items(&[mover.versioned_id()], &below_a)
            .unwrap();
    }

    assert_eq!(ctx.titles(), ["A", "B", "C"]);
    let (all, _) = ctx.db.list_work_items(&ctx.space.id, Page::all()).unwrap();
    assert!(all
        .windows(2)
        .all(|pair| pair[0].execution_order < pair[1].execution_order));
    assert_eq!(ctx.db.get_work_item(&items[1].id).unwrap().version, 15);
}

#[test]
fn stale_version_aborts_whole_batch() {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["X", "A", "B"]);
    let (x, a, b) = (&items[0], &items[1], &items[2]);

    let mut b_edit = b.clone();
    b_edit.fields.insert("system.title".to_string(), "B2".into());
    ctx.db.update_work_item(&b_edit).unwrap();

    let err = ctx
        .db
        .reorder_work_items(&ids(&[a, b]), &Placement::Above(x.id.clone()))
        .unwrap_err();
    assert!(matches!(err, Error::VersionConflict { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(ctx.titles(), ["X", "A", "B2"]);
    assert_eq!(ctx.db.get_work_item(&a.id).unwrap().version, a.version);
}

#[test]
fn empty_batch_is_rejected() {
    let mut ctx = TestContext::new();
    let err = ctx.db.reorder_work_items(&[], &Placement::Top).unwrap_err();
    assert!(matches!(err, Error::EmptyReorder));
    assert_eq!(err.kind(), ErrorKind::BadParameter);
}

#[test]
fn duplicate_items_are_rejected() {
    let mut ctx = TestContext::new();
    let a = ctx.item("A");
    let err = ctx
        .db
        .reorder_work_items(&ids(&[&a, &a]), &Placement::Top)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadParameter);
}

#[test]
fn reference_cannot_be_moved() {
    let mut ctx = TestContext::new();
    let items = seed(&mut ctx, &["A", "B"]);
    let err = ctx
        .db
        .reorder_work_items(
            &ids(&[&items[0], &items[1]]),
            &Placement::Below(items[1].id.clone()),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadParameter);
}

#[test]
fn reference_must_exist_in_the_same_space() {
    let mut ctx = TestContext::new();
    let a = ctx.item("A");
    let other = ctx.db.create_space("Other", None, OWNER).unwrap();
    let foreign = ctx
        .db
        .create_work_item(&other.id, "task", Default::default())
        .unwrap();

    for reference in ["wi-missing".to_string(), foreign.id.clone()] {
        let err = ctx
            .db
            .reorder_work_items(&ids(&[&a]), &Placement::Above(reference))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

#[test]
fn items_must_share_a_space() {
    let mut ctx = TestContext::new();
    let a = ctx.item("A");
    let other = ctx.db.create_space("Other", None, OWNER).unwrap();
    let foreign = ctx
        .db
        .create_work_item(&other.id, "task", Default::default())
        .unwrap();

    let err = ctx
        .db
        .reorder_work_items(&ids(&[&a, &foreign]), &Placement::Top)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
