// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::config::EngineConfig;
use crate::db::testing::TestContext;
use crate::error::ErrorKind;
use chrono::Duration;
use yare::parameterized;

#[test]
fn child_path_extends_parent_path() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let release = ctx.iteration(&root, "Release 1");
    let sprint = ctx.iteration(&release, "Sprint 1");

    assert!(release.id.starts_with("it-"));
    assert_eq!(release.path, root.path.child(&root.id));
    assert_eq!(sprint.path, release.path.child(&release.id));
    assert_eq!(sprint.path.to_string(), format!("/{}/{}", root.id, release.id));
    assert_eq!(sprint.state, IterationState::New);
    assert_eq!(ctx.db.get_iteration(&sprint.id).unwrap(), sprint);
}

#[test]
fn resolved_path_uses_ancestor_names() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let release = ctx.iteration(&root, "Release 1");
    let sprint = ctx.iteration(&release, "Sprint 1");

    assert_eq!(ctx.db.resolved_path(&root).unwrap(), "/");
    assert_eq!(ctx.db.resolved_path(&release).unwrap(), "/Project");
    assert_eq!(
        ctx.db.resolved_path(&sprint).unwrap(),
        "/Project/Release 1"
    );
}

#[test]
fn resolved_path_uses_configured_separator() {
    let mut ctx = TestContext::with_config(EngineConfig {
        path_separator: "\\".to_string(),
        ..EngineConfig::default()
    });
    let root = ctx.root();
    let release = ctx.iteration(&root, "Release 1");
    let sprint = ctx.iteration(&release, "Sprint 1");

    assert_eq!(ctx.db.resolved_path(&root).unwrap(), "\\");
    assert_eq!(
        ctx.db.resolved_path(&sprint).unwrap(),
        "\\Project\\Release 1"
    );
}

#[test]
fn create_child_requires_owner() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    // Ownership is checked before anything else, even a missing parent.
    let err = ctx
        .db
        .create_child_iteration("it-missing", &NewIteration::new("Sprint"), false)
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(ctx.db.child_iterations(&root.id).unwrap().is_empty());
}

#[test]
fn create_child_of_missing_parent() {
    let mut ctx = TestContext::new();
    assert!(matches!(
        ctx.db
            .create_child_iteration("it-missing", &NewIteration::new("Sprint"), true),
        Err(Error::NotFound {
            entity: "iteration",
            ..
        })
    ));
}

#[parameterized(
    empty = { "" },
    underscore = { "_sprint" },
    too_long = { "s123456789012345678901234567890123456789012345678901234567890123" },
)]
fn create_child_rejects_bad_names(name: &str) {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let err = ctx
        .db
        .create_child_iteration(&root.id, &NewIteration::new(name), true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadParameter);
}

#[test]
fn create_child_rejects_inverted_dates() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let start = Utc::now();
    let new = NewIteration::new("Sprint").with_dates(start, start - Duration::days(1));
    assert!(matches!(
        ctx.db.create_child_iteration(&root.id, &new, true),
        Err(Error::InvalidDateRange)
    ));

    let new = NewIteration::new("Sprint").with_dates(start, start + Duration::days(14));
    let sprint = ctx.db.create_child_iteration(&root.id, &new, true).unwrap();
    assert_eq!(sprint.end_at, Some(start + Duration::days(14)));
}

#[test]
fn sibling_names_are_unique() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let release = ctx.iteration(&root, "Release 1");
    ctx.iteration(&root, "Sprint 1");

    let err = ctx
        .db
        .create_child_iteration(&root.id, &NewIteration::new("Sprint 1"), true)
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateName { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The same name under a different parent is fine.
    ctx.iteration(&release, "Sprint 1");
}

#[test]
fn root_never_starts() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let err = ctx
        .db
        .update_iteration_state(&root, IterationState::Start)
        .unwrap_err();
    assert!(matches!(err, Error::RootIterationStart(_)));
    assert_eq!(err.kind(), ErrorKind::BadParameter);
    assert_eq!(ctx.root().state, IterationState::New);
}

#[test]
fn one_active_iteration_per_space() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let i1 = ctx.iteration(&root, "I1");
    let i2 = ctx.iteration(&root, "I2");

    let i1 = ctx
        .db
        .update_iteration_state(&i1, IterationState::Start)
        .unwrap();
    assert_eq!(i1.state, IterationState::Start);
    assert_eq!(i1.version, 1);

    let err = ctx
        .db
        .update_iteration_state(&i2, IterationState::Start)
        .unwrap_err();
    assert!(matches!(err, Error::IterationAlreadyActive(_)));
    assert_eq!(err.kind(), ErrorKind::BadParameter);

    ctx.db
        .update_iteration_state(&i1, IterationState::Close)
        .unwrap();
    let i2 = ctx
        .db
        .update_iteration_state(&i2, IterationState::Start)
        .unwrap();
    assert_eq!(i2.state, IterationState::Start);
}

#[test]
fn late_second_start_names_the_active_iteration() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let i1 = ctx.iteration(&root, "I1");
    let i2 = ctx.iteration(&root, "I2");
    ctx.db
        .update_iteration_state(&i1, IterationState::Start)
        .unwrap();

    let err = map_constraint(
        ctx.db.conn.execute(
            "UPDATE iterations SET state = 'start' WHERE id = ?1",
            params![i2.id],
        ),
        iteration_constraint(&ctx.db.conn, &i2),
    )
    .unwrap_err();
    assert!(
        matches!(&err, Error::IterationAlreadyActive(name) if name == "I1"),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::BadParameter);
}

#[test]
fn active_scope_spans_nesting_levels() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let release = ctx.iteration(&root, "Release");
    let sprint = ctx.iteration(&release, "Sprint");

    ctx.db
        .update_iteration_state(&release, IterationState::Start)
        .unwrap();
    assert!(matches!(
        ctx.db.update_iteration_state(&sprint, IterationState::Start),
        Err(Error::IterationAlreadyActive(_))
    ));
}

#[parameterized(
    new_to_close = { IterationState::Close },
    new_to_new = { IterationState::New },
)]
fn unsupported_transitions_from_new(target: IterationState) {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let sprint = ctx.iteration(&root, "Sprint");
    assert!(matches!(
        ctx.db.update_iteration_state(&sprint, target),
        Err(Error::InvalidTransition { .. })
    ));
}

#[test]
fn closed_iterations_stay_closed() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let sprint = ctx.iteration(&root, "Sprint");
    let sprint = ctx
        .db
        .update_iteration_state(&sprint, IterationState::Start)
        .unwrap();
    let sprint = ctx
        .db
        .update_iteration_state(&sprint, IterationState::Close)
        .unwrap();

    for target in [IterationState::New, IterationState::Start] {
        let err = ctx.db.update_iteration_state(&sprint, target).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParameter);
    }
}

#[test]
fn state_change_with_stale_version_conflicts() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let sprint = ctx.iteration(&root, "Sprint");
    ctx.db
        .update_iteration_state(&sprint, IterationState::Start)
        .unwrap();

    let err = ctx
        .db
        .update_iteration_state(&sprint, IterationState::Close)
        .unwrap_err();
    assert!(matches!(err, Error::VersionConflict { .. }));
}

#[test]
fn update_iteration_fields() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let mut sprint = ctx.iteration(&root, "Sprint");
    let start = Utc::now();

    sprint.name = "Sprint 1".to_string();
    sprint.description = Some("First sprint".to_string());
    sprint.start_at = Some(start);
    sprint.end_at = Some(start + Duration::days(7));
    sprint.state = IterationState::Start;
    let updated = ctx.db.update_iteration(&sprint, true).unwrap();

    assert_eq!(updated.name, "Sprint 1");
    assert_eq!(updated.description.as_deref(), Some("First sprint"));
    assert_eq!(updated.state, IterationState::Start);
    assert_eq!(updated.version, 1);
}

#[test]
fn update_iteration_checks_owner_and_rules() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let mut sprint = ctx.iteration(&root, "Sprint");
    ctx.iteration(&root, "Taken");

    assert!(matches!(
        ctx.db.update_iteration(&sprint, false),
        Err(Error::Forbidden(_))
    ));

    sprint.name = "Taken".to_string();
    assert!(matches!(
        ctx.db.update_iteration(&sprint, true),
        Err(Error::DuplicateName { .. })
    ));

    sprint.name = "Sprint".to_string();
    sprint.state = IterationState::Close;
    assert!(matches!(
        ctx.db.update_iteration(&sprint, true),
        Err(Error::InvalidTransition { .. })
    ));

    let mut root_edit = root.clone();
    root_edit.state = IterationState::Start;
    assert!(matches!(
        ctx.db.update_iteration(&root_edit, true),
        Err(Error::RootIterationStart(_))
    ));
}

#[test]
fn list_and_children() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let release = ctx.iteration(&root, "Release");
    ctx.iteration(&release, "Sprint B");
    ctx.iteration(&release, "Sprint A");

    let all: Vec<_> = ctx
        .db
        .list_iterations(&ctx.space.id)
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(all, ["Project", "Release", "Sprint A", "Sprint B"]);

    let children: Vec<_> = ctx
        .db
        .child_iterations(&release.id)
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(children, ["Sprint A", "Sprint B"]);
}

#[test]
fn counts_total_and_closed() {
    let mut ctx = TestContext::new();
    let root = ctx.root();
    let sprint = ctx.iteration(&root, "Sprint");
    let empty = ctx.iteration(&root, "Empty");
    ctx.planned_item("a", &sprint, false);
    ctx.planned_item("b", &sprint, true);
    ctx.planned_item("c", &sprint, true);
    ctx.item("unplanned");

    let counts = ctx.db.iteration_counts(&sprint.id).unwrap();
    assert_eq!(counts, WorkItemCounts { total: 3, closed: 2 });
    assert_eq!(counts.open(), 1);
    assert_eq!(
        ctx.db.iteration_counts(&empty.id).unwrap(),
        WorkItemCounts::default()
    );

    let by_iteration = ctx.db.iteration_counts_for_space(&ctx.space.id).unwrap();
    assert_eq!(by_iteration.len(), 3);
    assert_eq!(by_iteration[&sprint.id].total, 3);
    assert_eq!(by_iteration[&empty.id], WorkItemCounts::default());
    assert_eq!(by_iteration[&root.id], WorkItemCounts::default());
}
