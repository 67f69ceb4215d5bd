// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    linked = { Action::Linked, "linked" },
    relinked = { Action::Relinked, "relinked" },
    unlinked = { Action::Unlinked, "unlinked" },
)]
fn action_strings(action: Action, text: &str) {
    assert_eq!(action.as_str(), text);
    assert_eq!(action.to_string(), text);
    assert_eq!(text.parse::<Action>().unwrap(), action);
}

#[test]
fn unknown_action_is_corrupted_data() {
    assert!(matches!(
        "created".parse::<Action>(),
        Err(Error::CorruptedData(_))
    ));
}

#[test]
fn event_builder() {
    let event = Event::new("ln-1".to_string(), Action::Relinked, "alice".to_string())
        .with_values(Some("old".to_string()), Some("new".to_string()));
    assert_eq!(event.id, 0);
    assert_eq!(event.old_value.as_deref(), Some("old"));
    assert_eq!(event.new_value.as_deref(), Some("new"));

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "relinked");
}
