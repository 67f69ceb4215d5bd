// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use std::sync::Mutex;
use yare::parameterized;

// Serializes tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn with_env<F: FnOnce()>(key: &str, value: Option<&str>, f: F) {
    let original = std::env::var(key).ok();
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
    f();
    match original {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}

#[parameterized(
    root = { "root", true },
    upper_root = { "ROOT", true },
    daemon = { "daemon", true },
    nobody = { "nobody", true },
    alice = { "alice", false },
    kestred = { "kestred", false },
)]
fn system_accounts(name: &str, expected: bool) {
    assert_eq!(is_system_account(name), expected);
}

#[test]
fn env_override_wins() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let config = Config {
        actor: Some("configured".to_string()),
        ..Config::default()
    };
    with_env(ACTOR_ENV, Some("from-env"), || {
        assert_eq!(resolve_actor(&config), "from-env");
    });
}

#[test]
fn configured_actor_beats_detection() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let config = Config {
        actor: Some("  configured ".to_string()),
        ..Config::default()
    };
    with_env(ACTOR_ENV, None, || {
        assert_eq!(resolve_actor(&config), "configured");
    });
}

#[test]
fn blank_sources_fall_through() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let config = Config {
        actor: Some("   ".to_string()),
        ..Config::default()
    };
    with_env(ACTOR_ENV, Some(""), || {
        assert_eq!(resolve_actor(&config), get_user_name());
    });
}

#[test]
fn user_name_is_never_empty() {
    assert!(!get_user_name().is_empty());
}

#[test]
fn unix_username_falls_through_to_logname() {
    let _guard = ENV_MUTEX.lock().unwrap();
    with_env("USER", None, || {
        with_env("LOGNAME", Some("testlogname"), || {
            assert_eq!(get_unix_username(), Some("testlogname".to_string()));
        });
    });
}
