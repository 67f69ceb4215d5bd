// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Actor identity detection.
//!
//! The actor is recorded on every link event and compared against a
//! space's owner to decide whether iteration changes are allowed.

use std::process::Command;

use crate::config::Config;

/// Environment variable that overrides every other actor source.
pub const ACTOR_ENV: &str = "WIT_ACTOR";

/// Returns the actor name for the current invocation.
///
/// Resolution order:
/// 1. `WIT_ACTOR` environment variable
/// 2. `actor` in `.wit/config.toml`
/// 3. Git config user.name
/// 4. Unix username from USER or LOGNAME (if not a system account)
/// 5. Fallback to "human"
pub fn resolve_actor(config: &Config) -> String {
    if let Some(name) = non_empty(std::env::var(ACTOR_ENV).ok()) {
        return name;
    }
    if let Some(name) = non_empty(config.actor.clone()) {
        return name;
    }
    get_user_name()
}

/// Returns the current user's display name.
pub fn get_user_name() -> String {
    if let Some(name) = get_git_user_name() {
        return name;
    }

    if let Some(name) = get_unix_username() {
        if !is_system_account(&name) {
            return name;
        }
    }

    "human".to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_git_user_name() -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", "user.name"])
        .output()
        .ok()?;

    if output.status.success() {
        return non_empty(Some(String::from_utf8_lossy(&output.stdout).into_owned()));
    }
    None
}

fn get_unix_username() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .ok()
        .filter(|s| !s.is_empty())
}

fn is_system_account(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "root" | "system" | "administrator" | "admin" | "daemon" | "nobody"
    )
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
