// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.
//!
//! The engine never reads files or environment variables itself. Callers
//! build an [`EngineConfig`] (usually from the `[engine]` table of the
//! project's `config.toml`) and hand it to [`Database`](crate::Database).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables passed explicitly into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum length of category, link type and iteration names.
    pub name_max_len: usize,
    /// Separator used when rendering resolved iteration paths.
    pub path_separator: String,
    /// SQLite busy timeout for file-backed databases.
    pub busy_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            name_max_len: 62,
            path_separator: "/".to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

impl EngineConfig {
    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.name_max_len == 0 {
            return Err(Error::InvalidInput(
                "engine.name_max_len must be greater than zero".to_string(),
            ));
        }
        if self.path_separator.is_empty() {
            return Err(Error::InvalidInput(
                "engine.path_separator cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates a user supplied name for a category, link type or iteration.
    ///
    /// Names are required, must not start with `_` and are limited to
    /// [`name_max_len`](Self::name_max_len) characters.
    pub fn validate_name(&self, field: &'static str, name: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidName {
            field,
            value: name.to_string(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("cannot be empty".to_string()));
        }
        if name.starts_with('_') {
            return Err(invalid("cannot start with '_'".to_string()));
        }
        if name.chars().count() > self.name_max_len {
            return Err(invalid(format!(
                "must be at most {} characters",
                self.name_max_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
