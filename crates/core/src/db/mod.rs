// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed persistence and the engine operations built on it.
//!
//! The [`Database`] struct is the single entry point. Each submodule adds the
//! operations for one part of the engine as `impl Database` blocks. Every
//! mutation runs in one immediate transaction: rows are loaded, the caller's
//! version is compared with the stored one and the write is committed only
//! if nothing changed in between. Dropping a transaction without committing
//! rolls it back, so an error anywhere leaves no partial writes.

mod categories;
mod events;
mod hierarchy;
mod iterations;
mod link_types;
mod links;
mod reorder;
mod spaces;
mod work_items;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::Path;

use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// SQL schema for the engine database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS spaces (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    owner_id TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Work items; execution_order is a fractional key compared bytewise
CREATE TABLE IF NOT EXISTS work_items (
    id TEXT PRIMARY KEY,
    space_id TEXT NOT NULL,
    type_id TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    execution_order TEXT NOT NULL,
    fields TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (space_id) REFERENCES spaces(id),
    UNIQUE (space_id, execution_order)
);

CREATE TABLE IF NOT EXISTS link_categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    version INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS link_types (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    version INTEGER NOT NULL DEFAULT 0,
    forward_name TEXT NOT NULL,
    reverse_name TEXT NOT NULL,
    topology TEXT NOT NULL CHECK (topology IN ('tree', 'network', 'dependency')),
    link_category_id TEXT NOT NULL,
    space_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (link_category_id) REFERENCES link_categories(id),
    FOREIGN KEY (space_id) REFERENCES spaces(id),
    UNIQUE (space_id, name)
);

-- Links carry a copy of their type's topology so that the single-parent
-- rule can be enforced by a partial unique index.
CREATE TABLE IF NOT EXISTS work_item_links (
    id TEXT PRIMARY KEY,
    version INTEGER NOT NULL DEFAULT 0,
    source_id TEXT NOT NULL,
    target_id TEXT NOT NULL,
    link_type_id TEXT NOT NULL,
    topology TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,
    FOREIGN KEY (source_id) REFERENCES work_items(id),
    FOREIGN KEY (target_id) REFERENCES work_items(id),
    FOREIGN KEY (link_type_id) REFERENCES link_types(id),
    CHECK (source_id != target_id)
);

CREATE TABLE IF NOT EXISTS iterations (
    id TEXT PRIMARY KEY,
    space_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    path TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'new' CHECK (state IN ('new', 'start', 'close')),
    start_at TEXT,
    end_at TEXT,
    version INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (space_id) REFERENCES spaces(id),
    UNIQUE (space_id, path, name)
);

-- Audit trail of link mutations
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_id TEXT NOT NULL,
    action TEXT NOT NULL,
    actor TEXT NOT NULL,
    old_value TEXT,
    new_value TEXT,
    created_at TEXT NOT NULL
);

-- Indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_links_unique
    ON work_item_links(source_id, target_id, link_type_id) WHERE deleted_at IS NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_links_tree_parent
    ON work_item_links(link_type_id, target_id) WHERE topology = 'tree' AND deleted_at IS NULL;
CREATE INDEX IF NOT EXISTS idx_links_source ON work_item_links(source_id);
CREATE INDEX IF NOT EXISTS idx_links_target ON work_item_links(target_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_iterations_root ON iterations(space_id) WHERE path = '/';
CREATE UNIQUE INDEX IF NOT EXISTS idx_iterations_active ON iterations(space_id) WHERE state = 'start';
CREATE INDEX IF NOT EXISTS idx_iterations_path ON iterations(space_id, path);
CREATE INDEX IF NOT EXISTS idx_work_items_iteration
    ON work_items(json_extract(fields, '$."system.iteration"'));
CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_id);
"#;

/// Parse a string value from the database, returning a rusqlite error on parse failure.
pub(crate) fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
pub(crate) fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Parse an optional RFC3339 timestamp from the database.
pub(crate) fn parse_timestamp_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<DateTime<Utc>>, rusqlite::Error> {
    value.map(|s| parse_timestamp(&s, column)).transpose()
}

/// Convert a `COUNT(*)` result to an unsigned total.
pub(crate) fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

/// Returns true if the error is a SQLite constraint violation.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Translate constraint violations raised by a write into engine errors.
///
/// `translate` receives SQLite's message (e.g. `UNIQUE constraint failed:
/// iterations.space_id, iterations.path, iterations.name`) and picks the
/// matching error. Other storage errors pass through unchanged.
pub(crate) fn map_constraint<T>(
    result: rusqlite::Result<T>,
    translate: impl FnOnce(&str) -> Option<Error>,
) -> Result<T> {
    result.map_err(|err| {
        if !is_constraint_violation(&err) {
            return Error::Database(err);
        }
        let message = match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
            other => other.to_string(),
        };
        tracing::warn!(constraint = %message, "write rejected by storage constraint");
        translate(&message).unwrap_or(Error::Constraint(message))
    })
}

/// Reject a write whose caller saw an older (or newer) version than the stored one.
pub(crate) fn ensure_version(
    entity: &'static str,
    id: &str,
    expected: i64,
    actual: i64,
) -> Result<()> {
    if expected != actual {
        tracing::warn!(entity, id, expected, actual, "stale version rejected");
        return Err(Error::VersionConflict {
            entity,
            id: id.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Check the row count of an `UPDATE ... WHERE id = ? AND version = ?`.
pub(crate) fn ensure_updated(affected: usize, entity: &'static str, id: &str) -> Result<()> {
    if affected == 0 {
        return Err(Error::Constraint(format!(
            "{entity} {id} was modified concurrently"
        )));
    }
    Ok(())
}

/// Begin a transaction that takes the write lock immediately.
pub(crate) fn begin_write(conn: &mut Connection) -> Result<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

/// Create the schema on a database connection. Safe to run repeatedly.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection with engine operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
    config: EngineConfig,
}

impl Database {
    /// Open a database at the given path with default settings.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, EngineConfig::default())
    }

    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open_with_config(path: &Path, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = {};",
            config.busy_timeout_ms
        ))?;

        run_migrations(&conn)?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(Database { conn, config })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with_config(EngineConfig::default())
    }

    /// Open an in-memory database with custom settings (for testing).
    pub fn open_in_memory_with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        run_migrations(&conn)?;
        Ok(Database { conn, config })
    }

    /// The settings this database was opened with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub(crate) mod testing;
