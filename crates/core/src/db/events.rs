// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event log operations.

use rusqlite::{params, Connection};

use super::{parse_db, parse_timestamp, Database};
use crate::error::Result;
use crate::event::Event;

const EVENT_COLUMNS: &str = "id, entity_id, action, actor, old_value, new_value, created_at";

fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    let action_str: String = row.get(2)?;
    let created_str: String = row.get(6)?;
    Ok(Event {
        id: row.get(0)?,
        entity_id: row.get(1)?,
        action: parse_db(&action_str, "action")?,
        actor: row.get(3)?,
        old_value: row.get(4)?,
        new_value: row.get(5)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

/// Append an event inside the caller's transaction.
pub(crate) fn log_event(conn: &Connection, event: &Event) -> Result<i64> {
    conn.execute(
        "INSERT INTO events (entity_id, action, actor, old_value, new_value, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.entity_id,
            event.action.as_str(),
            event.actor,
            event.old_value,
            event.new_value,
            event.created_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    /// Get the events recorded for an entity, oldest first.
    pub fn get_events(&self, entity_id: &str) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE entity_id = ?1 ORDER BY id"
        ))?;

        let events = stmt
            .query_map(params![entity_id], row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    /// Get the most recent events across all entities, newest first.
    pub fn get_recent_events(&self, limit: usize) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id DESC LIMIT ?1"
        ))?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let events = stmt
            .query_map(params![limit], row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
