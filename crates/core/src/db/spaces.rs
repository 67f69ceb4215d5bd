// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Space operations.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{begin_write, map_constraint, parse_timestamp, Database};
use crate::error::{Error, Result};
use crate::id::{generate_id, ITERATION_PREFIX, SPACE_PREFIX};
use crate::iteration::{IterationPath, IterationState};
use crate::space::Space;

const SPACE_COLUMNS: &str = "id, name, description, owner_id, version, created_at, updated_at";

/// Map a row to a Space.
///
/// Expected columns: [`SPACE_COLUMNS`]
fn row_to_space(row: &rusqlite::Row) -> rusqlite::Result<Space> {
    let created_str: String = row.get(5)?;
    let updated_str: String = row.get(6)?;
    Ok(Space {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        owner_id: row.get(3)?,
        version: row.get(4)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

/// Load a space, failing with NotFound if it does not exist.
pub(crate) fn load_space(conn: &Connection, id: &str) -> Result<Space> {
    conn.query_row(
        &format!("SELECT {SPACE_COLUMNS} FROM spaces WHERE id = ?1"),
        params![id],
        row_to_space,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("space", id))
}

impl Database {
    /// Create a space together with its root iteration.
    ///
    /// The root iteration is named after the space and has an empty path.
    pub fn create_space(
        &mut self,
        name: &str,
        description: Option<&str>,
        owner_id: &str,
    ) -> Result<Space> {
        self.config.validate_name("space name", name)?;
        if owner_id.trim().is_empty() {
            return Err(Error::InvalidInput("space owner cannot be empty".to_string()));
        }

        let now = Utc::now();
        let space = Space {
            id: generate_id(SPACE_PREFIX, name, &now),
            name: name.to_string(),
            description: description.map(str::to_string),
            owner_id: owner_id.to_string(),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let tx = begin_write(&mut self.conn)?;
        map_constraint(
            tx.execute(
                "INSERT INTO spaces (id, name, description, owner_id, version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    space.id,
                    space.name,
                    space.description,
                    space.owner_id,
                    space.version,
                    space.created_at.to_rfc3339(),
                    space.updated_at.to_rfc3339(),
                ],
            ),
            |_| {
                Some(Error::DuplicateName {
                    entity: "space",
                    name: name.to_string(),
                })
            },
        )?;
        tx.execute(
            "INSERT INTO iterations (id, space_id, name, path, state, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
            params![
                generate_id(ITERATION_PREFIX, name, &now),
                space.id,
                space.name,
                IterationPath::root().to_string(),
                IterationState::New.as_str(),
                now.to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        tracing::debug!(space = %space.id, owner = %space.owner_id, "space created");
        Ok(space)
    }

    /// Get a space by ID.
    pub fn get_space(&self, id: &str) -> Result<Space> {
        load_space(&self.conn, id)
    }

    /// Get a space by its unique name.
    pub fn find_space_by_name(&self, name: &str) -> Result<Space> {
        self.conn
            .query_row(
                &format!("SELECT {SPACE_COLUMNS} FROM spaces WHERE name = ?1"),
                params![name],
                row_to_space,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("space", name))
    }

    /// List all spaces ordered by name.
    pub fn list_spaces(&self) -> Result<Vec<Space>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SPACE_COLUMNS} FROM spaces ORDER BY name"))?;

        let spaces = stmt
            .query_map([], row_to_space)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(spaces)
    }
}

#[cfg(test)]
#[path = "spaces_tests.rs"]
mod tests;
