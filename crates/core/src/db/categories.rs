// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Link category operations.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{begin_write, map_constraint, parse_timestamp, Database};
use crate::error::{Error, Result};
use crate::id::{generate_id, CATEGORY_PREFIX};
use crate::link::LinkCategory;

const CATEGORY_COLUMNS: &str = "id, name, description, version, created_at, updated_at";

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<LinkCategory> {
    let created_str: String = row.get(4)?;
    let updated_str: String = row.get(5)?;
    Ok(LinkCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        version: row.get(3)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

pub(crate) fn load_category(conn: &Connection, id: &str) -> Result<LinkCategory> {
    conn.query_row(
        &format!("SELECT {CATEGORY_COLUMNS} FROM link_categories WHERE id = ?1"),
        params![id],
        row_to_category,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("link category", id))
}

impl Database {
    /// Create a link category. Names are unique across all spaces.
    pub fn create_link_category(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<LinkCategory> {
        self.config.validate_name("category name", name)?;

        let now = Utc::now();
        let category = LinkCategory {
            id: generate_id(CATEGORY_PREFIX, name, &now),
            name: name.to_string(),
            description: description.map(str::to_string),
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let tx = begin_write(&mut self.conn)?;
        map_constraint(
            tx.execute(
                "INSERT INTO link_categories (id, name, description, version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    category.id,
                    category.name,
                    category.description,
                    category.version,
                    category.created_at.to_rfc3339(),
                    category.updated_at.to_rfc3339(),
                ],
            ),
            |msg| {
                msg.contains("link_categories.name").then(|| Error::DuplicateName {
                    entity: "link category",
                    name: name.to_string(),
                })
            },
        )?;
        tx.commit()?;

        tracing::debug!(category = %category.id, name = %category.name, "link category created");
        Ok(category)
    }

    /// Get a link category by ID.
    pub fn get_link_category(&self, id: &str) -> Result<LinkCategory> {
        load_category(&self.conn, id)
    }

    /// List all link categories ordered by name.
    pub fn list_link_categories(&self) -> Result<Vec<LinkCategory>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM link_categories ORDER BY name"
        ))?;

        let categories = stmt
            .query_map([], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }
}

#[cfg(test)]
#[path = "categories_tests.rs"]
mod tests;
