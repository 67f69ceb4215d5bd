// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Link type operations.
//!
//! A link type's topology is copied onto each of its links so that the
//! single-parent rule can be enforced by a partial unique index. Changing the
//! topology rewrites those copies and re-validates the existing graph.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::categories::load_category;
use super::spaces::load_space;
use super::{
    begin_write, ensure_updated, ensure_version, map_constraint, parse_db, parse_timestamp,
    Database,
};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::id::{generate_id, LINK_TYPE_PREFIX};
use crate::link::{LinkType, NewLinkType, Topology};

const LINK_TYPE_COLUMNS: &str = "id, name, description, version, forward_name, reverse_name, \
     topology, link_category_id, space_id, created_at, updated_at";

fn row_to_link_type(row: &rusqlite::Row) -> rusqlite::Result<LinkType> {
    let topology_str: String = row.get(6)?;
    let created_str: String = row.get(9)?;
    let updated_str: String = row.get(10)?;
    Ok(LinkType {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        version: row.get(3)?,
        forward_name: row.get(4)?,
        reverse_name: row.get(5)?,
        topology: parse_db(&topology_str, "topology")?,
        link_category_id: row.get(7)?,
        space_id: row.get(8)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

/// Load a link type, failing with NotFound if it does not exist.
pub(crate) fn load_link_type(conn: &Connection, id: &str) -> Result<LinkType> {
    conn.query_row(
        &format!("SELECT {LINK_TYPE_COLUMNS} FROM link_types WHERE id = ?1"),
        params![id],
        row_to_link_type,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("link type", id))
}

fn validate_labels(config: &EngineConfig, name: &str, forward: &str, reverse: &str) -> Result<()> {
    config.validate_name("link type name", name)?;
    for (field, value) in [("forward name", forward), ("reverse name", reverse)] {
        if value.trim().is_empty() {
            return Err(Error::InvalidName {
                field,
                value: value.to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
    }
    Ok(())
}

fn duplicate_name(name: &str) -> impl FnOnce(&str) -> Option<Error> + '_ {
    move |msg| {
        msg.contains("link_types.name").then(|| Error::DuplicateName {
            entity: "link type",
            name: name.to_string(),
        })
    }
}

/// Fails if some target has more than one live link of this type.
fn check_single_parent(conn: &Connection, link_type: &LinkType) -> Result<()> {
    let clash: Option<(String, String)> = conn
        .query_row(
            "SELECT target_id, MIN(source_id) FROM work_item_links
             WHERE link_type_id = ?1 AND deleted_at IS NULL
             GROUP BY target_id HAVING COUNT(*) > 1
             LIMIT 1",
            params![link_type.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match clash {
        Some((target, parent)) => Err(Error::TargetHasParent {
            target,
            parent,
            link_type: link_type.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Fails if the live links of this type contain a cycle.
fn check_acyclic(conn: &Connection, link_type: &LinkType) -> Result<()> {
    let looped: Option<String> = conn
        .query_row(
            "WITH RECURSIVE reach(origin, id) AS (
                SELECT source_id, target_id FROM work_item_links
                WHERE link_type_id = ?1 AND deleted_at IS NULL
                UNION
                SELECT r.origin, l.target_id FROM work_item_links l
                JOIN reach r ON l.source_id = r.id
                WHERE l.link_type_id = ?1 AND l.deleted_at IS NULL
            )
            SELECT origin FROM reach WHERE origin = id LIMIT 1",
            params![link_type.id],
            |row| row.get(0),
        )
        .optional()?;

    match looped {
        Some(id) => Err(Error::CycleDetected {
            link_type: link_type.name.clone(),
            source_id: id.clone(),
            target: id,
        }),
        None => Ok(()),
    }
}

impl Database {
    /// Create a link type in a space.
    pub fn create_link_type(&mut self, new_type: &NewLinkType) -> Result<LinkType> {
        validate_labels(
            &self.config,
            &new_type.name,
            &new_type.forward_name,
            &new_type.reverse_name,
        )?;

        let tx = begin_write(&mut self.conn)?;
        load_space(&tx, &new_type.space_id)?;
        load_category(&tx, &new_type.link_category_id)?;

        let now = Utc::now();
        let link_type = LinkType {
            id: generate_id(LINK_TYPE_PREFIX, &new_type.name, &now),
            name: new_type.name.clone(),
            description: new_type.description.clone(),
            version: 0,
            forward_name: new_type.forward_name.clone(),
            reverse_name: new_type.reverse_name.clone(),
            topology: new_type.topology,
            link_category_id: new_type.link_category_id.clone(),
            space_id: new_type.space_id.clone(),
            created_at: now,
            updated_at: now,
        };

        map_constraint(
            tx.execute(
                "INSERT INTO link_types (id, name, description, version, forward_name, reverse_name,
                                         topology, link_category_id, space_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    link_type.id,
                    link_type.name,
                    link_type.description,
                    link_type.version,
                    link_type.forward_name,
                    link_type.reverse_name,
                    link_type.topology.as_str(),
                    link_type.link_category_id,
                    link_type.space_id,
                    link_type.created_at.to_rfc3339(),
                    link_type.updated_at.to_rfc3339(),
                ],
            ),
            duplicate_name(&new_type.name),
        )?;
        tx.commit()?;

        tracing::debug!(
            link_type = %link_type.id,
            name = %link_type.name,
            topology = %link_type.topology,
            "link type created"
        );
        Ok(link_type)
    }

    /// Get a link type by ID.
    pub fn get_link_type(&self, id: &str) -> Result<LinkType> {
        load_link_type(&self.conn, id)
    }

    /// List the link types of a space ordered by name.
    pub fn list_link_types(&self, space_id: &str) -> Result<Vec<LinkType>> {
        load_space(&self.conn, space_id)?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LINK_TYPE_COLUMNS} FROM link_types WHERE space_id = ?1 ORDER BY name"
        ))?;
        let link_types = stmt
            .query_map(params![space_id], row_to_link_type)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(link_types)
    }

    /// Save a link type.
    ///
    /// A topology change is checked against the type's live links before it
    /// is applied. The owning space cannot change.
    pub fn update_link_type(&mut self, link_type: &LinkType) -> Result<LinkType> {
        validate_labels(
            &self.config,
            &link_type.name,
            &link_type.forward_name,
            &link_type.reverse_name,
        )?;

        let tx = begin_write(&mut self.conn)?;
        let current = load_link_type(&tx, &link_type.id)?;
        ensure_version("link type", &link_type.id, link_type.version, current.version)?;
        if current.space_id != link_type.space_id {
            return Err(Error::InvalidInput(format!(
                "link type {} cannot move to another space",
                link_type.id
            )));
        }
        if current.link_category_id != link_type.link_category_id {
            load_category(&tx, &link_type.link_category_id)?;
        }

        let affected = map_constraint(
            tx.execute(
                "UPDATE link_types
                 SET name = ?1, description = ?2, forward_name = ?3, reverse_name = ?4,
                     topology = ?5, link_category_id = ?6, version = version + 1, updated_at = ?7
                 WHERE id = ?8 AND version = ?9",
                params![
                    link_type.name,
                    link_type.description,
                    link_type.forward_name,
                    link_type.reverse_name,
                    link_type.topology.as_str(),
                    link_type.link_category_id,
                    Utc::now().to_rfc3339(),
                    link_type.id,
                    link_type.version,
                ],
            ),
            duplicate_name(&link_type.name),
        )?;
        ensure_updated(affected, "link type", &link_type.id)?;

        if current.topology != link_type.topology {
            if link_type.topology == Topology::Tree {
                check_single_parent(&tx, link_type)?;
                check_acyclic(&tx, link_type)?;
            }
            tx.execute(
                "UPDATE work_item_links SET topology = ?1 WHERE link_type_id = ?2",
                params![link_type.topology.as_str(), link_type.id],
            )?;
            tracing::debug!(
                link_type = %link_type.id,
                from = %current.topology,
                to = %link_type.topology,
                "link type topology changed"
            );
        }

        let updated = load_link_type(&tx, &link_type.id)?;
        tx.commit()?;
        Ok(updated)
    }

    /// Delete a link type that no live link uses.
    ///
    /// Soft-deleted links of the type are purged along with it.
    pub fn delete_link_type(&mut self, id: &str, version: i64) -> Result<()> {
        let tx = begin_write(&mut self.conn)?;
        let current = load_link_type(&tx, id)?;
        ensure_version("link type", id, version, current.version)?;

        let live: i64 = tx.query_row(
            "SELECT COUNT(*) FROM work_item_links WHERE link_type_id = ?1 AND deleted_at IS NULL",
            params![id],
            |row| row.get(0),
        )?;
        if live > 0 {
            tracing::warn!(link_type = %id, live, "link type still in use");
            return Err(Error::LinkTypeInUse(current.name));
        }

        tx.execute(
            "DELETE FROM work_item_links WHERE link_type_id = ?1",
            params![id],
        )?;
        let affected = tx.execute(
            "DELETE FROM link_types WHERE id = ?1 AND version = ?2",
            params![id, version],
        )?;
        ensure_updated(affected, "link type", id)?;
        tx.commit()?;

        tracing::debug!(link_type = %id, "link type deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "link_types_tests.rs"]
mod tests;
