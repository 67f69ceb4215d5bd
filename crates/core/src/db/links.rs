// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Link operations.
//!
//! Every create and update first rejects self links, before touching
//! storage, then runs the same validation chain inside the write
//! transaction, in this order:
//!
//! 1. the link type exists
//! 2. source and target exist and belong to the link type's space
//! 3. tree types: the target has no other live parent of this type
//! 4. tree types: the link does not close a cycle
//! 5. other types: no identical live link exists
//!
//! The partial unique indexes on `work_item_links` back up steps 3 and 5.
//! Links are soft deleted and every mutation is recorded as an [`Event`].

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::events::log_event;
use super::link_types::load_link_type;
use super::work_items::load_work_item;
use super::{
    begin_write, ensure_updated, ensure_version, map_constraint, parse_timestamp,
    parse_timestamp_opt, Database,
};
use crate::error::{Error, Result};
use crate::event::{Action, Event};
use crate::id::{generate_id, LINK_PREFIX};
use crate::link::{Link, LinkType};

const LINK_COLUMNS: &str =
    "id, version, source_id, target_id, link_type_id, created_at, updated_at, deleted_at";

fn row_to_link(row: &rusqlite::Row) -> rusqlite::Result<Link> {
    let created_str: String = row.get(5)?;
    let updated_str: String = row.get(6)?;
    Ok(Link {
        id: row.get(0)?,
        version: row.get(1)?,
        source_id: row.get(2)?,
        target_id: row.get(3)?,
        link_type_id: row.get(4)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
        deleted_at: parse_timestamp_opt(row.get(7)?, "deleted_at")?,
    })
}

/// Load a live link, failing with NotFound if it does not exist or was deleted.
fn load_link(conn: &Connection, id: &str) -> Result<Link> {
    conn.query_row(
        &format!("SELECT {LINK_COLUMNS} FROM work_item_links WHERE id = ?1 AND deleted_at IS NULL"),
        params![id],
        row_to_link,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("link", id))
}

fn describe(source_id: &str, target_id: &str, link_type_id: &str) -> String {
    format!("{source_id} -> {target_id} [{link_type_id}]")
}

fn check_not_self(source_id: &str, target_id: &str) -> Result<()> {
    if source_id == target_id {
        return Err(Error::SelfLink(source_id.to_string()));
    }
    Ok(())
}

/// Check if linking `source_id -> target_id` would make `target_id` its own ancestor.
fn would_create_cycle(
    conn: &Connection,
    link_type_id: &str,
    source_id: &str,
    target_id: &str,
    exclude: &str,
) -> Result<bool> {
    let count: i64 = conn.query_row(
        "WITH RECURSIVE ancestors(id) AS (
            SELECT source_id FROM work_item_links
            WHERE target_id = ?1 AND link_type_id = ?2 AND deleted_at IS NULL AND id != ?4
            UNION
            SELECT l.source_id FROM work_item_links l JOIN ancestors a ON l.target_id = a.id
            WHERE l.link_type_id = ?2 AND l.deleted_at IS NULL AND l.id != ?4
        )
        SELECT COUNT(*) FROM ancestors WHERE id = ?3",
        params![source_id, link_type_id, target_id, exclude],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// The source of the live link of `link_type_id` pointing at `target_id`, other than `exclude`.
fn live_parent(
    conn: &Connection,
    link_type_id: &str,
    target_id: &str,
    exclude: &str,
) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT source_id FROM work_item_links
             WHERE link_type_id = ?1 AND target_id = ?2 AND deleted_at IS NULL AND id != ?3",
            params![link_type_id, target_id, exclude],
            |row| row.get(0),
        )
        .optional()?)
}

/// Runs the validation chain for a link, ignoring the link `exclude` itself.
fn validate_link(
    conn: &Connection,
    source_id: &str,
    target_id: &str,
    link_type_id: &str,
    exclude: Option<&str>,
) -> Result<LinkType> {
    let link_type = load_link_type(conn, link_type_id)?;
    for id in [source_id, target_id] {
        let item = load_work_item(conn, id)?;
        if item.space_id != link_type.space_id {
            return Err(Error::InvalidInput(format!(
                "work item {id} is not in the space of link type {}",
                link_type.name
            )));
        }
    }

    let exclude = exclude.unwrap_or_default();
    if link_type.topology.is_single_parent() {
        if let Some(parent) = live_parent(conn, link_type_id, target_id, exclude)? {
            return Err(Error::TargetHasParent {
                target: target_id.to_string(),
                parent,
                link_type: link_type.name,
            });
        }
        if would_create_cycle(conn, link_type_id, source_id, target_id, exclude)? {
            return Err(Error::CycleDetected {
                link_type: link_type.name,
                source_id: source_id.to_string(),
                target: target_id.to_string(),
            });
        }
    } else {
        let duplicates: i64 = conn.query_row(
            "SELECT COUNT(*) FROM work_item_links
             WHERE source_id = ?1 AND target_id = ?2 AND link_type_id = ?3
               AND deleted_at IS NULL AND id != ?4",
            params![source_id, target_id, link_type_id, exclude],
            |row| row.get(0),
        )?;
        if duplicates > 0 {
            return Err(Error::DuplicateLink {
                source_id: source_id.to_string(),
                target: target_id.to_string(),
                link_type: link_type.name,
            });
        }
    }

    Ok(link_type)
}

/// Translates link index violations that slipped past validation.
///
/// A tree parent violation is reported with the parent that won, read back
/// through `conn`; if that lookup fails the raw constraint error is kept.
fn link_constraint<'a>(
    conn: &'a Connection,
    link: &'a Link,
) -> impl FnOnce(&str) -> Option<Error> + 'a {
    move |msg| {
        if msg.contains("work_item_links.link_type_id, work_item_links.target_id") {
            live_parent(conn, &link.link_type_id, &link.target_id, &link.id)
                .ok()
                .flatten()
                .map(|parent| Error::TargetHasParent {
                    target: link.target_id.clone(),
                    parent,
                    link_type: link.link_type_id.clone(),
                })
        } else if msg.contains("work_item_links.source_id, work_item_links.target_id") {
            Some(Error::DuplicateLink {
                source_id: link.source_id.clone(),
                target: link.target_id.clone(),
                link_type: link.link_type_id.clone(),
            })
        } else if msg.contains("CHECK") {
            Some(Error::SelfLink(link.source_id.clone()))
        } else {
            None
        }
    }
}

impl Database {
    /// Create a link between two work items.
    pub fn create_link(
        &mut self,
        source_id: &str,
        target_id: &str,
        link_type_id: &str,
        actor: &str,
    ) -> Result<Link> {
        check_not_self(source_id, target_id)?;

        let tx = begin_write(&mut self.conn)?;
        let link_type = validate_link(&tx, source_id, target_id, link_type_id, None)?;

        let now = Utc::now();
        let link = Link {
            id: generate_id(LINK_PREFIX, &format!("{source_id}:{target_id}"), &now),
            version: 0,
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            link_type_id: link_type_id.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        map_constraint(
            tx.execute(
                "INSERT INTO work_item_links (id, version, source_id, target_id, link_type_id,
                                              topology, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    link.id,
                    link.version,
                    link.source_id,
                    link.target_id,
                    link.link_type_id,
                    link_type.topology.as_str(),
                    link.created_at.to_rfc3339(),
                    link.updated_at.to_rfc3339(),
                ],
            ),
            link_constraint(&tx, &link),
        )?;
        log_event(
            &tx,
            &Event::new(link.id.clone(), Action::Linked, actor.to_string()).with_values(
                None,
                Some(describe(source_id, target_id, link_type_id)),
            ),
        )?;
        tx.commit()?;

        tracing::debug!(link = %link.id, source = %source_id, target = %target_id, link_type = %link_type.name, "link created");
        Ok(link)
    }

    /// Get a live link by ID.
    pub fn get_link(&self, id: &str) -> Result<Link> {
        load_link(&self.conn, id)
    }

    /// Save a link's source, target and type.
    pub fn update_link(&mut self, link: &Link, actor: &str) -> Result<Link> {
        check_not_self(&link.source_id, &link.target_id)?;

        let tx = begin_write(&mut self.conn)?;
        let current = load_link(&tx, &link.id)?;
        ensure_version("link", &link.id, link.version, current.version)?;
        let link_type = validate_link(
            &tx,
            &link.source_id,
            &link.target_id,
            &link.link_type_id,
            Some(&link.id),
        )?;

        let affected = map_constraint(
            tx.execute(
                "UPDATE work_item_links
                 SET source_id = ?1, target_id = ?2, link_type_id = ?3, topology = ?4,
                     version = version + 1, updated_at = ?5
                 WHERE id = ?6 AND version = ?7 AND deleted_at IS NULL",
                params![
                    link.source_id,
                    link.target_id,
                    link.link_type_id,
                    link_type.topology.as_str(),
                    Utc::now().to_rfc3339(),
                    link.id,
                    link.version,
                ],
            ),
            link_constraint(&tx, link),
        )?;
        ensure_updated(affected, "link", &link.id)?;
        log_event(
            &tx,
            &Event::new(link.id.clone(), Action::Relinked, actor.to_string()).with_values(
                Some(describe(
                    &current.source_id,
                    &current.target_id,
                    &current.link_type_id,
                )),
                Some(describe(&link.source_id, &link.target_id, &link.link_type_id)),
            ),
        )?;
        let updated = load_link(&tx, &link.id)?;
        tx.commit()?;

        tracing::debug!(link = %updated.id, version = updated.version, "link updated");
        Ok(updated)
    }

    /// Soft delete a link.
    pub fn delete_link(&mut self, id: &str, actor: &str) -> Result<()> {
        let tx = begin_write(&mut self.conn)?;
        let current = load_link(&tx, id)?;

        let now = Utc::now().to_rfc3339();
        let affected = tx.execute(
            "UPDATE work_item_links SET deleted_at = ?1, updated_at = ?1, version = version + 1
             WHERE id = ?2 AND version = ?3 AND deleted_at IS NULL",
            params![now, id, current.version],
        )?;
        ensure_updated(affected, "link", id)?;
        log_event(
            &tx,
            &Event::new(id.to_string(), Action::Unlinked, actor.to_string()).with_values(
                Some(describe(
                    &current.source_id,
                    &current.target_id,
                    &current.link_type_id,
                )),
                None,
            ),
        )?;
        tx.commit()?;

        tracing::debug!(link = %id, "link deleted");
        Ok(())
    }

    /// List the live links where a work item is the source or the target.
    pub fn links_for_work_item(&self, work_item_id: &str) -> Result<Vec<Link>> {
        load_work_item(&self.conn, work_item_id)?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LINK_COLUMNS} FROM work_item_links
             WHERE (source_id = ?1 OR target_id = ?1) AND deleted_at IS NULL
             ORDER BY created_at, id"
        ))?;
        let links = stmt
            .query_map(params![work_item_id], row_to_link)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(links)
    }

    /// List the live links of a link type.
    pub fn links_of_type(&self, link_type_id: &str) -> Result<Vec<Link>> {
        load_link_type(&self.conn, link_type_id)?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LINK_COLUMNS} FROM work_item_links
             WHERE link_type_id = ?1 AND deleted_at IS NULL
             ORDER BY created_at, id"
        ))?;
        let links = stmt
            .query_map(params![link_type_id], row_to_link)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(links)
    }
}

#[cfg(test)]
#[path = "links_tests.rs"]
mod tests;
