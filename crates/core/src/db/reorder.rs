// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Execution order changes.
//!
//! A reorder moves a block of work items, in the caller's order, next to a
//! reference item or to either end of the space's list. The block receives
//! fresh keys strictly between the two neighbours that are not themselves
//! being moved, so no other item changes position or version.

use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::work_items::load_work_item;
use super::{begin_write, ensure_updated, ensure_version, Database};
use crate::error::{Error, Result};
use crate::order::OrderKey;
use crate::work_item::{Placement, VersionedId, WorkItem};

/// Which side of a key to search for a neighbour.
#[derive(Clone, Copy)]
enum Side {
    Before,
    After,
}

/// Find the closest key on `side` of `bound` that belongs to an item not in `moved`.
///
/// An absent bound means the end of the list in the direction opposite `side`.
fn neighbour(
    conn: &Connection,
    space_id: &str,
    bound: Option<&OrderKey>,
    side: Side,
    moved: &HashSet<&str>,
) -> Result<Option<OrderKey>> {
    let sql = match side {
        Side::Before => {
            "SELECT id, execution_order FROM work_items
             WHERE space_id = ?1 AND (?2 IS NULL OR execution_order < ?2)
             ORDER BY execution_order DESC"
        }
        Side::After => {
            "SELECT id, execution_order FROM work_items
             WHERE space_id = ?1 AND (?2 IS NULL OR execution_order > ?2)
             ORDER BY execution_order"
        }
    };
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params![space_id, bound.map(OrderKey::as_str)])?;
    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        if moved.contains(id.as_str()) {
            continue;
        }
        let key: String = row.get(1)?;
        return Ok(Some(key.parse()?));
    }
    Ok(None)
}

impl Database {
    /// Move work items to a new position, keeping their relative order.
    ///
    /// Every item must carry the version the caller last saw. If any of them
    /// is stale nothing is written. On success each moved item's version is
    /// incremented by one and the updated items are returned in the order
    /// given.
    pub fn reorder_work_items(
        &mut self,
        items: &[VersionedId],
        placement: &Placement,
    ) -> Result<Vec<WorkItem>> {
        if items.is_empty() {
            return Err(Error::EmptyReorder);
        }
        let moved: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        if moved.len() != items.len() {
            return Err(Error::InvalidInput(
                "reorder lists the same work item more than once".to_string(),
            ));
        }
        if let Some(reference) = placement.reference() {
            if moved.contains(reference) {
                return Err(Error::InvalidInput(format!(
                    "cannot reorder {reference} relative to itself"
                )));
            }
        }

        let tx = begin_write(&mut self.conn)?;
        let current = items
            .iter()
            .map(|item| load_work_item(&tx, &item.id))
            .collect::<Result<Vec<_>>>()?;
        let first = current.first().ok_or(Error::EmptyReorder)?;
        let space_id = first.space_id.clone();
        if let Some(other) = current.iter().find(|item| item.space_id != space_id) {
            return Err(Error::InvalidInput(format!(
                "work items {} and {} belong to different spaces",
                first.id, other.id
            )));
        }

        let (lo, hi) = match placement {
            Placement::Top => (None, neighbour(&tx, &space_id, None, Side::After, &moved)?),
            Placement::Bottom => (neighbour(&tx, &space_id, None, Side::Before, &moved)?, None),
            Placement::Above(reference) | Placement::Below(reference) => {
                let anchor = load_work_item(&tx, reference)?;
                if anchor.space_id != space_id {
                    return Err(Error::not_found("work item", reference.as_str()));
                }
                let key = anchor.execution_order;
                if matches!(placement, Placement::Above(_)) {
                    let lo = neighbour(&tx, &space_id, Some(&key), Side::Before, &moved)?;
                    (lo, Some(key))
                } else {
                    let hi = neighbour(&tx, &space_id, Some(&key), Side::After, &moved)?;
                    (Some(key), hi)
                }
            }
        };

        for (item, stored) in items.iter().zip(&current) {
            ensure_version("work item", &item.id, item.version, stored.version)?;
        }

        let keys = OrderKey::n_between(lo.as_ref(), hi.as_ref(), items.len())?;

        // Park the moved items on keys outside the alphabet first so that the
        // new keys never collide with the old ones under the unique index.
        for item in items {
            tx.execute(
                "UPDATE work_items SET execution_order = '~' || id WHERE id = ?1",
                params![item.id],
            )?;
        }
        let now = Utc::now().to_rfc3339();
        for (item, key) in items.iter().zip(&keys) {
            let affected = tx.execute(
                "UPDATE work_items SET execution_order = ?1, version = version + 1, updated_at = ?2
                 WHERE id = ?3 AND version = ?4",
                params![key.as_str(), now, item.id, item.version],
            )?;
            ensure_updated(affected, "work item", &item.id)?;
        }

        let updated = items
            .iter()
            .map(|item| load_work_item(&tx, &item.id))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;

        tracing::debug!(
            space = %space_id,
            count = items.len(),
            placement = ?placement,
            "work items reordered"
        );
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod tests;
