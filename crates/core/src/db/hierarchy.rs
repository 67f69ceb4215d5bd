// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parent/child queries over live tree links.

use rusqlite::{params, OptionalExtension};

use super::count;
use super::work_items::{load_work_item, row_to_work_item, WORK_ITEM_COLUMNS};
use super::Database;
use crate::error::Result;
use crate::work_item::{Page, WorkItem};

impl Database {
    /// Check if a work item is the source of any live tree link.
    pub fn has_children(&self, work_item_id: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM work_item_links
                WHERE source_id = ?1 AND topology = 'tree' AND deleted_at IS NULL
            )",
            params![work_item_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// List the children of a work item in execution order, with the total count.
    pub fn list_children(&self, parent_id: &str, page: Page) -> Result<(Vec<WorkItem>, u64)> {
        load_work_item(&self.conn, parent_id)?;

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT target_id) FROM work_item_links
             WHERE source_id = ?1 AND topology = 'tree' AND deleted_at IS NULL",
            params![parent_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORK_ITEM_COLUMNS} FROM work_items w
             WHERE w.id IN (
                 SELECT target_id FROM work_item_links
                 WHERE source_id = ?1 AND topology = 'tree' AND deleted_at IS NULL
             )
             ORDER BY w.execution_order
             LIMIT ?2 OFFSET ?3"
        ))?;
        let children = stmt
            .query_map(
                params![parent_id, page.sql_limit(), page.sql_offset()],
                row_to_work_item,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::trace!(parent = %parent_id, total, returned = children.len(), "children listed");
        Ok((children, count(total)))
    }

    /// Get the parent of a work item, if it has one.
    ///
    /// When the item is a child under several tree link types the oldest
    /// link wins.
    pub fn parent_of(&self, work_item_id: &str) -> Result<Option<WorkItem>> {
        load_work_item(&self.conn, work_item_id)?;

        let parent = self
            .conn
            .query_row(
                &format!(
                    "SELECT {WORK_ITEM_COLUMNS} FROM work_items w
                     JOIN work_item_links l ON l.source_id = w.id
                     WHERE l.target_id = ?1 AND l.topology = 'tree' AND l.deleted_at IS NULL
                     ORDER BY l.created_at, l.id
                     LIMIT 1"
                ),
                params![work_item_id],
                row_to_work_item,
            )
            .optional()?;
        Ok(parent)
    }
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod tests;
