// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Work item operations.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::iterations::load_iteration;
use super::spaces::load_space;
use super::{
    begin_write, count, ensure_updated, ensure_version, parse_db, parse_timestamp, Database,
};
use crate::error::{Error, Result};
use crate::id::{generate_id, WORK_ITEM_PREFIX};
use crate::order::OrderKey;
use crate::work_item::{Fields, Page, WorkItem};

/// Work item columns, qualified with the `w` alias.
pub(crate) const WORK_ITEM_COLUMNS: &str =
    "w.id, w.space_id, w.type_id, w.version, w.execution_order, w.fields, w.created_at, w.updated_at";

/// Map a row to a WorkItem.
///
/// Expected columns: [`WORK_ITEM_COLUMNS`]
pub(crate) fn row_to_work_item(row: &rusqlite::Row) -> rusqlite::Result<WorkItem> {
    let order_str: String = row.get(4)?;
    let fields_str: String = row.get(5)?;
    let created_str: String = row.get(6)?;
    let updated_str: String = row.get(7)?;
    let fields: Fields = serde_json::from_str(&fields_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(WorkItem {
        id: row.get(0)?,
        space_id: row.get(1)?,
        type_id: row.get(2)?,
        version: row.get(3)?,
        execution_order: parse_db(&order_str, "execution_order")?,
        fields,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

/// Load a work item, failing with NotFound if it does not exist.
pub(crate) fn load_work_item(conn: &Connection, id: &str) -> Result<WorkItem> {
    conn.query_row(
        &format!("SELECT {WORK_ITEM_COLUMNS} FROM work_items w WHERE w.id = ?1"),
        params![id],
        row_to_work_item,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("work item", id))
}

/// Returns the greatest order key in a space.
pub(crate) fn last_order_key(conn: &Connection, space_id: &str) -> Result<Option<OrderKey>> {
    let key: Option<String> = conn.query_row(
        "SELECT MAX(execution_order) FROM work_items WHERE space_id = ?1",
        params![space_id],
        |row| row.get(0),
    )?;
    key.map(|k| k.parse()).transpose()
}

/// Checks that an iteration referenced by `fields` lives in the item's space.
fn check_iteration_field(conn: &Connection, space_id: &str, fields: &Fields) -> Result<()> {
    let Some(value) = fields.get(crate::work_item::fields::ITERATION) else {
        return Ok(());
    };
    let iteration_id = value.as_str().ok_or_else(|| {
        Error::InvalidInput(format!(
            "{} must be an iteration id",
            crate::work_item::fields::ITERATION
        ))
    })?;
    let iteration = load_iteration(conn, iteration_id)?;
    if iteration.space_id != space_id {
        return Err(Error::InvalidInput(format!(
            "iteration {iteration_id} belongs to another space"
        )));
    }
    Ok(())
}

impl Database {
    /// Create a work item at the end of its space's list.
    pub fn create_work_item(
        &mut self,
        space_id: &str,
        type_id: &str,
        fields: Fields,
    ) -> Result<WorkItem> {
        if type_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "work item type cannot be empty".to_string(),
            ));
        }

        let tx = begin_write(&mut self.conn)?;
        load_space(&tx, space_id)?;
        check_iteration_field(&tx, space_id, &fields)?;

        let now = Utc::now();
        let item = WorkItem {
            id: generate_id(WORK_ITEM_PREFIX, space_id, &now),
            space_id: space_id.to_string(),
            type_id: type_id.to_string(),
            version: 0,
            execution_order: OrderKey::after(last_order_key(&tx, space_id)?.as_ref())?,
            fields,
            created_at: now,
            updated_at: now,
        };

        tx.execute(
            "INSERT INTO work_items (id, space_id, type_id, version, execution_order, fields, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                item.id,
                item.space_id,
                item.type_id,
                item.version,
                item.execution_order.as_str(),
                serde_json::to_string(&item.fields)?,
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        tracing::debug!(work_item = %item.id, space = %item.space_id, order = %item.execution_order, "work item created");
        Ok(item)
    }

    /// Get a work item by ID.
    pub fn get_work_item(&self, id: &str) -> Result<WorkItem> {
        load_work_item(&self.conn, id)
    }

    /// Save a work item's type and fields.
    ///
    /// The execution order is left untouched; use
    /// [`reorder_work_items`](Self::reorder_work_items) to move items.
    pub fn update_work_item(&mut self, item: &WorkItem) -> Result<WorkItem> {
        if item.type_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "work item type cannot be empty".to_string(),
            ));
        }

        let tx = begin_write(&mut self.conn)?;
        let current = load_work_item(&tx, &item.id)?;
        ensure_version("work item", &item.id, item.version, current.version)?;
        check_iteration_field(&tx, &current.space_id, &item.fields)?;

        let affected = tx.execute(
            "UPDATE work_items SET type_id = ?1, fields = ?2, version = version + 1, updated_at = ?3
             WHERE id = ?4 AND version = ?5",
            params![
                item.type_id,
                serde_json::to_string(&item.fields)?,
                Utc::now().to_rfc3339(),
                item.id,
                item.version,
            ],
        )?;
        ensure_updated(affected, "work item", &item.id)?;
        let updated = load_work_item(&tx, &item.id)?;
        tx.commit()?;

        tracing::debug!(work_item = %updated.id, version = updated.version, "work item updated");
        Ok(updated)
    }

    /// Delete a work item and every link touching it.
    pub fn delete_work_item(&mut self, id: &str, version: i64) -> Result<()> {
        let tx = begin_write(&mut self.conn)?;
        let current = load_work_item(&tx, id)?;
        ensure_version("work item", id, version, current.version)?;

        let links = tx.execute(
            "DELETE FROM work_item_links WHERE source_id = ?1 OR target_id = ?1",
            params![id],
        )?;
        let affected = tx.execute(
            "DELETE FROM work_items WHERE id = ?1 AND version = ?2",
            params![id, version],
        )?;
        ensure_updated(affected, "work item", id)?;
        tx.commit()?;

        tracing::debug!(work_item = %id, links, "work item deleted");
        Ok(())
    }

    /// List a space's work items in execution order, with the total count.
    pub fn list_work_items(&self, space_id: &str, page: Page) -> Result<(Vec<WorkItem>, u64)> {
        load_space(&self.conn, space_id)?;

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM work_items WHERE space_id = ?1",
            params![space_id],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORK_ITEM_COLUMNS} FROM work_items w
             WHERE w.space_id = ?1
             ORDER BY w.execution_order
             LIMIT ?2 OFFSET ?3"
        ))?;
        let items = stmt
            .query_map(
                params![space_id, page.sql_limit(), page.sql_offset()],
                row_to_work_item,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok((items, count(total)))
    }
}

#[cfg(test)]
#[path = "work_items_tests.rs"]
mod tests;
