// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Iteration tree and lifecycle operations.
//!
//! The lifecycle is `new -> start -> close`. The root iteration of a space
//! never starts, and at most one iteration per space is started at a time.
//! Creating and editing iterations is reserved to the space owner; callers
//! pass the result of [`Space::is_owned_by`](crate::Space::is_owned_by).

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::spaces::load_space;
use super::{
    begin_write, count, ensure_updated, ensure_version, map_constraint, parse_db,
    parse_timestamp, parse_timestamp_opt, Database,
};
use crate::error::{Error, Result};
use crate::id::{generate_id, ITERATION_PREFIX};
use crate::iteration::{check_date_range, Iteration, IterationState, NewIteration, WorkItemCounts};

const ITERATION_COLUMNS: &str = "id, space_id, name, description, path, state, start_at, end_at, \
     version, created_at, updated_at";

fn row_to_iteration(row: &rusqlite::Row) -> rusqlite::Result<Iteration> {
    let path_str: String = row.get(4)?;
    let state_str: String = row.get(5)?;
    let created_str: String = row.get(9)?;
    let updated_str: String = row.get(10)?;
    Ok(Iteration {
        id: row.get(0)?,
        space_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        path: parse_db(&path_str, "path")?,
        state: parse_db(&state_str, "state")?,
        start_at: parse_timestamp_opt(row.get(6)?, "start_at")?,
        end_at: parse_timestamp_opt(row.get(7)?, "end_at")?,
        version: row.get(8)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

/// Load an iteration, failing with NotFound if it does not exist.
pub(crate) fn load_iteration(conn: &Connection, id: &str) -> Result<Iteration> {
    conn.query_row(
        &format!("SELECT {ITERATION_COLUMNS} FROM iterations WHERE id = ?1"),
        params![id],
        row_to_iteration,
    )
    .optional()?
    .ok_or_else(|| Error::not_found("iteration", id))
}

fn query_iterations(
    conn: &Connection,
    filter: &str,
    args: impl rusqlite::Params,
) -> Result<Vec<Iteration>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITERATION_COLUMNS} FROM iterations WHERE {filter} ORDER BY path, name"
    ))?;
    let iterations = stmt
        .query_map(args, row_to_iteration)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(iterations)
}

fn check_owner(is_owner: bool, action: &str) -> Result<()> {
    if !is_owner {
        tracing::warn!(action, "non-owner rejected");
        return Err(Error::Forbidden(action.to_string()));
    }
    Ok(())
}

/// Checks a state change of `current` against the lifecycle rules.
fn check_transition(conn: &Connection, current: &Iteration, target: IterationState) -> Result<()> {
    if target == IterationState::Start && current.is_root() {
        return Err(Error::RootIterationStart(current.name.clone()));
    }
    if !current.state.can_transition_to(target) {
        return Err(Error::InvalidTransition {
            from: current.state.to_string(),
            to: target.to_string(),
        });
    }
    if target == IterationState::Start {
        if let Some(name) = active_iteration(conn, &current.space_id, &current.id)? {
            return Err(Error::IterationAlreadyActive(name));
        }
    }
    Ok(())
}

/// Name of the started iteration in `space_id`, other than `exclude`.
fn active_iteration(
    conn: &Connection,
    space_id: &str,
    exclude: &str,
) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT name FROM iterations WHERE space_id = ?1 AND state = 'start' AND id != ?2",
            params![space_id, exclude],
            |row| row.get(0),
        )
        .optional()?)
}

/// Translates iteration index violations that slipped past validation.
fn iteration_constraint<'a>(
    conn: &'a Connection,
    iteration: &'a Iteration,
) -> impl FnOnce(&str) -> Option<Error> + 'a {
    move |msg| {
        if msg.contains("iterations.name") {
            Some(Error::DuplicateName {
                entity: "iteration",
                name: iteration.name.clone(),
            })
        } else if msg.contains("iterations.space_id") {
            active_iteration(conn, &iteration.space_id, &iteration.id)
                .ok()
                .flatten()
                .map(Error::IterationAlreadyActive)
        } else {
            None
        }
    }
}

fn opt_rfc3339(value: Option<chrono::DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

impl Database {
    /// Create an iteration under `parent_id`.
    pub fn create_child_iteration(
        &mut self,
        parent_id: &str,
        new: &NewIteration,
        is_owner: bool,
    ) -> Result<Iteration> {
        check_owner(is_owner, "create iterations")?;
        self.config.validate_name("iteration name", &new.name)?;
        check_date_range(new.start_at, new.end_at)?;

        let tx = begin_write(&mut self.conn)?;
        let parent = load_iteration(&tx, parent_id)?;

        let now = Utc::now();
        let iteration = Iteration {
            id: generate_id(ITERATION_PREFIX, &new.name, &now),
            space_id: parent.space_id.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            path: parent.path.child(&parent.id),
            state: IterationState::New,
            start_at: new.start_at,
            end_at: new.end_at,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        map_constraint(
            tx.execute(
                "INSERT INTO iterations (id, space_id, name, description, path, state, start_at,
                                         end_at, version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    iteration.id,
                    iteration.space_id,
                    iteration.name,
                    iteration.description,
                    iteration.path.to_string(),
                    iteration.state.as_str(),
                    opt_rfc3339(iteration.start_at),
                    opt_rfc3339(iteration.end_at),
                    iteration.version,
                    iteration.created_at.to_rfc3339(),
                    iteration.updated_at.to_rfc3339(),
                ],
            ),
            iteration_constraint(&tx, &iteration),
        )?;
        tx.commit()?;

        tracing::debug!(iteration = %iteration.id, parent = %parent.id, path = %iteration.path, "iteration created");
        Ok(iteration)
    }

    /// Get an iteration by ID.
    pub fn get_iteration(&self, id: &str) -> Result<Iteration> {
        load_iteration(&self.conn, id)
    }

    /// Get the root iteration of a space.
    pub fn root_iteration(&self, space_id: &str) -> Result<Iteration> {
        load_space(&self.conn, space_id)?;
        query_iterations(&self.conn, "space_id = ?1 AND path = '/'", params![space_id])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::CorruptedData(format!("space {space_id} has no root iteration")))
    }

    /// List every iteration of a space, parents before children.
    pub fn list_iterations(&self, space_id: &str) -> Result<Vec<Iteration>> {
        load_space(&self.conn, space_id)?;
        query_iterations(&self.conn, "space_id = ?1", params![space_id])
    }

    /// List the direct children of an iteration ordered by name.
    pub fn child_iterations(&self, id: &str) -> Result<Vec<Iteration>> {
        let parent = load_iteration(&self.conn, id)?;
        query_iterations(
            &self.conn,
            "space_id = ?1 AND path = ?2",
            params![parent.space_id, parent.path.child(&parent.id).to_string()],
        )
    }

    /// Render the names of an iteration's ancestors as a path.
    ///
    /// The root resolves to the bare separator; a child of the root resolves
    /// to the separator followed by the root's name.
    pub fn resolved_path(&self, iteration: &Iteration) -> Result<String> {
        let separator = &self.config.path_separator;
        let mut resolved = String::new();
        for id in iteration.path.ids() {
            resolved.push_str(separator);
            resolved.push_str(&load_iteration(&self.conn, id)?.name);
        }
        if resolved.is_empty() {
            resolved.push_str(separator);
        }
        Ok(resolved)
    }

    /// Move an iteration through its lifecycle.
    pub fn update_iteration_state(
        &mut self,
        iteration: &Iteration,
        state: IterationState,
    ) -> Result<Iteration> {
        let tx = begin_write(&mut self.conn)?;
        let current = load_iteration(&tx, &iteration.id)?;
        ensure_version("iteration", &iteration.id, iteration.version, current.version)?;
        check_transition(&tx, &current, state)?;

        let affected = map_constraint(
            tx.execute(
                "UPDATE iterations SET state = ?1, version = version + 1, updated_at = ?2
                 WHERE id = ?3 AND version = ?4",
                params![
                    state.as_str(),
                    Utc::now().to_rfc3339(),
                    iteration.id,
                    iteration.version
                ],
            ),
            iteration_constraint(&tx, &current),
        )?;
        ensure_updated(affected, "iteration", &iteration.id)?;
        let updated = load_iteration(&tx, &iteration.id)?;
        tx.commit()?;

        tracing::debug!(iteration = %updated.id, from = %current.state, to = %updated.state, "iteration state changed");
        Ok(updated)
    }

    /// Save an iteration's name, description, dates and state.
    ///
    /// The space and path are fixed at creation.
    pub fn update_iteration(&mut self, iteration: &Iteration, is_owner: bool) -> Result<Iteration> {
        check_owner(is_owner, "update iterations")?;
        self.config.validate_name("iteration name", &iteration.name)?;
        check_date_range(iteration.start_at, iteration.end_at)?;

        let tx = begin_write(&mut self.conn)?;
        let current = load_iteration(&tx, &iteration.id)?;
        ensure_version("iteration", &iteration.id, iteration.version, current.version)?;
        if current.space_id != iteration.space_id || current.path != iteration.path {
            return Err(Error::InvalidInput(format!(
                "iteration {} cannot be moved",
                iteration.id
            )));
        }
        if current.state != iteration.state {
            check_transition(&tx, &current, iteration.state)?;
        }

        let affected = map_constraint(
            tx.execute(
                "UPDATE iterations
                 SET name = ?1, description = ?2, start_at = ?3, end_at = ?4, state = ?5,
                     version = version + 1, updated_at = ?6
                 WHERE id = ?7 AND version = ?8",
                params![
                    iteration.name,
                    iteration.description,
                    opt_rfc3339(iteration.start_at),
                    opt_rfc3339(iteration.end_at),
                    iteration.state.as_str(),
                    Utc::now().to_rfc3339(),
                    iteration.id,
                    iteration.version,
                ],
            ),
            iteration_constraint(&tx, iteration),
        )?;
        ensure_updated(affected, "iteration", &iteration.id)?;
        let updated = load_iteration(&tx, &iteration.id)?;
        tx.commit()?;

        tracing::debug!(iteration = %updated.id, version = updated.version, "iteration updated");
        Ok(updated)
    }

    /// Count the work items planned in an iteration.
    pub fn iteration_counts(&self, iteration_id: &str) -> Result<WorkItemCounts> {
        load_iteration(&self.conn, iteration_id)?;

        let (total, closed): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(json_extract(fields, '$.\"system.state\"') = 'closed'), 0)
             FROM work_items
             WHERE json_extract(fields, '$.\"system.iteration\"') = ?1",
            params![iteration_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(WorkItemCounts {
            total: count(total),
            closed: count(closed),
        })
    }

    /// Count the work items of every iteration in a space, keyed by iteration ID.
    pub fn iteration_counts_for_space(
        &self,
        space_id: &str,
    ) -> Result<BTreeMap<String, WorkItemCounts>> {
        load_space(&self.conn, space_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT i.id,
                    COUNT(w.id),
                    COALESCE(SUM(json_extract(w.fields, '$.\"system.state\"') = 'closed'), 0)
             FROM iterations i
             LEFT JOIN work_items w ON json_extract(w.fields, '$.\"system.iteration\"') = i.id
             WHERE i.space_id = ?1
             GROUP BY i.id",
        )?;
        let rows = stmt
            .query_map(params![space_id], |row| {
                let id: String = row.get(0)?;
                let total: i64 = row.get(1)?;
                let closed: i64 = row.get(2)?;
                Ok((id, total, closed))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .map(|(id, total, closed)| {
                (
                    id,
                    WorkItemCounts {
                        total: count(total),
                        closed: count(closed),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "iterations_tests.rs"]
mod tests;
