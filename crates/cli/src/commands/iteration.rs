// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use wit_core::{Database, Iteration, IterationState, NewIteration, WorkItemCounts};

use crate::cli::{IterationCommand, OutputFormat, VersionArgs};
use crate::display::format_iteration_line;
use crate::error::{Error, Result};
use crate::identity::resolve_actor;

use super::{open_db, parse_date, resolve_space};

/// An iteration with its resolved path and work item counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct IterationView {
    #[serde(flatten)]
    pub iteration: Iteration,
    pub resolved_path: String,
    pub counts: WorkItemCounts,
}

impl IterationView {
    pub fn build(db: &Database, iteration: Iteration) -> Result<Self> {
        let counts = db.iteration_counts(&iteration.id)?;
        Ok(IterationView {
            resolved_path: db.resolved_path(&iteration)?,
            iteration,
            counts,
        })
    }
}

/// Builds views for iterations of one space with a single count query.
pub(crate) fn build_iteration_views(
    db: &Database,
    iterations: Vec<Iteration>,
) -> Result<Vec<IterationView>> {
    let Some(space_id) = iterations.first().map(|i| i.space_id.clone()) else {
        return Ok(Vec::new());
    };
    let counts = db.iteration_counts_for_space(&space_id)?;
    iterations
        .into_iter()
        .map(|iteration| {
            Ok(IterationView {
                resolved_path: db.resolved_path(&iteration)?,
                counts: counts.get(&iteration.id).copied().unwrap_or_default(),
                iteration,
            })
        })
        .collect()
}

/// Changes requested by `wit iteration edit`.
#[derive(Debug, Default)]
pub(crate) struct IterationEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl IterationEdit {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }
}

pub fn run(command: IterationCommand, selector: Option<String>) -> Result<()> {
    let (mut db, config, _) = open_db()?;
    let actor = resolve_actor(&config);
    match command {
        IterationCommand::New {
            name,
            parent,
            description,
            start,
            end,
            output,
        } => {
            let parent = match parent {
                Some(id) => db.get_iteration(&id)?,
                None => {
                    let space = resolve_space(&db, &config, selector.as_deref())?;
                    db.root_iteration(&space.id)?
                }
            };
            let mut new = NewIteration::new(name);
            new.description = description;
            if let (Some(start), Some(end)) = (start, end) {
                new = new.with_dates(parse_date(&start)?, parse_date(&end)?);
            }
            new_impl(&mut db, &parent, &new, &actor, output.output)?;
        }
        IterationCommand::List { output } => {
            let space = resolve_space(&db, &config, selector.as_deref())?;
            list_impl(&db, &space.id, output.output)?;
        }
        IterationCommand::Show { id, output } => {
            show_impl(&db, &id, output.output)?;
        }
        IterationCommand::Start { id, version } => {
            transition_impl(&mut db, &id, IterationState::Start, version)?;
        }
        IterationCommand::Close { id, version } => {
            transition_impl(&mut db, &id, IterationState::Close, version)?;
        }
        IterationCommand::Edit {
            id,
            name,
            description,
            start,
            end,
            version,
        } => {
            let edit = IterationEdit {
                name,
                description,
                start,
                end,
            };
            edit_impl(&mut db, &id, edit, &actor, version)?;
        }
    }
    Ok(())
}

/// Returns true if `actor` owns the space `iteration` belongs to.
fn owns(db: &Database, iteration: &Iteration, actor: &str) -> Result<bool> {
    Ok(db.get_space(&iteration.space_id)?.is_owned_by(actor))
}

pub(crate) fn new_impl(
    db: &mut Database,
    parent: &Iteration,
    new: &NewIteration,
    actor: &str,
    output: OutputFormat,
) -> Result<Iteration> {
    let is_owner = owns(db, parent, actor)?;
    let iteration = db.create_child_iteration(&parent.id, new, is_owner)?;
    match output {
        OutputFormat::Text => {
            println!(
                "Created iteration {}: {} in {}",
                iteration.id,
                iteration.name,
                db.resolved_path(&iteration)?
            );
        }
        OutputFormat::Id => println!("{}", iteration.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&iteration)?),
    }
    Ok(iteration)
}

pub(crate) fn list_impl(db: &Database, space_id: &str, output: OutputFormat) -> Result<()> {
    let views = build_iteration_views(db, db.list_iterations(space_id)?)?;
    match output {
        OutputFormat::Text => {
            for view in &views {
                let indent = "  ".repeat(view.iteration.path.ids().len());
                println!(
                    "{}{}",
                    indent,
                    format_iteration_line(&view.iteration, &view.resolved_path, view.counts)
                );
            }
        }
        OutputFormat::Id => {
            for view in &views {
                println!("{}", view.iteration.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
    }
    Ok(())
}

pub(crate) fn show_impl(db: &Database, id: &str, output: OutputFormat) -> Result<IterationView> {
    let view = IterationView::build(db, db.get_iteration(id)?)?;
    match output {
        OutputFormat::Text => {
            let iteration = &view.iteration;
            println!("{}: {}", iteration.id, iteration.name);
            println!("Path: {}", view.resolved_path);
            println!("State: {}", iteration.state);
            if let Some(description) = &iteration.description {
                println!("Description: {}", description);
            }
            if let (Some(start), Some(end)) = (iteration.start_at, iteration.end_at) {
                println!(
                    "Dates: {} - {}",
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                );
            }
            println!(
                "Work items: {} total, {} closed, {} open",
                view.counts.total,
                view.counts.closed,
                view.counts.open()
            );
            let children = db.child_iterations(id)?;
            if !children.is_empty() {
                println!();
                println!("Children:");
                for child in children {
                    println!("  - ({}) {}: {}", child.state, child.id, child.name);
                }
            }
        }
        OutputFormat::Id => println!("{}", view.iteration.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(view)
}

pub(crate) fn transition_impl(
    db: &mut Database,
    id: &str,
    target: IterationState,
    version: VersionArgs,
) -> Result<Iteration> {
    let mut iteration = db.get_iteration(id)?;
    let from = iteration.state;
    iteration.version = version.or(iteration.version);
    let updated = db.update_iteration_state(&iteration, target)?;
    println!("{}: {} -> {}", updated.id, from, updated.state);
    Ok(updated)
}

pub(crate) fn edit_impl(
    db: &mut Database,
    id: &str,
    edit: IterationEdit,
    actor: &str,
    version: VersionArgs,
) -> Result<Iteration> {
    if edit.is_empty() {
        return Err(Error::NothingToUpdate);
    }
    let mut iteration = db.get_iteration(id)?;
    if let Some(name) = edit.name {
        iteration.name = name;
    }
    if let Some(description) = edit.description {
        iteration.description = Some(description).filter(|d| !d.is_empty());
    }
    if let Some(start) = edit.start {
        iteration.start_at = Some(parse_date(&start)?);
    }
    if let Some(end) = edit.end {
        iteration.end_at = Some(parse_date(&end)?);
    }
    iteration.version = version.or(iteration.version);

    let is_owner = owns(db, &iteration, actor)?;
    let updated = db.update_iteration(&iteration, is_owner)?;
    println!("Updated iteration {}: {}", updated.id, updated.name);
    Ok(updated)
}

#[cfg(test)]
#[path = "iteration_tests.rs"]
mod tests;
