// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serde::Serialize;
use wit_core::{Database, Space};

use crate::cli::{OutputFormat, SpaceCommand};
use crate::config::Config;
use crate::display::{format_iteration_line, format_space_line};
use crate::error::Result;
use crate::identity::resolve_actor;

use super::iteration::{build_iteration_views, IterationView};
use super::{open_db, resolve_space};

#[derive(Serialize)]
struct SpaceDetails {
    #[serde(flatten)]
    space: Space,
    iterations: Vec<IterationView>,
}

pub fn run(command: SpaceCommand, selector: Option<String>) -> Result<()> {
    let (mut db, mut config, work_dir) = open_db()?;
    match command {
        SpaceCommand::New {
            name,
            description,
            output,
        } => {
            let actor = resolve_actor(&config);
            new_impl(&mut db, &name, description.as_deref(), &actor, output.output)?;
        }
        SpaceCommand::List { output } => list_impl(&db, output.output)?,
        SpaceCommand::Show { output } => {
            let space = resolve_space(&db, &config, selector.as_deref())?;
            show_impl(&db, &space, output.output)?;
        }
        SpaceCommand::Use { name } => {
            use_impl(&db, &mut config, &work_dir, &name)?;
        }
    }
    Ok(())
}

pub(crate) fn new_impl(
    db: &mut Database,
    name: &str,
    description: Option<&str>,
    actor: &str,
    output: OutputFormat,
) -> Result<Space> {
    let space = db.create_space(name, description, actor)?;
    match output {
        OutputFormat::Text => println!("Created space {}: {}", space.id, space.name),
        OutputFormat::Id => println!("{}", space.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&space)?),
    }
    Ok(space)
}

pub(crate) fn list_impl(db: &Database, output: OutputFormat) -> Result<()> {
    let spaces = db.list_spaces()?;
    match output {
        OutputFormat::Text => {
            if spaces.is_empty() {
                println!("No spaces");
            }
            for space in &spaces {
                println!("{}", format_space_line(space));
            }
        }
        OutputFormat::Id => {
            for space in &spaces {
                println!("{}", space.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&spaces)?),
    }
    Ok(())
}

pub(crate) fn show_impl(db: &Database, space: &Space, output: OutputFormat) -> Result<()> {
    let iterations = build_iteration_views(db, db.list_iterations(&space.id)?)?;
    match output {
        OutputFormat::Text => {
            println!("{}: {}", space.id, space.name);
            if let Some(description) = &space.description {
                println!("Description: {}", description);
            }
            println!("Owner: {}", space.owner_id);
            println!();
            println!("Iterations:");
            for view in &iterations {
                println!(
                    "  {}",
                    format_iteration_line(&view.iteration, &view.resolved_path, view.counts)
                );
            }
        }
        OutputFormat::Id => println!("{}", space.id),
        OutputFormat::Json => {
            let details = SpaceDetails {
                space: space.clone(),
                iterations,
            };
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
    }
    Ok(())
}

/// Records `name` as the project's default space.
pub(crate) fn use_impl(
    db: &Database,
    config: &mut Config,
    work_dir: &Path,
    name: &str,
) -> Result<Space> {
    let space = resolve_space(db, config, Some(name))?;
    config.default_space = Some(space.id.clone());
    config.save(work_dir)?;
    println!("Default space: {} ({})", space.name, space.id);
    Ok(space)
}

#[cfg(test)]
#[path = "space_tests.rs"]
mod tests;
