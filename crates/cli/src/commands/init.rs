// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::{Path, PathBuf};

use wit_core::{Database, Space};

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::{Error, Result};
use crate::identity::resolve_actor;

const GITIGNORE: &str = "wit.db\nwit.db-*\n";

pub fn run(space: Option<String>, actor: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let (work_dir, space) = run_impl(&target_path, space, actor)?;

    println!("Initialized wit at {}", work_dir.display());
    println!("Space: {} ({})", space.name, space.id);
    println!("Owner: {}", space.owner_id);
    Ok(())
}

/// Creates `.wit/`, the database and the default space.
pub(crate) fn run_impl(
    target_path: &Path,
    space_name: Option<String>,
    actor: Option<String>,
) -> Result<(PathBuf, Space)> {
    let space_name = match space_name {
        Some(name) => name,
        None => derive_space_name(target_path)?,
    };

    let mut config = Config {
        actor,
        ..Config::default()
    };
    let work_dir = init_work_dir(target_path, &config)?;
    fs::write(work_dir.join(".gitignore"), GITIGNORE)?;

    let owner = match &config.actor {
        Some(actor) => actor.clone(),
        None => resolve_actor(&config),
    };
    let mut db = Database::open_with_config(&get_db_path(&work_dir), config.engine.clone())?;
    let space = db.create_space(&space_name, None, &owner)?;

    config.default_space = Some(space.id.clone());
    config.save(&work_dir)?;

    tracing::info!(space = %space.id, owner = %owner, "initialized project");
    Ok((work_dir, space))
}

fn derive_space_name(path: &Path) -> Result<String> {
    let canonical = path.canonicalize()?;
    canonical
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.trim().is_empty())
        .map(str::to_string)
        .ok_or(Error::NoSpace)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
