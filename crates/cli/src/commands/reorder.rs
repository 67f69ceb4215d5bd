// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use wit_core::{Database, Direction, Placement, VersionedId, WorkItem};

use crate::cli::OutputFormat;
use crate::display::format_item_line;
use crate::error::Result;

use super::{open_db, parse_versioned};

pub fn run(direction: &str, ids: &[String], output: OutputFormat) -> Result<()> {
    let (mut db, _, _) = open_db()?;
    let direction: Direction = direction.parse()?;
    run_impl(&mut db, direction, ids, output)?;
    Ok(())
}

/// Pins each `ID` or `ID@VERSION` to a version, reading the stored one for bare IDs.
pub(crate) fn versioned_ids(db: &Database, raw: &[String]) -> Result<Vec<VersionedId>> {
    raw.iter()
        .map(|raw| {
            let (id, version) = parse_versioned(raw)?;
            let version = match version {
                Some(version) => version,
                None => db.get_work_item(&id)?.version,
            };
            Ok(VersionedId { id, version })
        })
        .collect()
}

/// Moves work items. For `above` and `below` the first ID is the reference item.
pub(crate) fn run_impl(
    db: &mut Database,
    direction: Direction,
    ids: &[String],
    output: OutputFormat,
) -> Result<Vec<WorkItem>> {
    let (reference, moved) = match direction {
        Direction::Above | Direction::Below => match ids.split_first() {
            Some((reference, rest)) => (Some(parse_versioned(reference)?.0), rest),
            None => (None, ids),
        },
        Direction::Top | Direction::Bottom => (None, ids),
    };
    let placement = Placement::new(direction, reference)?;
    let items = versioned_ids(db, moved)?;

    let updated = db.reorder_work_items(&items, &placement)?;
    tracing::debug!(count = updated.len(), direction = %direction, "work items reordered");

    match output {
        OutputFormat::Text => {
            let target = placement
                .reference()
                .map_or_else(String::new, |id| format!(" {}", id));
            println!("Moved {} item(s) {}{}", updated.len(), direction, target);
            for item in &updated {
                println!("{}", format_item_line(item));
            }
        }
        OutputFormat::Id => {
            for item in &updated {
                println!("{}", item.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
    }
    Ok(updated)
}

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod tests;
