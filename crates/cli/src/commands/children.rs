// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use wit_core::{Database, Page, WorkItem};

use crate::cli::OutputFormat;
use crate::display::format_item_line;
use crate::error::Result;

use super::open_db;

pub fn run(id: &str, page: Page, output: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    run_impl(&db, id, page, output)?;
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(
    db: &Database,
    id: &str,
    page: Page,
    output: OutputFormat,
) -> Result<(Vec<WorkItem>, u64)> {
    let (children, total) = db.list_children(id, page)?;
    match output {
        OutputFormat::Text => {
            if total == 0 {
                println!("No children for {}", id);
            }
            for child in &children {
                println!("{}", format_item_line(child));
            }
            if (children.len() as u64) < total {
                println!("\n(showing {} of {})", children.len(), total);
            }
        }
        OutputFormat::Id => {
            for child in &children {
                println!("{}", child.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&children)?),
    }
    Ok((children, total))
}

#[cfg(test)]
#[path = "children_tests.rs"]
mod tests;
