// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use wit_core::{Database, Event};

use crate::display::format_event;
use crate::error::Result;

use super::open_db;

pub fn run(id: Option<String>, limit: usize) -> Result<()> {
    let (db, _, _) = open_db()?;
    run_impl(&db, id.as_deref(), limit)?;
    Ok(())
}

/// Internal implementation that accepts db for testing.
///
/// Events are printed newest first. A deleted link keeps its history.
pub(crate) fn run_impl(db: &Database, id: Option<&str>, limit: usize) -> Result<Vec<Event>> {
    let events: Vec<Event> = match id {
        Some(link_id) => db
            .get_events(link_id)?
            .into_iter()
            .rev()
            .take(limit)
            .collect(),
        None => db.get_recent_events(limit)?,
    };

    if events.is_empty() {
        match id {
            Some(link_id) => println!("No events for {}", link_id),
            None => println!("No events"),
        }
    }
    for event in &events {
        println!("{}", format_event(event));
    }
    Ok(events)
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
