// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use wit_core::{Database, LinkCategory};

use crate::cli::{CategoryCommand, OutputFormat};
use crate::display::format_category_line;
use crate::error::Result;

use super::open_db;

pub fn run(command: CategoryCommand) -> Result<()> {
    let (mut db, _, _) = open_db()?;
    match command {
        CategoryCommand::New {
            name,
            description,
            output,
        } => {
            new_impl(&mut db, &name, description.as_deref(), output.output)?;
        }
        CategoryCommand::List { output } => {
            list_impl(&db, output.output)?;
        }
    }
    Ok(())
}

pub(crate) fn new_impl(
    db: &mut Database,
    name: &str,
    description: Option<&str>,
    output: OutputFormat,
) -> Result<LinkCategory> {
    let category = db.create_link_category(name, description)?;
    match output {
        OutputFormat::Text => println!("Created category {}: {}", category.id, category.name),
        OutputFormat::Id => println!("{}", category.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&category)?),
    }
    Ok(category)
}

pub(crate) fn list_impl(db: &Database, output: OutputFormat) -> Result<Vec<LinkCategory>> {
    let categories = db.list_link_categories()?;
    match output {
        OutputFormat::Text => {
            if categories.is_empty() {
                println!("No link categories");
            }
            for category in &categories {
                println!("{}", format_category_line(category));
            }
        }
        OutputFormat::Id => {
            for category in &categories {
                println!("{}", category.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&categories)?),
    }
    Ok(categories)
}

#[cfg(test)]
#[path = "category_tests.rs"]
mod tests;
