// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use serde_json::Value;
use wit_core::fields::{ITERATION, STATE, TITLE};
use wit_core::{Database, Fields, Page, Space, WorkItem};

use crate::cli::{ItemCommand, OutputFormat, VersionArgs};
use crate::display::{format_item_details, format_item_line};
use crate::error::{Error, Result};
use crate::view::{build_all, LinkView};

use super::{open_db, parse_field, resolve_space};

/// A work item with its parent, child flag and links.
#[derive(Debug, Serialize)]
pub(crate) struct ItemDetails {
    #[serde(flatten)]
    pub item: WorkItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<WorkItem>,
    pub has_children: bool,
    pub links: Vec<LinkView>,
}

/// Changes requested by `wit item edit`.
#[derive(Debug, Default)]
pub(crate) struct ItemEdit {
    pub title: Option<String>,
    pub state: Option<String>,
    pub iteration: Option<String>,
    pub type_id: Option<String>,
    pub fields: Vec<String>,
}

impl ItemEdit {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.state.is_none()
            && self.iteration.is_none()
            && self.type_id.is_none()
            && self.fields.is_empty()
    }
}

pub fn run(command: ItemCommand, selector: Option<String>) -> Result<()> {
    let (mut db, config, _) = open_db()?;
    match command {
        ItemCommand::New {
            title,
            type_id,
            iteration,
            fields,
            output,
        } => {
            let space = resolve_space(&db, &config, selector.as_deref())?;
            let fields = build_fields(&title, iteration.as_deref(), &fields)?;
            new_impl(&mut db, &space, &type_id, fields, output.output)?;
        }
        ItemCommand::Show { id, output } => {
            show_impl(&db, &id, output.output)?;
        }
        ItemCommand::List { page, output } => {
            let space = resolve_space(&db, &config, selector.as_deref())?;
            list_impl(&db, &space, page.page(), output.output)?;
        }
        ItemCommand::Edit {
            id,
            title,
            state,
            iteration,
            type_id,
            fields,
            version,
        } => {
            let edit = ItemEdit {
                title,
                state,
                iteration,
                type_id,
                fields,
            };
            edit_impl(&mut db, &id, edit, version)?;
        }
        ItemCommand::Delete { id, version } => delete_impl(&mut db, &id, version)?,
    }
    Ok(())
}

/// Collects the title, iteration and `key=value` fields of a new item.
pub(crate) fn build_fields(title: &str, iteration: Option<&str>, raw: &[String]) -> Result<Fields> {
    let mut fields = Fields::new();
    for field in raw {
        let (key, value) = parse_field(field)?;
        fields.insert(key, value);
    }
    fields.insert(TITLE.to_string(), Value::String(title.to_string()));
    if let Some(iteration) = iteration {
        fields.insert(ITERATION.to_string(), Value::String(iteration.to_string()));
    }
    Ok(fields)
}

pub(crate) fn new_impl(
    db: &mut Database,
    space: &Space,
    type_id: &str,
    fields: Fields,
    output: OutputFormat,
) -> Result<WorkItem> {
    let item = db.create_work_item(&space.id, type_id, fields)?;
    match output {
        OutputFormat::Text => println!("Created [{}] {}: {}", item.type_id, item.id, item.title()),
        OutputFormat::Id => println!("{}", item.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&item)?),
    }
    Ok(item)
}

pub(crate) fn show_impl(db: &Database, id: &str, output: OutputFormat) -> Result<ItemDetails> {
    let item = db.get_work_item(id)?;
    let details = ItemDetails {
        parent: db.parent_of(id)?,
        has_children: db.has_children(id)?,
        links: build_all(db, db.links_for_work_item(id)?)?,
        item,
    };
    match output {
        OutputFormat::Text => println!(
            "{}",
            format_item_details(
                &details.item,
                details.parent.as_ref(),
                details.has_children,
                &details.links
            )
        ),
        OutputFormat::Id => println!("{}", details.item.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
    }
    Ok(details)
}

pub(crate) fn list_impl(
    db: &Database,
    space: &Space,
    page: Page,
    output: OutputFormat,
) -> Result<(Vec<WorkItem>, u64)> {
    let (items, total) = db.list_work_items(&space.id, page)?;
    match output {
        OutputFormat::Text => {
            if total == 0 {
                println!("No work items in {}", space.name);
            }
            for item in &items {
                println!("{}", format_item_line(item));
            }
            if (items.len() as u64) < total {
                println!("\n(showing {} of {})", items.len(), total);
            }
        }
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
    }
    Ok((items, total))
}

pub(crate) fn edit_impl(
    db: &mut Database,
    id: &str,
    edit: ItemEdit,
    version: VersionArgs,
) -> Result<WorkItem> {
    if edit.is_empty() {
        return Err(Error::NothingToUpdate);
    }
    let mut item = db.get_work_item(id)?;
    for field in &edit.fields {
        let (key, value) = parse_field(field)?;
        if value.is_null() {
            item.fields.remove(&key);
        } else {
            item.fields.insert(key, value);
        }
    }
    if let Some(title) = edit.title {
        item.fields.insert(TITLE.to_string(), Value::String(title));
    }
    if let Some(state) = edit.state {
        item.fields.insert(STATE.to_string(), Value::String(state));
    }
    match edit.iteration.as_deref() {
        Some("") => {
            item.fields.remove(ITERATION);
        }
        Some(iteration) => {
            item.fields
                .insert(ITERATION.to_string(), Value::String(iteration.to_string()));
        }
        None => {}
    }
    if let Some(type_id) = edit.type_id {
        item.type_id = type_id;
    }
    item.version = version.or(item.version);

    let updated = db.update_work_item(&item)?;
    println!("Updated {} (version {})", updated.id, updated.version);
    Ok(updated)
}

pub(crate) fn delete_impl(db: &mut Database, id: &str, version: VersionArgs) -> Result<()> {
    let item = db.get_work_item(id)?;
    db.delete_work_item(&item.id, version.or(item.version))?;
    println!("Deleted {}: {}", item.id, item.title());
    Ok(())
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
