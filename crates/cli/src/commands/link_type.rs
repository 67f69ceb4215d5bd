// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;

use wit_core::{Database, LinkType, NewLinkType, Space, Topology};

use crate::cli::{LinkTypeCommand, OutputFormat, VersionArgs};
use crate::display::format_link_type_line;
use crate::error::{Error, Result};

use super::{open_db, resolve_category, resolve_link_type, resolve_space};

/// Changes requested by `wit link-type edit`.
#[derive(Debug, Default)]
pub(crate) struct LinkTypeEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub topology: Option<String>,
    pub forward: Option<String>,
    pub reverse: Option<String>,
    pub description: Option<String>,
}

impl LinkTypeEdit {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.topology.is_none()
            && self.forward.is_none()
            && self.reverse.is_none()
            && self.description.is_none()
    }
}

pub fn run(command: LinkTypeCommand, selector: Option<String>) -> Result<()> {
    let (mut db, config, _) = open_db()?;
    let space = resolve_space(&db, &config, selector.as_deref())?;
    match command {
        LinkTypeCommand::New {
            name,
            category,
            topology,
            forward,
            reverse,
            description,
            output,
        } => {
            let category = resolve_category(&db, &category)?;
            let topology: Topology = topology.parse()?;
            let mut new_type = NewLinkType::new(name, topology, category.id, &space.id);
            if forward.is_some() || reverse.is_some() {
                let forward = forward.unwrap_or_else(|| new_type.forward_name.clone());
                let reverse = reverse.unwrap_or_else(|| new_type.reverse_name.clone());
                new_type = new_type.with_names(forward, reverse);
            }
            if let Some(description) = description {
                new_type = new_type.with_description(description);
            }
            new_impl(&mut db, &new_type, output.output)?;
        }
        LinkTypeCommand::List { output } => list_impl(&db, &space, output.output)?,
        LinkTypeCommand::Edit {
            link_type,
            name,
            category,
            topology,
            forward,
            reverse,
            description,
            version,
        } => {
            let edit = LinkTypeEdit {
                name,
                category,
                topology,
                forward,
                reverse,
                description,
            };
            edit_impl(&mut db, &space, &link_type, edit, version)?;
        }
        LinkTypeCommand::Delete { link_type, version } => {
            delete_impl(&mut db, &space, &link_type, version)?;
        }
    }
    Ok(())
}

pub(crate) fn new_impl(
    db: &mut Database,
    new_type: &NewLinkType,
    output: OutputFormat,
) -> Result<LinkType> {
    let link_type = db.create_link_type(new_type)?;
    match output {
        OutputFormat::Text => println!(
            "Created link type {}: {} ({})",
            link_type.id, link_type.name, link_type.topology
        ),
        OutputFormat::Id => println!("{}", link_type.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&link_type)?),
    }
    Ok(link_type)
}

pub(crate) fn list_impl(db: &Database, space: &Space, output: OutputFormat) -> Result<()> {
    let link_types = db.list_link_types(&space.id)?;
    match output {
        OutputFormat::Text => {
            if link_types.is_empty() {
                println!("No link types in {}", space.name);
            }
            let categories: BTreeMap<_, _> = db
                .list_link_categories()?
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect();
            for link_type in &link_types {
                println!(
                    "{}",
                    format_link_type_line(link_type, categories.get(&link_type.link_category_id))
                );
            }
        }
        OutputFormat::Id => {
            for link_type in &link_types {
                println!("{}", link_type.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&link_types)?),
    }
    Ok(())
}

pub(crate) fn edit_impl(
    db: &mut Database,
    space: &Space,
    selector: &str,
    edit: LinkTypeEdit,
    version: VersionArgs,
) -> Result<LinkType> {
    if edit.is_empty() {
        return Err(Error::NothingToUpdate);
    }
    let mut link_type = resolve_link_type(db, &space.id, selector)?;
    if let Some(name) = edit.name {
        link_type.name = name;
    }
    if let Some(category) = edit.category {
        link_type.link_category_id = resolve_category(db, &category)?.id;
    }
    if let Some(topology) = edit.topology {
        link_type.topology = topology.parse()?;
    }
    if let Some(forward) = edit.forward {
        link_type.forward_name = forward;
    }
    if let Some(reverse) = edit.reverse {
        link_type.reverse_name = reverse;
    }
    if let Some(description) = edit.description {
        link_type.description = Some(description).filter(|d| !d.is_empty());
    }
    link_type.version = version.or(link_type.version);

    let updated = db.update_link_type(&link_type)?;
    println!(
        "Updated link type {}: {} ({})",
        updated.id, updated.name, updated.topology
    );
    Ok(updated)
}

pub(crate) fn delete_impl(
    db: &mut Database,
    space: &Space,
    selector: &str,
    version: VersionArgs,
) -> Result<()> {
    let link_type = resolve_link_type(db, &space.id, selector)?;
    db.delete_link_type(&link_type.id, version.or(link_type.version))?;
    println!("Deleted link type {}: {}", link_type.id, link_type.name);
    Ok(())
}

#[cfg(test)]
#[path = "link_type_tests.rs"]
mod tests;
