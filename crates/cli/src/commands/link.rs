// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use wit_core::Database;

use crate::cli::{LinkCommand, OutputFormat, VersionArgs};
use crate::display::{format_link_details, format_link_from, format_link_line};
use crate::error::{Error, Result};
use crate::identity::resolve_actor;
use crate::view::{build_all, LinkView};

use super::{open_db, resolve_link_type};

/// Changes requested by `wit link edit`.
#[derive(Debug, Default)]
pub(crate) struct LinkEdit {
    pub source: Option<String>,
    pub target: Option<String>,
    pub link_type: Option<String>,
}

pub fn run(command: LinkCommand) -> Result<()> {
    let (mut db, config, _) = open_db()?;
    let actor = resolve_actor(&config);
    match command {
        LinkCommand::New {
            source,
            link_type,
            target,
            output,
        } => {
            new_impl(&mut db, &source, &link_type, &target, &actor, output.output)?;
        }
        LinkCommand::Show { id, output } => {
            show_impl(&db, &id, output.output)?;
        }
        LinkCommand::List { item, output } => {
            list_impl(&db, &item, output.output)?;
        }
        LinkCommand::Edit {
            id,
            source,
            target,
            link_type,
            version,
        } => {
            let edit = LinkEdit {
                source,
                target,
                link_type,
            };
            edit_impl(&mut db, &id, edit, &actor, version)?;
        }
        LinkCommand::Delete { id } => delete_impl(&mut db, &id, &actor)?,
    }
    Ok(())
}

/// Creates a link. A link type given by name is looked up in the source's space.
pub(crate) fn new_impl(
    db: &mut Database,
    source: &str,
    link_type: &str,
    target: &str,
    actor: &str,
    output: OutputFormat,
) -> Result<LinkView> {
    let space_id = db.get_work_item(source)?.space_id;
    let link_type = resolve_link_type(db, &space_id, link_type)?;
    let link = db.create_link(source, target, &link_type.id, actor)?;
    let view = LinkView::build(db, link)?;
    match output {
        OutputFormat::Text => println!("Linked {}", format_link_line(&view)),
        OutputFormat::Id => println!("{}", view.link.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(view)
}

pub(crate) fn show_impl(db: &Database, id: &str, output: OutputFormat) -> Result<LinkView> {
    let view = LinkView::build(db, db.get_link(id)?)?;
    match output {
        OutputFormat::Text => println!("{}", format_link_details(&view)),
        OutputFormat::Id => println!("{}", view.link.id),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(view)
}

pub(crate) fn list_impl(db: &Database, item_id: &str, output: OutputFormat) -> Result<Vec<LinkView>> {
    let views = build_all(db, db.links_for_work_item(item_id)?)?;
    match output {
        OutputFormat::Text => {
            if views.is_empty() {
                println!("No links for {}", item_id);
            }
            for view in &views {
                println!("{}", format_link_from(view, item_id));
            }
        }
        OutputFormat::Id => {
            for view in &views {
                println!("{}", view.link.id);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
    }
    Ok(views)
}

pub(crate) fn edit_impl(
    db: &mut Database,
    id: &str,
    edit: LinkEdit,
    actor: &str,
    version: VersionArgs,
) -> Result<LinkView> {
    if edit.source.is_none() && edit.target.is_none() && edit.link_type.is_none() {
        return Err(Error::NothingToUpdate);
    }
    let mut link = db.get_link(id)?;
    if let Some(source) = edit.source {
        link.source_id = source;
    }
    if let Some(target) = edit.target {
        link.target_id = target;
    }
    if let Some(link_type) = edit.link_type {
        let space_id = db.get_work_item(&link.source_id)?.space_id;
        link.link_type_id = resolve_link_type(db, &space_id, &link_type)?.id;
    }
    link.version = version.or(link.version);

    let updated = db.update_link(&link, actor)?;
    let view = LinkView::build(db, updated)?;
    println!("Updated {}", format_link_line(&view));
    Ok(view)
}

pub(crate) fn delete_impl(db: &mut Database, id: &str, actor: &str) -> Result<()> {
    db.delete_link(id, actor)?;
    println!("Deleted link {}", id);
    Ok(())
}

#[cfg(test)]
#[path = "link_tests.rs"]
mod tests;
