// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use wit_core::fields::{STATE, STATE_NEW};
use wit_core::{
    Action, Event, Iteration, LinkCategory, LinkType, Space, WorkItem, WorkItemCounts,
};

use crate::view::LinkView;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Workflow state of an item, `new` when unset.
fn item_state(item: &WorkItem) -> &str {
    item.field_str(STATE).unwrap_or(STATE_NEW)
}

/// Format a work item as a single list line.
pub fn format_item_line(item: &WorkItem) -> String {
    format!(
        "- [{}] ({}) {}: {}",
        item.type_id,
        item_state(item),
        item.id,
        item.title()
    )
}

/// Format work item details for the show command.
pub fn format_item_details(
    item: &WorkItem,
    parent: Option<&WorkItem>,
    has_children: bool,
    links: &[LinkView],
) -> String {
    let mut output = Vec::new();

    output.push(format!("[{}] {}", item.type_id, item.id));
    output.push(format!("Title: {}", item.title()));
    output.push(format!("State: {}", item_state(item)));
    if let Some(iteration) = item.iteration_id() {
        output.push(format!("Iteration: {}", iteration));
    }
    output.push(format!("Version: {}", item.version));
    output.push(format!(
        "Created: {}",
        item.created_at.format(TIMESTAMP_FORMAT)
    ));
    output.push(format!(
        "Updated: {}",
        item.updated_at.format(TIMESTAMP_FORMAT)
    ));

    let extra: Vec<_> = item
        .fields
        .iter()
        .filter(|(key, _)| !key.starts_with("system."))
        .collect();
    if !extra.is_empty() {
        output.push(String::new());
        output.push("Fields:".to_string());
        for (key, value) in extra {
            output.push(format!("  {} = {}", key, value));
        }
    }

    if let Some(parent) = parent {
        output.push(String::new());
        output.push(format!("Parent: {}: {}", parent.id, parent.title()));
    }
    if has_children {
        output.push(format!("Children: see 'wit children {}'", item.id));
    }

    if !links.is_empty() {
        output.push(String::new());
        output.push("Links:".to_string());
        for view in links {
            output.push(format!("  {}", format_link_from(view, &item.id)));
        }
    }

    output.join("\n")
}

fn item_label(id: &str, item: Option<&WorkItem>) -> String {
    match item {
        Some(item) if !item.title().is_empty() => format!("{} ({})", id, item.title()),
        _ => id.to_string(),
    }
}

/// Format a link as `source <forward> target`.
pub fn format_link_line(view: &LinkView) -> String {
    format!(
        "{}: {} {} {}",
        view.link.id,
        item_label(&view.link.source_id, view.source.as_ref()),
        view.forward_label(),
        item_label(&view.link.target_id, view.target.as_ref()),
    )
}

/// Format a link as seen from one of its endpoints.
///
/// The reverse label is used when `item_id` is the link's target.
pub fn format_link_from(view: &LinkView, item_id: &str) -> String {
    let (label, other_id, other) = if view.link.target_id == item_id {
        (
            view.reverse_label(),
            &view.link.source_id,
            view.source.as_ref(),
        )
    } else {
        (
            view.forward_label(),
            &view.link.target_id,
            view.target.as_ref(),
        )
    };
    format!(
        "{} {} [{}]",
        label,
        item_label(other_id, other),
        view.link.id
    )
}

/// Format link details for the show command.
pub fn format_link_details(view: &LinkView) -> String {
    let mut output = vec![format_link_line(view)];
    if let Some(link_type) = &view.link_type {
        output.push(format!(
            "Type: {} ({}) {}",
            link_type.name, link_type.topology, link_type.id
        ));
    }
    if let Some(category) = &view.category {
        output.push(format!("Category: {} {}", category.name, category.id));
    }
    output.push(format!("Version: {}", view.link.version));
    output.push(format!(
        "Created: {}",
        view.link.created_at.format(TIMESTAMP_FORMAT)
    ));
    output.join("\n")
}

/// Format a link type as a single list line.
pub fn format_link_type_line(link_type: &LinkType, category: Option<&LinkCategory>) -> String {
    let category = category.map_or(link_type.link_category_id.as_str(), |c| c.name.as_str());
    format!(
        "- [{}] {}: {} ({} / {}) in {}",
        link_type.topology,
        link_type.id,
        link_type.name,
        link_type.forward_name,
        link_type.reverse_name,
        category
    )
}

pub fn format_category_line(category: &LinkCategory) -> String {
    match &category.description {
        Some(description) => format!("- {}: {} - {}", category.id, category.name, description),
        None => format!("- {}: {}", category.id, category.name),
    }
}

pub fn format_space_line(space: &Space) -> String {
    format!("- {}: {} (owner {})", space.id, space.name, space.owner_id)
}

/// Format an iteration with its resolved path and work item counts.
pub fn format_iteration_line(
    iteration: &Iteration,
    resolved_path: &str,
    counts: WorkItemCounts,
) -> String {
    let mut line = format!(
        "- ({}) {}: {}",
        iteration.state, iteration.id, iteration.name
    );
    if !iteration.is_root() {
        line.push_str(&format!(" in {}", resolved_path));
    }
    if let (Some(start), Some(end)) = (iteration.start_at, iteration.end_at) {
        line.push_str(&format!(
            " [{} - {}]",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ));
    }
    line.push_str(&format!(" {}/{} closed", counts.closed, counts.total));
    line
}

/// Format a link event with its entity ID.
pub fn format_event(event: &Event) -> String {
    let timestamp = event.created_at.format(TIMESTAMP_FORMAT);
    let mut line = format!("  {}  {} {}", timestamp, event.entity_id, event.action);

    match event.action {
        Action::Linked => {
            if let Some(new) = &event.new_value {
                line.push_str(&format!(" {}", new));
            }
        }
        Action::Relinked => {
            if let (Some(old), Some(new)) = (&event.old_value, &event.new_value) {
                line.push_str(&format!(" {} => {}", old, new));
            }
        }
        Action::Unlinked => {
            if let Some(old) = &event.old_value {
                line.push_str(&format!(" {}", old));
            }
        }
    }

    line.push_str(&format!(" by {}", event.actor));
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
