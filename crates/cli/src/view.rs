// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation views assembled from several engine lookups.
//!
//! A [`LinkView`] starts as a bare [`Link`] and is filled in by an explicit,
//! ordered list of enrichment steps. Each step may rely on what the steps
//! before it loaded; the category step reads the link type loaded by the
//! first step.

use serde::Serialize;
use wit_core::{Database, Link, LinkCategory, LinkType, WorkItem};

use crate::error::Result;

/// One enrichment step applied to a [`LinkView`].
pub type LinkStep = fn(&Database, &mut LinkView) -> Result<()>;

/// Steps applied by [`LinkView::build`], in order.
pub const LINK_STEPS: &[(&str, LinkStep)] = &[
    ("link type", with_link_type),
    ("category", with_category),
    ("work items", with_work_items),
];

/// A link together with the entities it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    #[serde(flatten)]
    pub link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<LinkCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<WorkItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<WorkItem>,
}

impl LinkView {
    /// A view with nothing but the link itself.
    pub fn bare(link: Link) -> Self {
        LinkView {
            link,
            link_type: None,
            category: None,
            source: None,
            target: None,
        }
    }

    /// Builds a fully enriched view by running [`LINK_STEPS`].
    pub fn build(db: &Database, link: Link) -> Result<Self> {
        Self::build_with(db, link, LINK_STEPS)
    }

    /// Builds a view by running `steps` in order.
    pub fn build_with(db: &Database, link: Link, steps: &[(&str, LinkStep)]) -> Result<Self> {
        let mut view = LinkView::bare(link);
        for (name, step) in steps {
            tracing::trace!(link = %view.link.id, step = %name, "enriching link view");
            step(db, &mut view)?;
        }
        Ok(view)
    }

    /// Label read from source to target, or the type ID when not loaded.
    pub fn forward_label(&self) -> &str {
        self.link_type
            .as_ref()
            .map_or(self.link.link_type_id.as_str(), |t| t.forward_name.as_str())
    }

    /// Label read from target to source, or the type ID when not loaded.
    pub fn reverse_label(&self) -> &str {
        self.link_type
            .as_ref()
            .map_or(self.link.link_type_id.as_str(), |t| t.reverse_name.as_str())
    }
}

/// Builds enriched views for a list of links.
pub fn build_all(db: &Database, links: Vec<Link>) -> Result<Vec<LinkView>> {
    links
        .into_iter()
        .map(|link| LinkView::build(db, link))
        .collect()
}

fn with_link_type(db: &Database, view: &mut LinkView) -> Result<()> {
    view.link_type = Some(db.get_link_type(&view.link.link_type_id)?);
    Ok(())
}

fn with_category(db: &Database, view: &mut LinkView) -> Result<()> {
    if let Some(link_type) = &view.link_type {
        view.category = Some(db.get_link_category(&link_type.link_category_id)?);
    }
    Ok(())
}

fn with_work_items(db: &Database, view: &mut LinkView) -> Result<()> {
    view.source = Some(db.get_work_item(&view.link.source_id)?);
    view.target = Some(db.get_work_item(&view.link.target_id)?);
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
