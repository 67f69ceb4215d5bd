// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Work items and the types used to reorder them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::order::OrderKey;

/// Well-known keys of [`WorkItem::fields`].
pub mod fields {
    /// Title of the work item.
    pub const TITLE: &str = "system.title";
    /// Workflow state; [`STATE_CLOSED`] marks a closed item.
    pub const STATE: &str = "system.state";
    /// ID of the iteration the item is planned in.
    pub const ITERATION: &str = "system.iteration";

    pub const STATE_NEW: &str = "new";
    pub const STATE_CLOSED: &str = "closed";
}

/// Field values keyed by field name.
pub type Fields = BTreeMap<String, Value>;

/// A trackable unit of work within a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier (format: `wi-{hash}`).
    pub id: String,
    pub space_id: String,
    /// Work item type (e.g. "bug", "task").
    pub type_id: String,
    /// Optimistic concurrency counter.
    pub version: i64,
    /// Position in the space's list. Only changed by reordering.
    pub execution_order: OrderKey,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkItem {
    /// Returns the string value of a field, if present.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Returns the title, or an empty string for untitled items.
    pub fn title(&self) -> &str {
        self.field_str(fields::TITLE).unwrap_or_default()
    }

    /// Returns the iteration the item is planned in.
    pub fn iteration_id(&self) -> Option<&str> {
        self.field_str(fields::ITERATION)
    }

    /// Returns true if the item's state is closed.
    pub fn is_closed(&self) -> bool {
        self.field_str(fields::STATE) == Some(fields::STATE_CLOSED)
    }

    /// Returns the identity and version a caller presents when moving this item.
    pub fn versioned_id(&self) -> VersionedId {
        VersionedId {
            id: self.id.clone(),
            version: self.version,
        }
    }
}

/// An entity reference carrying the version the caller last observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedId {
    pub id: String,
    pub version: i64,
}

impl From<&WorkItem> for VersionedId {
    fn from(item: &WorkItem) -> Self {
        item.versioned_id()
    }
}

/// Where a reordered block of work items is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Immediately before the reference item.
    Above,
    /// Immediately after the reference item.
    Below,
    /// At the start of the space's list.
    Top,
    /// At the end of the space's list.
    Bottom,
}

impl Direction {
    /// Returns the string representation used in display and parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Above => "above",
            Direction::Below => "below",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "above" => Ok(Direction::Above),
            "below" => Ok(Direction::Below),
            "top" => Ok(Direction::Top),
            "bottom" => Ok(Direction::Bottom),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

/// A validated reorder target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Above(String),
    Below(String),
    Top,
    Bottom,
}

impl Placement {
    /// Builds a placement from a direction and an optional reference item.
    ///
    /// `Above` and `Below` require a reference; `Top` and `Bottom` ignore it.
    pub fn new(direction: Direction, reference: Option<String>) -> Result<Self> {
        match (direction, reference) {
            (Direction::Above, Some(id)) => Ok(Placement::Above(id)),
            (Direction::Below, Some(id)) => Ok(Placement::Below(id)),
            (Direction::Above | Direction::Below, None) => Err(Error::InvalidInput(format!(
                "reorder {direction} requires a reference work item"
            ))),
            (Direction::Top, _) => Ok(Placement::Top),
            (Direction::Bottom, _) => Ok(Placement::Bottom),
        }
    }

    /// Returns the reference work item, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Placement::Above(id) | Placement::Below(id) => Some(id),
            Placement::Top | Placement::Bottom => None,
        }
    }
}

/// Offset/limit window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Page { offset, limit }
    }

    /// A window covering every row.
    pub fn all() -> Self {
        Page {
            offset: 0,
            limit: usize::MAX,
        }
    }

    pub(crate) fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    pub(crate) fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
#[path = "work_item_tests.rs"]
mod tests;
