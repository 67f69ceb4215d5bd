// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Iterations: time-boxed, hierarchical groupings of work items.
//!
//! Iterations form a tree per space through a materialized [`IterationPath`]
//! holding the IDs of all ancestors, root first. The root iteration of a
//! space has an empty path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Lifecycle state of an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationState {
    /// Planned, not yet running. Initial state.
    New,
    /// Currently running.
    Start,
    /// Finished.
    Close,
}

impl IterationState {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationState::New => "new",
            IterationState::Start => "start",
            IterationState::Close => "close",
        }
    }

    /// Check if a transition from this state to target is allowed.
    ///
    /// Only `new -> start` and `start -> close` are supported.
    pub fn can_transition_to(&self, target: IterationState) -> bool {
        matches!(
            (self, target),
            (IterationState::New, IterationState::Start)
                | (IterationState::Start, IterationState::Close)
        )
    }
}

impl fmt::Display for IterationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IterationState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "new" => Ok(IterationState::New),
            "start" => Ok(IterationState::Start),
            "close" => Ok(IterationState::Close),
            _ => Err(Error::InvalidIterationState(s.to_string())),
        }
    }
}

/// Ordered ancestor IDs of an iteration, root first.
///
/// Stored as `/id1/id2`; the empty (root) path is stored as `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IterationPath(Vec<String>);

impl IterationPath {
    /// The path of a root iteration.
    pub fn root() -> Self {
        IterationPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path of a child of the iteration `parent_id` living at `self`.
    pub fn child(&self, parent_id: &str) -> Self {
        let mut ids = self.0.clone();
        ids.push(parent_id.to_string());
        IterationPath(ids)
    }

    /// Ancestor IDs, root first.
    pub fn ids(&self) -> &[String] {
        &self.0
    }

    /// ID of the direct parent, if any.
    pub fn parent_id(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for IterationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for id in &self.0 {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

impl FromStr for IterationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| Error::CorruptedData(format!("iteration path '{s}' is not absolute")))?;
        if rest.is_empty() {
            return Ok(IterationPath::root());
        }
        let ids: Vec<String> = rest.split('/').map(str::to_string).collect();
        if ids.iter().any(String::is_empty) {
            return Err(Error::CorruptedData(format!(
                "iteration path '{s}' has an empty segment"
            )));
        }
        Ok(IterationPath(ids))
    }
}

/// A time-boxed grouping of work items within a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    /// Unique identifier (format: `it-{hash}`).
    pub id: String,
    pub space_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ancestor IDs, root first; empty for the root iteration.
    pub path: IterationPath,
    pub state: IterationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Iteration {
    /// Returns true if this is the root iteration of its space.
    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }
}

/// Parameters for creating a child iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewIteration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
}

impl NewIteration {
    pub fn new(name: impl Into<String>) -> Self {
        NewIteration {
            name: name.into(),
            ..NewIteration::default()
        }
    }

    /// Sets the start and end dates (builder pattern).
    pub fn with_dates(mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }
}

/// Fails if both dates are set and the start is after the end.
pub(crate) fn check_date_range(
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
) -> Result<()> {
    match (start_at, end_at) {
        (Some(start), Some(end)) if start > end => Err(Error::InvalidDateRange),
        _ => Ok(()),
    }
}

/// Work item totals for an iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemCounts {
    pub total: u64,
    pub closed: u64,
}

impl WorkItemCounts {
    pub fn open(&self) -> u64 {
        self.total.saturating_sub(self.closed)
    }
}

#[cfg(test)]
#[path = "iteration_tests.rs"]
mod tests;
