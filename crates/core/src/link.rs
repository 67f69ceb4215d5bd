// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Link categories, link types and links between work items.
//!
//! A [`LinkType`] belongs to a space and a [`LinkCategory`] and carries a
//! [`Topology`] that constrains the shape of the graph its [`Link`]s form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Constraint shape of a link type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Single parent per target, unrestricted fan-out, no cycles.
    Tree,
    /// Unconstrained many-to-many.
    Network,
    /// Directional, unique per (source, target).
    Dependency,
}

impl Topology {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Tree => "tree",
            Topology::Network => "network",
            Topology::Dependency => "dependency",
        }
    }

    /// Returns true if a target may have at most one link of this topology.
    pub fn is_single_parent(&self) -> bool {
        matches!(self, Topology::Tree)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Topology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(Topology::Tree),
            "network" => Ok(Topology::Network),
            "dependency" => Ok(Topology::Dependency),
            _ => Err(Error::InvalidTopology(s.to_string())),
        }
    }
}

/// A reusable grouping of link types (e.g. "system", "user").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkCategory {
    /// Unique identifier (format: `lc-{hash}`).
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A typed link definition owned by a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkType {
    /// Unique identifier (format: `lt-{hash}`).
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: i64,
    /// Label read from source to target (e.g. "parent of").
    pub forward_name: String,
    /// Label read from target to source (e.g. "child of").
    pub reverse_name: String,
    pub topology: Topology,
    pub link_category_id: String,
    pub space_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a link type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLinkType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub forward_name: String,
    pub reverse_name: String,
    pub topology: Topology,
    pub link_category_id: String,
    pub space_id: String,
}

impl NewLinkType {
    /// Creates parameters with forward/reverse names defaulting to `name`.
    pub fn new(
        name: impl Into<String>,
        topology: Topology,
        link_category_id: impl Into<String>,
        space_id: impl Into<String>,
    ) -> Self {
        let name = name.into();
        NewLinkType {
            forward_name: name.clone(),
            reverse_name: name.clone(),
            name,
            description: None,
            topology,
            link_category_id: link_category_id.into(),
            space_id: space_id.into(),
        }
    }

    /// Sets the forward and reverse names (builder pattern).
    pub fn with_names(mut self, forward: impl Into<String>, reverse: impl Into<String>) -> Self {
        self.forward_name = forward.into();
        self.reverse_name = reverse.into();
        self
    }

    /// Sets the description (builder pattern).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A typed, directed relationship between two work items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Unique identifier (format: `ln-{hash}`).
    pub id: String,
    pub version: i64,
    pub source_id: String,
    pub target_id: String,
    pub link_type_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the link has been removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[path = "link_tests.rs"]
mod tests;
