// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Audit trail of link mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Types of actions recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// A link was created.
    Linked,
    /// A link's source, target or type was changed.
    Relinked,
    /// A link was removed.
    Unlinked,
}

impl Action {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Linked => "linked",
            Action::Relinked => "relinked",
            Action::Unlinked => "unlinked",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linked" => Ok(Action::Linked),
            "relinked" => Ok(Action::Relinked),
            "unlinked" => Ok(Action::Unlinked),
            _ => Err(Error::CorruptedData(format!("invalid action '{s}'"))),
        }
    }
}

/// A recorded mutation and the actor who performed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Database-assigned identifier.
    pub id: i64,
    /// The link the event belongs to.
    pub entity_id: String,
    pub action: Action,
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event with the current timestamp.
    pub fn new(entity_id: String, action: Action, actor: String) -> Self {
        Event {
            id: 0,
            entity_id,
            action,
            actor,
            old_value: None,
            new_value: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the old and new values (builder pattern).
    pub fn with_values(mut self, old: Option<String>, new: Option<String>) -> Self {
        self.old_value = old;
        self.new_value = new;
        self
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
