// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spaces: the top-level container owning iterations, work items and link types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant/project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    /// Unique identifier (format: `sp-{hash}`).
    pub id: String,
    /// Display name; also the name of the space's root iteration.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Identity of the actor owning the space.
    pub owner_id: String,
    /// Optimistic concurrency counter.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Space {
    /// Returns true if `actor_id` owns this space.
    ///
    /// Controllers use this to compute the `is_owner` argument of
    /// space-scoped mutations.
    pub fn is_owned_by(&self, actor_id: &str) -> bool {
        self.owner_id == actor_id
    }
}
