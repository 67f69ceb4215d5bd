// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entity identifier generation.
//!
//! Format: `{prefix}-{hash}` where hash is the first 12 hex chars of
//! SHA256(seed + timestamp + random nonce).

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix for space IDs.
pub const SPACE_PREFIX: &str = "sp";
/// Prefix for work item IDs.
pub const WORK_ITEM_PREFIX: &str = "wi";
/// Prefix for link category IDs.
pub const CATEGORY_PREFIX: &str = "lc";
/// Prefix for link type IDs.
pub const LINK_TYPE_PREFIX: &str = "lt";
/// Prefix for link IDs.
pub const LINK_PREFIX: &str = "ln";
/// Prefix for iteration IDs.
pub const ITERATION_PREFIX: &str = "it";

/// Generate an ID from prefix, a seed (usually the entity name) and timestamp.
///
/// A random nonce is mixed in so that entities created with the same seed
/// in the same instant still get distinct IDs.
pub fn generate_id(prefix: &str, seed: &str, created_at: &DateTime<Utc>) -> String {
    let nonce: u64 = rand::thread_rng().gen();
    let input = format!(
        "{}{}{}",
        seed,
        created_at.timestamp_nanos_opt().unwrap_or_default(),
        nonce
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("{}-{}", prefix, hex::encode(&hash[..6]))
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
