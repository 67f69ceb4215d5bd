// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod category;
pub mod children;
pub mod init;
pub mod item;
pub mod iteration;
pub mod link;
pub mod link_type;
pub mod log;
pub mod reorder;
pub mod space;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use wit_core::{Database, LinkCategory, LinkType, Space};

use crate::config::{find_work_dir, get_db_path, Config};
use crate::error::{Error, Result};

/// Helper to open the database from the current context.
pub fn open_db() -> Result<(Database, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let db = Database::open_with_config(&get_db_path(&work_dir), config.engine.clone())?;
    tracing::debug!(work_dir = %work_dir.display(), "opened project database");
    Ok((db, config, work_dir))
}

/// Looks `value` up as an ID first, then by name.
fn by_id_or_name<T>(
    by_id: wit_core::Result<T>,
    by_name: impl FnOnce() -> Result<T>,
) -> Result<T> {
    match by_id {
        Ok(found) => Ok(found),
        Err(wit_core::Error::NotFound { .. }) => by_name(),
        Err(e) => Err(e.into()),
    }
}

/// Resolves the space selected by `--space` or `default_space`.
pub(crate) fn resolve_space(
    db: &Database,
    config: &Config,
    selector: Option<&str>,
) -> Result<Space> {
    let selector = selector
        .or(config.default_space.as_deref())
        .ok_or(Error::NoSpace)?;
    by_id_or_name(db.get_space(selector), || {
        Ok(db.find_space_by_name(selector)?)
    })
}

/// Resolves a link category by ID or name.
pub(crate) fn resolve_category(db: &Database, value: &str) -> Result<LinkCategory> {
    by_id_or_name(db.get_link_category(value), || {
        db.list_link_categories()?
            .into_iter()
            .find(|c| c.name == value)
            .ok_or_else(|| wit_core::Error::not_found("link category", value).into())
    })
}

/// Resolves a link type by ID, or by name within `space_id`.
pub(crate) fn resolve_link_type(db: &Database, space_id: &str, value: &str) -> Result<LinkType> {
    by_id_or_name(db.get_link_type(value), || {
        db.list_link_types(space_id)?
            .into_iter()
            .find(|t| t.name == value)
            .ok_or_else(|| wit_core::Error::not_found("link type", value).into())
    })
}

/// Parses `key=value`. Values that are valid JSON keep their type,
/// anything else is stored as a string.
pub(crate) fn parse_field(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::InvalidField(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::InvalidField(raw.to_string()));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Parses an RFC 3339 timestamp or a plain date (midnight UTC).
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidDate(raw.to_string()))
}

/// Splits `ID@VERSION` into its parts; a bare ID has no version.
pub(crate) fn parse_versioned(raw: &str) -> Result<(String, Option<i64>)> {
    match raw.rsplit_once('@') {
        None if !raw.is_empty() => Ok((raw.to_string(), None)),
        Some((id, version)) if !id.is_empty() => {
            let version = version
                .parse()
                .map_err(|_| Error::InvalidReference(raw.to_string()))?;
            Ok((id.to_string(), Some(version)))
        }
        _ => Err(Error::InvalidReference(raw.to_string())),
    }
}
