// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for wit-core operations.
//!
//! Every variant maps onto one [`ErrorKind`] so that controllers can turn
//! engine failures into responses without matching on individual variants.

use std::fmt;

use thiserror::Error;

/// Coarse classification of engine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// Malformed input or a rule violation that depends only on the request.
    BadParameter,
    /// Stale version or a uniqueness rule violated by existing data.
    Conflict,
    /// The caller is not allowed to perform the mutation.
    Forbidden,
    /// Storage, IO or serialization failure.
    Internal,
}

impl ErrorKind {
    /// Returns the string representation used in logs and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::BadParameter => "bad_parameter",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All possible errors that can occur in wit-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidName {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid topology: '{0}'\n  hint: valid topologies are: tree, network, dependency")]
    InvalidTopology(String),

    #[error("invalid iteration state: '{0}'\n  hint: valid states are: new, start, close")]
    InvalidIterationState(String),

    #[error("invalid direction: '{0}'\n  hint: valid directions are: above, below, top, bottom")]
    InvalidDirection(String),

    #[error("invalid order key: '{0}'")]
    InvalidOrderKey(String),

    #[error("cannot link a work item to itself: {0}")]
    SelfLink(String),

    #[error("would create a cycle in the {link_type} hierarchy\n  hint: {target} is already an ancestor of {source_id}")]
    CycleDetected {
        link_type: String,
        source_id: String,
        target: String,
    },

    #[error("{target} already has a parent ({parent}) for link type {link_type}\n  hint: remove the existing link first")]
    TargetHasParent {
        target: String,
        parent: String,
        link_type: String,
    },

    #[error("link already exists: {source_id} -> {target} ({link_type})")]
    DuplicateLink {
        source_id: String,
        target: String,
        link_type: String,
    },

    #[error("{entity} named '{name}' already exists")]
    DuplicateName { entity: &'static str, name: String },

    #[error("link type {0} is still in use\n  hint: delete its links first")]
    LinkTypeInUse(String),

    #[error("version conflict on {entity} {id}: expected {expected}, found {actual}\n  hint: reload and retry")]
    VersionConflict {
        entity: &'static str,
        id: String,
        expected: i64,
        actual: i64,
    },

    #[error("root iteration {0} cannot be started")]
    RootIterationStart(String),

    #[error("another iteration is already active: {0}\n  hint: close it before starting a new one")]
    IterationAlreadyActive(String),

    #[error("invalid iteration state transition: cannot go from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("iteration start date is after its end date")]
    InvalidDateRange,

    #[error("nothing to reorder\n  hint: pass at least one work item")]
    EmptyReorder,

    #[error("{0}")]
    InvalidInput(String),

    #[error("only the space owner may {0}")]
    Forbidden(String),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Classifies this error into the engine's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::InvalidName { .. }
            | Error::InvalidTopology(_)
            | Error::InvalidIterationState(_)
            | Error::InvalidDirection(_)
            | Error::InvalidOrderKey(_)
            | Error::SelfLink(_)
            | Error::CycleDetected { .. }
            | Error::RootIterationStart(_)
            | Error::IterationAlreadyActive(_)
            | Error::InvalidTransition { .. }
            | Error::InvalidDateRange
            | Error::EmptyReorder
            | Error::InvalidInput(_) => ErrorKind::BadParameter,
            Error::TargetHasParent { .. }
            | Error::DuplicateLink { .. }
            | Error::DuplicateName { .. }
            | Error::LinkTypeInUse(_)
            | Error::VersionConflict { .. }
            | Error::Constraint(_) => ErrorKind::Conflict,
            Error::Forbidden(_) => ErrorKind::Forbidden,
            Error::Database(_) | Error::Json(_) | Error::Io(_) | Error::CorruptedData(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// A specialized Result type for wit-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
