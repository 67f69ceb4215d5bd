// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use wit_core::ErrorKind;

/// All possible errors that can occur in the witrs library.
///
/// Engine failures are wrapped unchanged; the remaining variants cover
/// project setup and argument parsing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'wit init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("no space selected\n  hint: pass --space or set default_space in .wit/config.toml")]
    NoSpace,

    #[error("invalid field '{0}'\n  hint: fields are written as key=value")]
    InvalidField(String),

    #[error("invalid date '{0}'\n  hint: use YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("invalid work item reference '{0}'\n  hint: use ID or ID@VERSION")]
    InvalidReference(String),

    #[error("nothing to update\n  hint: pass at least one field to change")]
    NothingToUpdate,

    #[error(transparent)]
    Engine(#[from] wit_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Classifies the error the same way the engine does.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Engine(e) => e.kind(),
            Error::NotInitialized | Error::Io(_) | Error::Json(_) | Error::Config(_) => {
                ErrorKind::Internal
            }
            Error::AlreadyInitialized(_) => ErrorKind::Conflict,
            Error::NoSpace
            | Error::InvalidField(_)
            | Error::InvalidDate(_)
            | Error::InvalidReference(_)
            | Error::NothingToUpdate => ErrorKind::BadParameter,
        }
    }
}

/// Result type alias for witrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
