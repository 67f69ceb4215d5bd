// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to reduce duplication
//! across commands that share common options.

use clap::Args;
use wit_core::Page;

use super::OutputFormat;

/// Offset/limit arguments for paged listings.
#[derive(Args, Clone, Debug, Default)]
pub struct PageArgs {
    /// Number of results to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl PageArgs {
    pub fn page(&self) -> Page {
        Page::new(self.offset, self.limit.unwrap_or(usize::MAX))
    }
}

/// Output format argument.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Expected version for optimistic concurrency.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct VersionArgs {
    /// Fail unless the stored version matches (defaults to the current version)
    #[arg(long = "expect-version", value_name = "N")]
    pub expected: Option<i64>,
}

impl VersionArgs {
    /// Returns the version to present, falling back to the loaded one.
    pub fn or(&self, current: i64) -> i64 {
        self.expected.unwrap_or(current)
    }
}
