// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! witrs - command line front end for the wit relationship engine.
//!
//! This crate provides the `wit` CLI on top of [`wit_core`]: spaces, work
//! items, typed links, iterations and manual ordering, stored in a SQLite
//! database under `.wit/`.
//!
//! # Main Components
//!
//! - [`Cli`] - clap definitions for every subcommand
//! - [`Config`] - Project configuration (actor, default space, engine limits)
//! - [`Error`] - Error types for all operations
//!
//! # Initialization
//!
//! ```rust,ignore
//! use witrs::{find_work_dir, get_db_path, init_work_dir, Config};
//!
//! let work_dir = init_work_dir(Path::new("."), &Config::default())?;
//!
//! // Later, find and open an existing project
//! let work_dir = find_work_dir()?;
//! let config = Config::load(&work_dir)?;
//! let db = wit_core::Database::open_with_config(&get_db_path(&work_dir), config.engine)?;
//! ```

mod cli;
mod commands;
mod display;
mod identity;
mod view;

pub mod config;
pub mod error;

pub use cli::{
    CategoryCommand, Cli, Command, ItemCommand, IterationCommand, LinkCommand, LinkTypeCommand,
    OutputFormat, SpaceCommand,
};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config};
pub use error::{Error, Result};

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let selector = cli.space;
    match cli.command {
        Command::Init { actor, path } => commands::init::run(selector, actor, path),
        Command::Space(command) => commands::space::run(command, selector),
        Command::Item(command) => commands::item::run(command, selector),
        Command::Category(command) => commands::category::run(command),
        Command::LinkType(command) => commands::link_type::run(command, selector),
        Command::Link(command) => commands::link::run(command),
        Command::Children { id, page, output } => {
            commands::children::run(&id, page.page(), output.output)
        }
        Command::Iteration(command) => commands::iteration::run(command, selector),
        Command::Reorder {
            direction,
            ids,
            output,
        } => commands::reorder::run(&direction, &ids, output.output),
        Command::Log { id, limit } => commands::log::run(id, limit),
    }
}
