// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::{OutputArgs, PageArgs, VersionArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Id,
}

#[derive(Parser)]
#[command(name = "wit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Typed links, iterations and ordering for work items")]
#[command(
    long_about = "Typed links, iterations and ordering for work items.\n\n\
    Relate work items with tree, network or dependency link types, plan them into \
    nested iterations, and keep a manually ordered backlog per space."
)]
#[command(after_help = "\
Quickstart:
  wit init --space Project            Create .wit/ and a space
  wit category new system             Register a link category
  wit link-type new parenting -c system -t tree --forward \"parent of\" --reverse \"child of\"
  wit item new \"Epic\"                 Create a work item
  wit link new <epic> parenting <id>  Link two work items")]
pub struct Cli {
    /// Space name or ID (defaults to default_space in .wit/config.toml)
    #[arg(long, global = true, value_name = "SPACE")]
    pub space: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize wit in the current directory
    #[command(after_help = "\
Examples:
  wit init                       Space named after the directory
  wit init --space Project       Space with an explicit name
  wit init --actor alice         Record alice as actor and space owner")]
    Init {
        /// Actor written to the config and used as space owner
        #[arg(long, value_parser = non_empty_string)]
        actor: Option<String>,

        /// Directory to initialize (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Manage spaces
    #[command(subcommand)]
    Space(SpaceCommand),

    /// Manage work items
    #[command(subcommand)]
    Item(ItemCommand),

    /// Manage link categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Manage link types of a space
    #[command(subcommand, name = "link-type")]
    LinkType(LinkTypeCommand),

    /// Manage links between work items
    #[command(subcommand)]
    Link(LinkCommand),

    /// List the children of a work item in execution order
    #[command(arg_required_else_help = true)]
    Children {
        /// Parent work item ID
        id: String,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage iterations
    #[command(subcommand)]
    Iteration(IterationCommand),

    /// Move work items as a block within their space
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  wit reorder top wi-a wi-b                Move two items to the top
  wit reorder above wi-x wi-a wi-b         Place wi-a, wi-b right above wi-x
  wit reorder bottom wi-a@3                Fail unless wi-a is still at version 3"
    )]
    Reorder {
        /// Where to move: above, below, top, bottom
        direction: String,

        /// Reference item (for above/below) followed by the items to move,
        /// each written as ID or ID@VERSION
        #[arg(required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show link events
    Log {
        /// Only show events for this link
        id: Option<String>,

        /// Maximum number of events
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum SpaceCommand {
    /// Create a space with its root iteration
    #[command(arg_required_else_help = true)]
    New {
        #[arg(value_parser = non_empty_string)]
        name: String,

        #[arg(long, short)]
        description: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List spaces
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the selected space with per-iteration work item counts
    Show {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Make a space the default for this project
    #[command(arg_required_else_help = true)]
    Use {
        /// Space name or ID
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ItemCommand {
    /// Create a work item at the end of the space's list
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  wit item new \"Fix crash\"                      Task with a title
  wit item new \"Fix crash\" -t bug               Explicit type
  wit item new \"Login\" --iteration it-1a2b      Planned into an iteration
  wit item new \"Spike\" -f estimate=3            Extra field (JSON or string)"
    )]
    New {
        #[arg(value_parser = non_empty_string)]
        title: String,

        /// Work item type
        #[arg(long = "type", short = 't', default_value = "task")]
        type_id: String,

        /// Iteration to plan the item into
        #[arg(long)]
        iteration: Option<String>,

        /// Additional field as key=value (repeatable)
        #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
        fields: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a work item with its parent and links
    #[command(arg_required_else_help = true)]
    Show {
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List work items in execution order
    List {
        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Edit a work item's type or fields
    #[command(arg_required_else_help = true)]
    Edit {
        id: String,

        #[arg(long, value_parser = non_empty_string)]
        title: Option<String>,

        /// Workflow state (e.g. new, closed)
        #[arg(long)]
        state: Option<String>,

        /// Iteration to plan the item into
        #[arg(long)]
        iteration: Option<String>,

        #[arg(long = "type", short = 't')]
        type_id: Option<String>,

        /// Field as key=value (repeatable)
        #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
        fields: Vec<String>,

        #[command(flatten)]
        version: VersionArgs,
    },

    /// Delete a work item and every link touching it
    #[command(arg_required_else_help = true)]
    Delete {
        id: String,

        #[command(flatten)]
        version: VersionArgs,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Register a link category
    #[command(arg_required_else_help = true)]
    New {
        name: String,

        #[arg(long, short)]
        description: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List link categories
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum LinkTypeCommand {
    /// Create a link type in the selected space
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  wit link-type new parenting -c system -t tree --forward \"parent of\" --reverse \"child of\"
  wit link-type new related -c user -t network
  wit link-type new blocks -c system -t dependency --forward blocks --reverse \"blocked by\""
    )]
    New {
        name: String,

        /// Link category name or ID
        #[arg(long, short = 'c')]
        category: String,

        /// Topology: tree, network, dependency
        #[arg(long, short = 't')]
        topology: String,

        /// Label read from source to target (defaults to the name)
        #[arg(long)]
        forward: Option<String>,

        /// Label read from target to source (defaults to the name)
        #[arg(long)]
        reverse: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List link types of the selected space
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Edit a link type
    #[command(arg_required_else_help = true)]
    Edit {
        /// Link type name or ID
        link_type: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short = 'c')]
        category: Option<String>,

        #[arg(long, short = 't')]
        topology: Option<String>,

        #[arg(long)]
        forward: Option<String>,

        #[arg(long)]
        reverse: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[command(flatten)]
        version: VersionArgs,
    },

    /// Delete a link type that has no live links
    #[command(arg_required_else_help = true)]
    Delete {
        /// Link type name or ID
        link_type: String,

        #[command(flatten)]
        version: VersionArgs,
    },
}

#[derive(Subcommand)]
pub enum LinkCommand {
    /// Link two work items
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  wit link new wi-epic parenting wi-task     wi-epic is the parent of wi-task
  wit link new wi-a blocks wi-b              wi-a blocks wi-b"
    )]
    New {
        source: String,

        /// Link type name or ID
        link_type: String,

        target: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show a link with its type, category and work items
    #[command(arg_required_else_help = true)]
    Show {
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List live links touching a work item
    #[command(arg_required_else_help = true)]
    List {
        /// Work item ID
        item: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Change a link's source, target or type
    #[command(arg_required_else_help = true)]
    Edit {
        id: String,

        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        target: Option<String>,

        /// Link type name or ID
        #[arg(long = "type")]
        link_type: Option<String>,

        #[command(flatten)]
        version: VersionArgs,
    },

    /// Remove a link
    #[command(arg_required_else_help = true)]
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum IterationCommand {
    /// Create a child iteration (requires space ownership)
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  wit iteration new \"Release 1\"                         Child of the root iteration
  wit iteration new \"Sprint 1\" --parent it-1a2b        Nested iteration
  wit iteration new \"Sprint 2\" --start 2026-01-05 --end 2026-01-19"
    )]
    New {
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Parent iteration ID (defaults to the root iteration)
        #[arg(long)]
        parent: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        /// Start date (YYYY-MM-DD or RFC 3339)
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// End date (YYYY-MM-DD or RFC 3339)
        #[arg(long, requires = "start")]
        end: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List iterations of the selected space
    List {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show an iteration with its resolved path and work item counts
    #[command(arg_required_else_help = true)]
    Show {
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Start an iteration (new -> start)
    #[command(arg_required_else_help = true)]
    Start {
        id: String,

        #[command(flatten)]
        version: VersionArgs,
    },

    /// Close an iteration (start -> close)
    #[command(arg_required_else_help = true)]
    Close {
        id: String,

        #[command(flatten)]
        version: VersionArgs,
    },

    /// Edit an iteration (requires space ownership)
    #[command(arg_required_else_help = true)]
    Edit {
        id: String,

        #[arg(long, value_parser = non_empty_string)]
        name: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[command(flatten)]
        version: VersionArgs,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
