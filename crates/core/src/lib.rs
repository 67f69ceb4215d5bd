// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! wit-core: relationship and ordering engine for the wit work item tracker
//!
//! This crate provides the data structures and database operations behind
//! typed links between work items, parent/child queries, the iteration tree
//! and the execution order of a space's work items.

pub mod config;
pub mod db;
pub mod error;
pub mod event;
pub mod id;
pub mod iteration;
pub mod link;
pub mod order;
pub mod space;
pub mod work_item;

pub use config::EngineConfig;
pub use db::Database;
pub use error::{Error, ErrorKind, Result};
pub use event::{Action, Event};
pub use iteration::{Iteration, IterationPath, IterationState, NewIteration, WorkItemCounts};
pub use link::{Link, LinkCategory, LinkType, NewLinkType, Topology};
pub use order::OrderKey;
pub use space::Space;
pub use work_item::{fields, Direction, Fields, Page, Placement, VersionedId, WorkItem};
