//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command receives the same
//! [`Context`] (storage root and `--yes`), opens the store itself, and
//! resolves its template argument once through a name-or-index selector.

pub mod apply;
pub mod archive;
pub mod clean;
pub mod completions;
pub mod config;
pub mod delete;
pub mod dispatcher;
pub mod display;
pub mod files;
pub mod identity;
pub mod info;
pub mod link;
pub mod list;
pub mod remote;
pub mod save;
pub mod tag;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, Context};
