//! Command-line interface for brick.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations
//! - [`decisions`] - Prompt-backed answers for apply and import conflicts

pub mod args;
pub mod commands;
pub mod decisions;

pub use args::{Cli, Commands};
pub use commands::{Command, CommandDispatcher, CommandResult, Context};
pub use decisions::PromptResolver;
