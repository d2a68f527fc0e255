//! Error types for brick operations.
//!
//! This module defines [`BrickError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Identity errors (unknown names, collisions, wrong storage type) are
//!   returned before anything on disk is touched
//! - Per-file IO failures during batch operations are collected into the
//!   operation's report instead of being returned here
//! - Use `anyhow::Error` (via `BrickError::Other`) for collaborator plumbing

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for brick operations.
#[derive(Debug, Error)]
pub enum BrickError {
    /// No template is registered under this name or index.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// A local template is registered but its `brick.json` is missing or unreadable.
    #[error("Metadata for template '{name}' is missing or unreadable")]
    MetadataMissing { name: String },

    /// A path passed to a file operation does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The template is remote, so there are no stored files to edit.
    #[error("Cannot {operation} '{name}': no local copy, pull the remote template first")]
    NotLocal { name: String, operation: String },

    /// The name is already taken and overwrite was not confirmed.
    #[error("Template '{name}' already exists")]
    AlreadyExists { name: String },

    /// Template names must match `[A-Za-z0-9_-]+`.
    #[error("Invalid template name '{name}': use letters, digits, '-' and '_' only")]
    InvalidName { name: String },

    /// An import stream is not a usable template archive.
    #[error("Invalid archive: {message}")]
    InvalidArchive { message: String },

    /// The operation does not apply to this template's storage type.
    #[error("Cannot {operation} '{name}': template is {kind}")]
    UnsupportedType {
        name: String,
        operation: String,
        kind: String,
    },

    /// The remote fetch collaborator could not produce files.
    #[error("Remote fetch failed: {message}")]
    RemoteFetchFailed { message: String },

    /// The user cancelled a prompt; nothing was changed.
    #[error("Operation cancelled")]
    Cancelled,

    /// A command argument is malformed or contradictory.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A persisted JSON file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BrickError {
    /// Whether this error means "the thing asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. }
                | Self::MetadataMissing { .. }
                | Self::FileNotFound { .. }
                | Self::NotLocal { .. }
        )
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Self::TemplateNotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn unsupported(name: &str, operation: &str, kind: impl ToString) -> Self {
        Self::UnsupportedType {
            name: name.to_string(),
            operation: operation.to_string(),
            kind: kind.to_string(),
        }
    }
}

/// Result type alias for brick operations.
pub type Result<T> = std::result::Result<T, BrickError>;
