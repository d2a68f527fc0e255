//! Template archives.
//!
//! An archive is a gzip-compressed tar stream with `brick.json` at its root
//! and the template's files under `template/`. [`ArchiveBridge`] moves
//! templates in and out of the store through any [`ArchiveCodec`].

pub mod bridge;
pub mod codec;

pub use bridge::{
    ArchiveBridge, ExportSummary, ImportConflictResolver, ImportDecision, ImportRequest,
    ImportSummary,
};
pub use codec::{ArchiveCodec, TarGzCodec};

/// Directory inside an archive that holds template files.
pub const FILES_DIR: &str = "template";
