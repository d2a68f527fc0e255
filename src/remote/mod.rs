//! Remote template sources.
//!
//! Remote templates are registry entries that point at a directory in a
//! GitHub repository. Their files are never stored locally unless the
//! template is pulled; apply streams them through a [`RemoteFetcher`].

pub mod coords;
pub mod github;
pub mod memory;

pub use coords::{RemoteRef, DEFAULT_REF};
pub use github::GitHubFetcher;
pub use memory::MemoryFetcher;

use std::io::Read;

use crate::error::Result;

/// Read access to a remote template directory.
///
/// Paths passed to and returned from a fetcher are relative to
/// [`RemoteRef::path`] and use forward slashes.
pub trait RemoteFetcher {
    /// Every file under the referenced directory, sorted.
    fn list_files(&self, remote: &RemoteRef) -> Result<Vec<String>>;

    /// Open one file for streaming.
    fn read_file(&self, remote: &RemoteRef, relative: &str) -> Result<Box<dyn Read>>;

    /// Resolve the reference's branch or tag to a commit SHA.
    fn resolve_commit(&self, remote: &RemoteRef) -> Result<String>;
}
