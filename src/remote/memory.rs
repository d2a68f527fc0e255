//! In-memory fetcher for offline use and tests.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use super::{RemoteFetcher, RemoteRef};
use crate::error::{BrickError, Result};

/// Serves a fixed set of files regardless of the reference.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: BTreeMap<String, Vec<u8>>,
    commit: String,
    failing: Option<String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self {
            commit: "0000000000000000000000000000000000000000".to_string(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, relative: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(relative.to_string(), contents.into());
        self
    }

    /// SHA returned by `resolve_commit`.
    pub fn with_commit(mut self, sha: &str) -> Self {
        self.commit = sha.to_string();
        self
    }

    /// Make reads of `relative` fail.
    pub fn failing_on(mut self, relative: &str) -> Self {
        self.failing = Some(relative.to_string());
        self
    }
}

impl RemoteFetcher for MemoryFetcher {
    fn list_files(&self, _remote: &RemoteRef) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read_file(&self, remote: &RemoteRef, relative: &str) -> Result<Box<dyn Read>> {
        if self.failing.as_deref() == Some(relative) {
            return Err(BrickError::RemoteFetchFailed {
                message: format!("simulated failure reading {} from {}", relative, remote),
            });
        }
        let contents = self
            .files
            .get(relative)
            .cloned()
            .ok_or_else(|| BrickError::RemoteFetchFailed {
                message: format!("{} not found in {}", relative, remote),
            })?;
        Ok(Box::new(Cursor::new(contents)))
    }

    fn resolve_commit(&self, _remote: &RemoteRef) -> Result<String> {
        Ok(self.commit.clone())
    }
}
