//! Uniform file access for local and remote templates.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::{BrickError, Result};
use crate::remote::{RemoteFetcher, RemoteRef};
use crate::store::{Storage, Store};

/// A template's files, readable one at a time.
pub trait FileSource {
    /// Manifest paths, sorted.
    fn files(&self) -> &[String];

    /// Open one manifest file for streaming.
    fn open(&self, relative: &str) -> Result<Box<dyn Read + '_>>;
}

/// Files under a local storage directory.
pub struct LocalSource {
    dir: PathBuf,
    files: Vec<String>,
}

impl LocalSource {
    pub fn new(dir: PathBuf, files: Vec<String>) -> Self {
        Self { dir, files }
    }
}

impl FileSource for LocalSource {
    fn files(&self) -> &[String] {
        &self.files
    }

    fn open(&self, relative: &str) -> Result<Box<dyn Read + '_>> {
        let path = self.dir.join(relative);
        let file = File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BrickError::FileNotFound { path },
            _ => BrickError::Io(e),
        })?;
        Ok(Box::new(file))
    }
}

/// Files streamed from GitHub on demand.
pub struct RemoteSource<'f> {
    fetcher: &'f dyn RemoteFetcher,
    remote: RemoteRef,
    files: Vec<String>,
}

impl<'f> RemoteSource<'f> {
    /// List the remote directory up front.
    pub fn fetch(fetcher: &'f dyn RemoteFetcher, remote: RemoteRef) -> Result<Self> {
        let files = fetcher.list_files(&remote)?;
        Ok(Self {
            fetcher,
            remote,
            files,
        })
    }
}

impl FileSource for RemoteSource<'_> {
    fn files(&self) -> &[String] {
        &self.files
    }

    fn open(&self, relative: &str) -> Result<Box<dyn Read + '_>> {
        self.fetcher.read_file(&self.remote, relative)
    }
}

/// Open the right source for a registered template.
pub fn open_source<'a>(
    store: &Store,
    name: &str,
    fetcher: &'a dyn RemoteFetcher,
) -> Result<Box<dyn FileSource + 'a>> {
    match &store.entry(name)?.storage {
        Storage::Local { .. } => {
            let metadata = store.load_metadata(name)?;
            let dir = store.storage_dir(name)?;
            Ok(Box::new(LocalSource::new(dir, metadata.files)))
        }
        Storage::Remote(remote) => Ok(Box::new(RemoteSource::fetch(fetcher, remote.clone())?)),
    }
}
