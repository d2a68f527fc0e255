//! Remote template lifecycle: link, pull, refresh.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use super::deps::read_package_dependencies;
use super::local::{purge, LocalTemplateEngine};
use super::scan::normalize_relative;
use crate::error::{BrickError, Result};
use crate::remote::{RemoteFetcher, RemoteRef};
use crate::store::{
    validate_name, Provenance, RegistryEntry, Storage, StorePaths, TemplateKind, TemplateMetadata,
};

/// Input for registering a remote template.
#[derive(Debug, Clone)]
pub struct LinkRequest {
    pub name: String,
    pub remote: RemoteRef,
    pub description: String,
    pub tags: Vec<String>,
    pub overwrite: bool,
}

impl LocalTemplateEngine<'_> {
    /// Register a GitHub directory as a remote template.
    pub fn link(&mut self, request: LinkRequest) -> Result<()> {
        validate_name(&request.name)?;
        if self.store.registry().contains(&request.name) {
            if !request.overwrite {
                return Err(BrickError::AlreadyExists { name: request.name });
            }
            purge(self.store, &request.name)?;
        }

        let entry = RegistryEntry::remote(request.remote)
            .with_description(request.description)
            .with_tags(request.tags);
        self.store.registry_mut().put(&request.name, entry)
    }

    /// Download a remote template and convert it to local storage.
    ///
    /// Any fetch failure aborts the pull and removes the partial download;
    /// the entry stays remote.
    pub fn pull(&mut self, name: &str, fetcher: &dyn RemoteFetcher) -> Result<TemplateMetadata> {
        let mut entry = self.store.entry(name)?.clone();
        let Storage::Remote(remote) = entry.storage.clone() else {
            return Err(BrickError::unsupported(name, "pull", TemplateKind::Local));
        };

        let files = fetcher.list_files(&remote)?;
        let dir = self.store.paths().template_dir(name);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }

        if let Err(e) = download(fetcher, &remote, &files, &dir) {
            let _ = fs::remove_dir_all(&dir);
            return Err(e);
        }

        let deps = read_package_dependencies(&dir);
        let mut metadata = TemplateMetadata::new(
            name,
            Provenance::github(&remote.owner, &remote.repo, remote.path.clone()),
        );
        metadata.set_files(files);
        metadata.dependencies = deps.dependencies;
        metadata.dev_dependencies = deps.dev_dependencies;
        metadata.tags = entry.tags.clone();
        self.store.metadata().save(name, &metadata)?;

        entry.storage = Storage::Local {
            path: StorePaths::relative_template_path(name),
        };
        entry.touch();
        self.store.registry_mut().put(name, entry)?;

        tracing::info!("Pulled {} from {} ({} files)", name, remote, metadata.files.len());
        Ok(metadata)
    }

    /// Pin a remote template to the current commit of its ref.
    pub fn refresh(&mut self, name: &str, fetcher: &dyn RemoteFetcher) -> Result<String> {
        let mut entry = self.store.entry(name)?.clone();
        let Storage::Remote(remote) = &mut entry.storage else {
            return Err(BrickError::unsupported(name, "refresh", TemplateKind::Local));
        };

        let sha = fetcher.resolve_commit(remote)?;
        remote.commit = Some(sha.clone());
        entry.touch();
        self.store.registry_mut().put(name, entry)?;
        Ok(sha)
    }
}

fn download(
    fetcher: &dyn RemoteFetcher,
    remote: &RemoteRef,
    files: &[String],
    dir: &Path,
) -> Result<()> {
    fs::create_dir_all(dir)?;
    for file in files {
        let relative = normalize_relative(file)?;
        let target = dir.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut reader = fetcher.read_file(remote, file)?;
        let mut out = File::create(&target)?;
        io::copy(&mut reader, &mut out)?;
    }
    Ok(())
}
