//! Export and import of templates as archives.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Write};

use super::codec::ArchiveCodec;
use super::FILES_DIR;
use crate::error::{BrickError, Result};
use crate::store::metadata::read_metadata;
use crate::store::{
    validate_name, Provenance, RegistryEntry, Store, StorePaths, TemplateKind, TemplateMetadata,
    METADATA_FILE,
};
use crate::template::local::purge;
use crate::template::scan::{copy_file, list_files};

/// Answer when an imported name is already registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDecision {
    Overwrite,
    /// Retry under another name (checked again for collisions).
    Rename(String),
    Cancel,
}

/// Decides import name collisions.
pub trait ImportConflictResolver {
    fn on_conflict(&mut self, name: &str) -> Result<ImportDecision>;
}

impl<F> ImportConflictResolver for F
where
    F: FnMut(&str) -> Result<ImportDecision>,
{
    fn on_conflict(&mut self, name: &str) -> Result<ImportDecision> {
        self(name)
    }
}

/// Options for importing one archive.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    /// Register under this name instead of the archived one.
    pub name: Option<String>,
    /// Recorded as the provenance path (usually the archive file name).
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub name: String,
    pub files: Vec<String>,
    /// Manifest entries with no file on disk; left out of the archive.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub name: String,
    pub files: Vec<String>,
    /// An existing template was replaced.
    pub replaced: bool,
}

/// Moves templates between a [`Store`] and archive streams.
pub struct ArchiveBridge<'a> {
    store: &'a mut Store,
    codec: &'a dyn ArchiveCodec,
}

impl<'a> ArchiveBridge<'a> {
    pub fn new(store: &'a mut Store, codec: &'a dyn ArchiveCodec) -> Self {
        Self { store, codec }
    }

    /// Write a local template to `out`.
    pub fn export(&self, name: &str, out: &mut dyn Write) -> Result<ExportSummary> {
        let entry = self.store.entry(name)?;
        if !entry.is_local() {
            return Err(BrickError::unsupported(name, "export", TemplateKind::Remote));
        }
        let mut metadata = self.store.load_metadata(name)?;
        let dir = self.store.storage_dir(name)?;

        let stage = tempfile::tempdir()?;
        let files_dir = stage.path().join(FILES_DIR);
        fs::create_dir_all(&files_dir)?;

        let mut files = Vec::new();
        let mut missing = Vec::new();
        for file in &metadata.files {
            let from = dir.join(file);
            if from.is_file() {
                copy_file(&from, &files_dir.join(file))?;
                files.push(file.clone());
            } else {
                tracing::warn!("{} lists {} but it is missing; not exported", name, file);
                missing.push(file.clone());
            }
        }

        metadata.set_files(files.iter().cloned());
        let content = serde_json::to_string_pretty(&metadata).map_err(anyhow::Error::from)?;
        fs::write(stage.path().join(METADATA_FILE), content)?;

        self.codec
            .pack_directory(stage.path(), &BTreeSet::new(), out)
            .map_err(BrickError::Other)?;

        tracing::info!("Exported {} ({} files)", name, files.len());
        Ok(ExportSummary {
            name: name.to_string(),
            files,
            missing,
        })
    }

    /// Read an archive from `input` and register it as a local template.
    pub fn import(
        &mut self,
        input: &mut dyn Read,
        request: ImportRequest,
        resolver: &mut dyn ImportConflictResolver,
    ) -> Result<ImportSummary> {
        let stage = tempfile::tempdir()?;
        self.codec
            .unpack(input, stage.path())
            .map_err(|e| BrickError::InvalidArchive {
                message: e.to_string(),
            })?;

        let archived =
            read_metadata(&stage.path().join(METADATA_FILE)).ok_or_else(|| BrickError::InvalidArchive {
                message: format!("{} is missing or unreadable", METADATA_FILE),
            })?;

        let files_dir = stage.path().join(FILES_DIR);
        let mut files = if files_dir.is_dir() {
            list_files(&files_dir, &BTreeSet::new())?
        } else {
            Vec::new()
        };
        if files.iter().any(|f| f == METADATA_FILE) {
            tracing::warn!("Ignoring {}/{} in archive", FILES_DIR, METADATA_FILE);
            files.retain(|f| f != METADATA_FILE);
        }

        let mut name = request.name.unwrap_or_else(|| archived.name.clone());
        validate_name(&name)?;
        let mut replaced = false;
        while self.store.registry().contains(&name) {
            match resolver.on_conflict(&name)? {
                ImportDecision::Overwrite => {
                    replaced = true;
                    break;
                }
                ImportDecision::Rename(new_name) => {
                    validate_name(&new_name)?;
                    name = new_name;
                }
                ImportDecision::Cancel => return Err(BrickError::Cancelled),
            }
        }
        if replaced {
            purge(self.store, &name)?;
        }

        let dir = self.store.paths().template_dir(&name);
        fs::create_dir_all(&dir)?;
        for file in &files {
            if let Err(e) = copy_file(&files_dir.join(file), &dir.join(file)) {
                let _ = fs::remove_dir_all(&dir);
                return Err(e.into());
            }
        }

        let mut metadata = TemplateMetadata::new(&name, Provenance::imported(request.label.clone()));
        metadata.version = archived.version;
        metadata.set_files(files.iter().cloned());
        metadata.dependencies = archived.dependencies;
        metadata.dev_dependencies = archived.dev_dependencies;
        metadata.tags = archived.tags;
        self.store.metadata().save(&name, &metadata)?;

        let entry = RegistryEntry::local(StorePaths::relative_template_path(&name))
            .with_description(format!("Imported from {}", request.label))
            .with_tags(metadata.tags.iter().cloned());
        self.store.registry_mut().put(&name, entry)?;

        tracing::info!("Imported {} ({} files)", name, files.len());
        Ok(ImportSummary {
            name,
            files,
            replaced,
        })
    }
}
