//! Persistent template state.
//!
//! A brick root holds two models that must agree:
//! - the [`Registry`] (`store.json`), the index of every template name
//! - per-template [`TemplateMetadata`] (`templates/<name>/brick.json`)
//!
//! [`Store`] opens both for a root and is passed by reference into the
//! template engines, which keep the two in sync.

pub mod atomic;
pub mod entry;
pub mod metadata;
pub mod name;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod settings;

pub use entry::{RegistryEntry, Storage, TemplateKind};
pub use metadata::{MetadataStore, Provenance, TemplateMetadata};
pub use name::validate_name;
pub use paths::{StorePaths, METADATA_FILE};
pub use registry::Registry;
pub use resolver::Selector;
pub use settings::Settings;

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{BrickError, Result};
use crate::template::scan::list_files;

/// Open handle on a brick root.
#[derive(Debug)]
pub struct Store {
    paths: StorePaths,
    registry: Registry,
    metadata: MetadataStore,
}

impl Store {
    /// Open the registry and metadata store under `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let paths = StorePaths::new(root);
        let registry = Registry::open(&paths)?;
        let metadata = MetadataStore::new(&paths);
        Ok(Self {
            paths,
            registry,
            metadata,
        })
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Resolve a selector to a canonical name.
    pub fn resolve(&self, selector: &Selector) -> Result<String> {
        self.registry.resolve(selector)
    }

    /// Registry entry for a name, or `TemplateNotFound`.
    pub fn entry(&self, name: &str) -> Result<&RegistryEntry> {
        self.registry
            .get(name)
            .ok_or_else(|| BrickError::not_found(name))
    }

    /// Metadata for a local template, or `MetadataMissing`.
    pub fn load_metadata(&self, name: &str) -> Result<TemplateMetadata> {
        self.metadata
            .load(name)
            .ok_or_else(|| BrickError::MetadataMissing {
                name: name.to_string(),
            })
    }

    /// Storage directory of a local template as recorded in its entry.
    pub fn storage_dir(&self, name: &str) -> Result<PathBuf> {
        match &self.entry(name)?.storage {
            Storage::Local { path } => Ok(self.paths.resolve_relative(path)),
            Storage::Remote(_) => Err(BrickError::unsupported(
                name,
                "locate files of",
                TemplateKind::Remote,
            )),
        }
    }

    /// Entry plus metadata (when available) for display.
    pub fn inspect(&self, name: &str) -> Result<TemplateInfo> {
        let entry = self.entry(name)?.clone();
        let metadata = if entry.is_local() {
            self.metadata.load(name)
        } else {
            None
        };
        let issues = self.verify(name)?;
        Ok(TemplateInfo {
            name: name.to_string(),
            entry,
            metadata,
            issues,
        })
    }

    /// Detect registry/metadata/disk disagreement for one template.
    pub fn verify(&self, name: &str) -> Result<Vec<Inconsistency>> {
        let entry = self.entry(name)?;
        let Storage::Local { path } = &entry.storage else {
            return Ok(Vec::new());
        };

        let mut issues = Vec::new();
        let dir = self.paths.resolve_relative(path);
        if !dir.is_dir() {
            issues.push(Inconsistency::MissingDirectory(dir));
            return Ok(issues);
        }

        let Some(metadata) = self.metadata.load(name) else {
            issues.push(Inconsistency::MissingMetadata);
            return Ok(issues);
        };

        let on_disk: BTreeSet<String> = list_files(&dir, &BTreeSet::new())?
            .into_iter()
            .filter(|f| f != METADATA_FILE)
            .collect();
        let manifest: BTreeSet<String> = metadata.files.iter().cloned().collect();

        let missing: Vec<String> = manifest.difference(&on_disk).cloned().collect();
        let untracked: Vec<String> = on_disk.difference(&manifest).cloned().collect();
        if !missing.is_empty() {
            issues.push(Inconsistency::MissingFiles(missing));
        }
        if !untracked.is_empty() {
            issues.push(Inconsistency::UntrackedFiles(untracked));
        }

        Ok(issues)
    }
}

/// A template as shown by `info`.
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub name: String,
    pub entry: RegistryEntry,
    /// `None` for remote templates or when `brick.json` is unreadable.
    pub metadata: Option<TemplateMetadata>,
    pub issues: Vec<Inconsistency>,
}

/// A detectable disagreement between registry, metadata and disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// The local storage directory does not exist.
    MissingDirectory(PathBuf),
    /// `brick.json` is missing or unparsable.
    MissingMetadata,
    /// Manifest entries with no file on disk.
    MissingFiles(Vec<String>),
    /// Files on disk not listed in the manifest.
    UntrackedFiles(Vec<String>),
}

impl std::fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDirectory(dir) => {
                write!(f, "storage directory {} is missing", dir.display())
            }
            Self::MissingMetadata => write!(f, "{} is missing or unreadable", METADATA_FILE),
            Self::MissingFiles(files) => {
                write!(f, "{} manifest file(s) missing on disk: {}", files.len(), files.join(", "))
            }
            Self::UntrackedFiles(files) => {
                write!(f, "{} file(s) on disk not in manifest: {}", files.len(), files.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with_local(temp: &TempDir, name: &str, files: &[&str]) -> Store {
        let mut store = Store::open(temp.path()).unwrap();
        let dir = store.paths().template_dir(name);
        for file in files {
            let path = dir.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        let mut meta = TemplateMetadata::new(name, Provenance::default());
        meta.set_files(files.iter().copied());
        store.metadata().save(name, &meta).unwrap();
        store
            .registry_mut()
            .put(name, RegistryEntry::local(StorePaths::relative_template_path(name)))
            .unwrap();
        store
    }

    #[test]
    fn consistent_template_has_no_issues() {
        let temp = TempDir::new().unwrap();
        let store = store_with_local(&temp, "demo", &["a.ts", "sub/b.ts"]);
        assert!(store.verify("demo").unwrap().is_empty());
    }

    #[test]
    fn missing_metadata_is_detected_but_list_still_works() {
        let temp = TempDir::new().unwrap();
        let store = store_with_local(&temp, "demo", &["a.ts"]);
        fs::remove_file(store.metadata().file_path("demo")).unwrap();

        assert_eq!(store.registry().names(), vec!["demo"]);
        assert_eq!(
            store.verify("demo").unwrap(),
            vec![Inconsistency::MissingMetadata]
        );
        assert!(matches!(
            store.load_metadata("demo"),
            Err(BrickError::MetadataMissing { .. })
        ));
    }

    #[test]
    fn missing_directory_is_detected() {
        let temp = TempDir::new().unwrap();
        let store = store_with_local(&temp, "demo", &["a.ts"]);
        fs::remove_dir_all(store.paths().template_dir("demo")).unwrap();

        let issues = store.verify("demo").unwrap();
        assert!(matches!(issues[0], Inconsistency::MissingDirectory(_)));
    }

    #[test]
    fn manifest_drift_is_detected() {
        let temp = TempDir::new().unwrap();
        let store = store_with_local(&temp, "demo", &["a.ts", "b.ts"]);
        let dir = store.paths().template_dir("demo");
        fs::remove_file(dir.join("b.ts")).unwrap();
        fs::write(dir.join("extra.ts"), "x").unwrap();

        let issues = store.verify("demo").unwrap();
        assert!(issues.contains(&Inconsistency::MissingFiles(vec!["b.ts".into()])));
        assert!(issues.contains(&Inconsistency::UntrackedFiles(vec!["extra.ts".into()])));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        assert!(store.entry("nope").unwrap_err().is_not_found());
    }
}
