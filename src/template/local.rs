//! Structural operations on stored templates.
//!
//! Every operation checks names and storage types before touching disk, then
//! updates files, `brick.json`, and the registry together.

use chrono::Utc;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::deps::read_package_dependencies;
use super::report::{BatchReport, RemoveReport};
use super::scan::{self, copy_file, normalize_relative};
use crate::error::{BrickError, Result};
use crate::store::{
    validate_name, Provenance, RegistryEntry, Storage, Store, StorePaths, TemplateMetadata,
    METADATA_FILE,
};

/// Input for saving a directory (or part of one) as a template.
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    pub name: String,
    pub source_dir: PathBuf,
    /// Paths relative to `source_dir`. Empty means "every file".
    pub files: Vec<String>,
    pub description: String,
    pub tags: Vec<String>,
    /// Extra names pruned when walking directories.
    pub ignore: Vec<String>,
    /// Replace an existing template with the same name.
    pub overwrite: bool,
}

/// Changes to a template's descriptive fields.
#[derive(Debug, Clone, Default)]
pub struct DetailsUpdate {
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
    pub description: Option<String>,
}

/// Mutating operations on the templates of a [`Store`].
pub struct LocalTemplateEngine<'a> {
    pub(crate) store: &'a mut Store,
}

impl<'a> LocalTemplateEngine<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &*self.store
    }

    /// Save files from a directory as a new local template.
    pub fn save(&mut self, request: SaveRequest) -> Result<BatchReport> {
        validate_name(&request.name)?;
        if !request.source_dir.is_dir() {
            return Err(BrickError::FileNotFound {
                path: request.source_dir.clone(),
            });
        }
        let exists = self.store.registry().contains(&request.name);
        if exists && !request.overwrite {
            return Err(BrickError::AlreadyExists {
                name: request.name.clone(),
            });
        }

        let ignore = scan::ignore_set(request.ignore.iter().cloned());
        let files = if request.files.is_empty() {
            scan::list_files(&request.source_dir, &ignore)?
        } else {
            scan::expand_paths(&request.source_dir, &request.files, &ignore)?
        };
        if files.is_empty() {
            return Err(BrickError::InvalidArgument {
                message: format!("no files to save from {}", request.source_dir.display()),
            });
        }
        if exists {
            purge(self.store, &request.name)?;
        }

        let dir = self.store.paths().template_dir(&request.name);
        fs::create_dir_all(&dir)?;
        let report = copy_into(&request.source_dir, &dir, &files);

        let deps = read_package_dependencies(&request.source_dir);
        let mut metadata = TemplateMetadata::new(
            &request.name,
            Provenance::local(request.source_dir.display().to_string()),
        );
        metadata.set_files(report.succeeded.iter().cloned());
        metadata.dependencies = deps.dependencies;
        metadata.dev_dependencies = deps.dev_dependencies;
        metadata.tags = request.tags.iter().cloned().collect();
        self.store.metadata().save(&request.name, &metadata)?;

        let entry = RegistryEntry::local(StorePaths::relative_template_path(&request.name))
            .with_description(request.description)
            .with_tags(request.tags);
        self.store.registry_mut().put(&request.name, entry)?;

        tracing::info!(
            "Saved template {} with {} file(s), {} failure(s)",
            request.name,
            report.succeeded.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Copy more files into a local template and extend its manifest.
    pub fn add_files(&mut self, name: &str, source_dir: &Path, paths: &[String]) -> Result<BatchReport> {
        let dir = self.local_dir(name, "add files to")?;
        let mut metadata = self.store.load_metadata(name)?;
        if !source_dir.is_dir() {
            return Err(BrickError::FileNotFound {
                path: source_dir.to_path_buf(),
            });
        }

        let files = scan::expand_paths(source_dir, paths, &scan::ignore_set(Vec::<String>::new()))?;
        let report = copy_into(source_dir, &dir, &files);

        let mut manifest: BTreeSet<String> = metadata.files.iter().cloned().collect();
        manifest.extend(report.succeeded.iter().cloned());
        metadata.set_files(manifest);
        metadata.touch();
        self.store.metadata().save(name, &metadata)?;
        self.touch_entry(name)?;

        Ok(report)
    }

    /// Remove paths from a local template's manifest and storage.
    ///
    /// A path matches a manifest entry exactly or as a directory prefix.
    pub fn remove_files(&mut self, name: &str, paths: &[String]) -> Result<RemoveReport> {
        let dir = self.local_dir(name, "remove files from")?;
        let mut metadata = self.store.load_metadata(name)?;

        let mut report = RemoveReport::default();
        let mut removed = BTreeSet::new();
        for raw in paths {
            let wanted = normalize_relative(raw)?;
            let prefix = format!("{}/", wanted);
            let matches: Vec<&String> = metadata
                .files
                .iter()
                .filter(|f| **f == wanted || f.starts_with(&prefix))
                .collect();
            if matches.is_empty() {
                report.unmatched.push(raw.clone());
            }
            removed.extend(matches.into_iter().cloned());
        }

        for file in &removed {
            let path = dir.join(file);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Failed to remove {}: {}", file, e);
                    report.record_failure(file, e);
                    continue;
                }
            }
            if let Some(parent) = path.parent() {
                scan::prune_empty_dirs(parent, &dir);
            }
        }
        for failure in &report.failed {
            removed.remove(&failure.path);
        }

        let remaining: Vec<String> = metadata
            .files
            .iter()
            .filter(|f| !removed.contains(*f))
            .cloned()
            .collect();
        metadata.set_files(remaining);
        metadata.touch();
        self.store.metadata().save(name, &metadata)?;
        self.touch_entry(name)?;

        report.removed = removed.into_iter().collect();
        Ok(report)
    }

    /// Remove a template: storage directory (local) and registry entry.
    pub fn delete(&mut self, name: &str) -> Result<RegistryEntry> {
        self.store.entry(name)?;
        purge(self.store, name)
    }

    /// Copy a template under a new name.
    pub fn clone_template(&mut self, name: &str, new_name: &str) -> Result<()> {
        validate_name(new_name)?;
        let entry = self.store.entry(name)?.clone();
        if self.store.registry().contains(new_name) {
            return Err(BrickError::AlreadyExists {
                name: new_name.to_string(),
            });
        }

        let copy = match &entry.storage {
            Storage::Local { .. } => {
                let mut metadata = self.store.load_metadata(name)?;
                let from = self.store.storage_dir(name)?;
                let to = self.store.paths().template_dir(new_name);
                scan::copy_dir(&from, &to)?;

                let now = Utc::now();
                metadata.name = new_name.to_string();
                metadata.created_at = now;
                metadata.updated_at = now;
                self.store.metadata().save(new_name, &metadata)?;

                RegistryEntry::local(StorePaths::relative_template_path(new_name))
            }
            Storage::Remote(remote) => RegistryEntry::remote(remote.clone()),
        };

        let copy = copy
            .with_description(entry.description)
            .with_tags(entry.tags);
        self.store.registry_mut().put(new_name, copy)
    }

    /// Rename a template, keeping its position in the registry.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<()> {
        validate_name(new_name)?;
        let mut entry = self.store.entry(name)?.clone();
        if name == new_name {
            return Ok(());
        }
        if self.store.registry().contains(new_name) {
            return Err(BrickError::AlreadyExists {
                name: new_name.to_string(),
            });
        }

        if entry.is_local() {
            let mut metadata = self.store.load_metadata(name)?;
            let from = self.store.storage_dir(name)?;
            let to = self.store.paths().template_dir(new_name);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&from, &to)?;

            metadata.name = new_name.to_string();
            metadata.touch();
            self.store.metadata().save(new_name, &metadata)?;
            entry.storage = Storage::Local {
                path: StorePaths::relative_template_path(new_name),
            };
        }

        entry.touch();
        let registry = self.store.registry_mut();
        registry.rename(name, new_name)?;
        registry.put(new_name, entry)
    }

    /// Change tags and description on both the entry and the metadata.
    pub fn update_details(&mut self, name: &str, update: DetailsUpdate) -> Result<RegistryEntry> {
        let mut entry = self.store.entry(name)?.clone();
        let metadata = if entry.is_local() {
            Some(self.store.load_metadata(name)?)
        } else {
            None
        };

        for tag in &update.remove_tags {
            entry.tags.remove(tag);
        }
        entry.tags.extend(update.add_tags.iter().cloned());
        if let Some(description) = update.description {
            entry.description = description;
        }
        entry.touch();

        if let Some(mut metadata) = metadata {
            metadata.tags = entry.tags.clone();
            metadata.touch();
            self.store.metadata().save(name, &metadata)?;
        }

        self.store.registry_mut().put(name, entry.clone())?;
        Ok(entry)
    }

    fn local_dir(&self, name: &str, operation: &str) -> Result<PathBuf> {
        let entry = self.store.entry(name)?;
        if !entry.is_local() {
            return Err(BrickError::NotLocal {
                name: name.to_string(),
                operation: operation.to_string(),
            });
        }
        self.store.storage_dir(name)
    }

    pub(crate) fn touch_entry(&mut self, name: &str) -> Result<()> {
        let mut entry = self.store.entry(name)?.clone();
        entry.touch();
        self.store.registry_mut().put(name, entry)
    }
}

/// Copy `files` from `from` into `to`, collecting per-file failures.
fn copy_into(from: &Path, to: &Path, files: &[String]) -> BatchReport {
    let mut report = BatchReport::default();
    for file in files {
        if file == METADATA_FILE {
            report.record_failure(file, format!("{} is reserved for template metadata", METADATA_FILE));
            continue;
        }
        match copy_file(&from.join(file), &to.join(file)) {
            Ok(_) => report.record_success(file),
            Err(e) => {
                tracing::warn!("Failed to copy {}: {}", file, e);
                report.record_failure(file, e);
            }
        }
    }
    report
}

/// Delete a template's local storage (if any) and its registry entry.
pub(crate) fn purge(store: &mut Store, name: &str) -> Result<RegistryEntry> {
    if let Ok(dir) = store.storage_dir(name) {
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
    }
    store
        .registry_mut()
        .remove(name)?
        .ok_or_else(|| BrickError::not_found(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        project: TempDir,
        store: Store,
    }

    fn fixture() -> Fixture {
        let root = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        for (rel, body) in [
            ("index.ts", "export * from './button';"),
            ("button.ts", "export const b = 1;"),
            ("styles/main.css", "body {}"),
            ("node_modules/dep/index.js", "x"),
            (
                "package.json",
                r#"{"dependencies":{"react":"^18.0.0"},"devDependencies":{"vitest":"1.0.0"}}"#,
            ),
        ] {
            let path = project.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        let store = Store::open(root.path()).unwrap();
        Fixture {
            _root: root,
            project,
            store,
        }
    }

    fn save(fx: &mut Fixture, name: &str, files: &[&str]) -> BatchReport {
        let request = SaveRequest {
            name: name.to_string(),
            source_dir: fx.project.path().to_path_buf(),
            files: files.iter().map(|s| s.to_string()).collect(),
            description: "demo".to_string(),
            tags: vec!["ui".to_string()],
            ..SaveRequest::default()
        };
        LocalTemplateEngine::new(&mut fx.store).save(request).unwrap()
    }

    #[test]
    fn save_whole_directory_skips_ignored() {
        let mut fx = fixture();
        let report = save(&mut fx, "demo", &[]);

        assert!(!report.has_failures());
        let meta = fx.store.load_metadata("demo").unwrap();
        assert_eq!(
            meta.files,
            vec!["button.ts", "index.ts", "package.json", "styles/main.css"]
        );
        assert_eq!(meta.dependencies["react"], "^18.0.0");
        assert_eq!(meta.dev_dependencies["vitest"], "1.0.0");
        assert!(meta.tags.contains("ui"));
        assert!(fx.store.verify("demo").unwrap().is_empty());
    }

    #[test]
    fn save_reports_missing_files_without_aborting() {
        let mut fx = fixture();
        let report = save(&mut fx, "demo", &["index.ts", "ghost.ts"]);

        assert_eq!(report.succeeded, vec!["index.ts"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, "ghost.ts");
        assert_eq!(fx.store.load_metadata("demo").unwrap().files, vec!["index.ts"]);
    }

    #[test]
    fn save_existing_name_requires_overwrite() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts"]);

        let request = SaveRequest {
            name: "demo".to_string(),
            source_dir: fx.project.path().to_path_buf(),
            ..SaveRequest::default()
        };
        let err = LocalTemplateEngine::new(&mut fx.store)
            .save(request.clone())
            .unwrap_err();
        assert!(matches!(err, BrickError::AlreadyExists { .. }));

        let overwrite = SaveRequest {
            overwrite: true,
            files: vec!["button.ts".to_string()],
            ..request
        };
        LocalTemplateEngine::new(&mut fx.store).save(overwrite).unwrap();
        assert_eq!(fx.store.load_metadata("demo").unwrap().files, vec!["button.ts"]);
        assert!(!fx.store.paths().template_dir("demo").join("index.ts").exists());
    }

    #[test]
    fn save_rejects_invalid_names_before_writing() {
        let mut fx = fixture();
        let request = SaveRequest {
            name: "bad name".to_string(),
            source_dir: fx.project.path().to_path_buf(),
            ..SaveRequest::default()
        };
        let err = LocalTemplateEngine::new(&mut fx.store).save(request).unwrap_err();
        assert!(matches!(err, BrickError::InvalidName { .. }));
        assert!(!fx.store.paths().templates_dir().exists());
    }

    #[test]
    fn add_then_remove_restores_manifest() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts"]);
        let before = fx.store.load_metadata("demo").unwrap().files;
        let source = fx.project.path().to_path_buf();

        let mut engine = LocalTemplateEngine::new(&mut fx.store);
        let added = engine
            .add_files("demo", &source, &["styles".to_string(), "button.ts".to_string()])
            .unwrap();
        assert_eq!(added.succeeded, vec!["button.ts", "styles/main.css"]);

        let removed = engine
            .remove_files("demo", &["styles".to_string(), "button.ts".to_string()])
            .unwrap();
        assert_eq!(removed.removed, vec!["button.ts", "styles/main.css"]);
        assert!(removed.unmatched.is_empty());

        assert_eq!(fx.store.load_metadata("demo").unwrap().files, before);
        assert!(!fx.store.paths().template_dir("demo").join("styles").exists());
        assert!(fx.store.verify("demo").unwrap().is_empty());
    }

    #[test]
    fn remove_reports_unmatched_paths() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts"]);

        let report = LocalTemplateEngine::new(&mut fx.store)
            .remove_files("demo", &["nope.ts".to_string()])
            .unwrap();
        assert!(report.removed.is_empty());
        assert_eq!(report.unmatched, vec!["nope.ts"]);
    }

    #[test]
    fn failed_overwrite_keeps_existing_template() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts"]);
        let empty = TempDir::new().unwrap();

        let err = LocalTemplateEngine::new(&mut fx.store)
            .save(SaveRequest {
                name: "demo".to_string(),
                source_dir: empty.path().to_path_buf(),
                overwrite: true,
                ..SaveRequest::default()
            })
            .unwrap_err();

        assert!(matches!(err, BrickError::InvalidArgument { .. }));
        assert!(fx.store.registry().contains("demo"));
        assert!(fx.store.paths().template_dir("demo").join("index.ts").exists());
        assert_eq!(fx.store.load_metadata("demo").unwrap().files, vec!["index.ts"]);
    }

    #[test]
    fn remove_keeps_manifest_entries_that_fail_to_delete() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts", "styles"]);
        let dir = fx.store.paths().template_dir("demo");
        // A directory where a file is expected cannot be unlinked.
        fs::remove_file(dir.join("styles/main.css")).unwrap();
        fs::create_dir_all(dir.join("styles/main.css/inner")).unwrap();

        let report = LocalTemplateEngine::new(&mut fx.store)
            .remove_files("demo", &["index.ts".to_string(), "styles".to_string()])
            .unwrap();

        assert_eq!(report.removed, vec!["index.ts"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, "styles/main.css");
        assert!(report.has_failures());
        assert!(!dir.join("index.ts").exists());
        assert_eq!(fx.store.load_metadata("demo").unwrap().files, vec!["styles/main.css"]);
    }

    #[test]
    fn add_files_on_remote_is_not_found() {
        let mut fx = fixture();
        fx.store
            .registry_mut()
            .put("gh", RegistryEntry::remote(crate::remote::RemoteRef::new("o", "r", "", "main")))
            .unwrap();
        let source = fx.project.path().to_path_buf();

        let err = LocalTemplateEngine::new(&mut fx.store)
            .add_files("gh", &source, &["index.ts".to_string()])
            .unwrap_err();
        assert!(matches!(err, BrickError::NotLocal { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_removes_directory_and_entry() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts"]);

        LocalTemplateEngine::new(&mut fx.store).delete("demo").unwrap();

        assert!(!fx.store.paths().template_dir("demo").exists());
        assert!(fx.store.registry().get("demo").is_none());
        assert!(fx.store.load_metadata("demo").is_err());
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let mut fx = fixture();
        let err = LocalTemplateEngine::new(&mut fx.store).delete("ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn clone_copies_files_with_fresh_identity() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts", "styles"]);

        LocalTemplateEngine::new(&mut fx.store)
            .clone_template("demo", "copy")
            .unwrap();

        let original = fx.store.load_metadata("demo").unwrap();
        let copy = fx.store.load_metadata("copy").unwrap();
        assert_eq!(copy.name, "copy");
        assert_eq!(copy.files, original.files);
        assert!(copy.created_at >= original.created_at);
        assert_eq!(fx.store.registry().get("copy").unwrap().description, "demo");
        assert!(fx.store.verify("copy").unwrap().is_empty());
    }

    #[test]
    fn clone_onto_existing_name_fails() {
        let mut fx = fixture();
        save(&mut fx, "a", &["index.ts"]);
        save(&mut fx, "b", &["index.ts"]);

        let err = LocalTemplateEngine::new(&mut fx.store)
            .clone_template("a", "b")
            .unwrap_err();
        assert!(matches!(err, BrickError::AlreadyExists { .. }));
    }

    #[test]
    fn rename_moves_storage_and_keeps_position() {
        let mut fx = fixture();
        save(&mut fx, "first", &["index.ts"]);
        save(&mut fx, "second", &["index.ts"]);

        LocalTemplateEngine::new(&mut fx.store)
            .rename("first", "renamed")
            .unwrap();

        assert_eq!(fx.store.registry().names(), vec!["renamed", "second"]);
        assert!(fx.store.paths().template_dir("renamed").join("index.ts").exists());
        assert!(!fx.store.paths().template_dir("first").exists());
        assert_eq!(fx.store.load_metadata("renamed").unwrap().name, "renamed");
        assert!(fx.store.verify("renamed").unwrap().is_empty());
    }

    #[test]
    fn update_details_syncs_entry_and_metadata() {
        let mut fx = fixture();
        save(&mut fx, "demo", &["index.ts"]);

        let entry = LocalTemplateEngine::new(&mut fx.store)
            .update_details(
                "demo",
                DetailsUpdate {
                    add_tags: vec!["react".into()],
                    remove_tags: vec!["ui".into()],
                    description: Some("Buttons".into()),
                },
            )
            .unwrap();

        assert_eq!(entry.description, "Buttons");
        let expected: BTreeSet<String> = ["react".to_string()].into_iter().collect();
        assert_eq!(entry.tags, expected);
        assert_eq!(fx.store.load_metadata("demo").unwrap().tags, expected);
    }
}
