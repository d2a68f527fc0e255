//! Per-template metadata (`brick.json`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use super::atomic::write_atomic;
use super::entry::TemplateKind;
use super::paths::{StorePaths, METADATA_FILE};
use crate::error::Result;

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Where a template's content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// `local`, `import`, or `github:<owner>/<repo>`.
    pub origin: String,
    /// Source directory, archive name, or remote path.
    #[serde(default)]
    pub path: String,
}

impl Provenance {
    pub const LOCAL: &'static str = "local";
    pub const IMPORT: &'static str = "import";

    pub fn local(path: impl Into<String>) -> Self {
        Self {
            origin: Self::LOCAL.to_string(),
            path: path.into(),
        }
    }

    pub fn imported(path: impl Into<String>) -> Self {
        Self {
            origin: Self::IMPORT.to_string(),
            path: path.into(),
        }
    }

    pub fn github(owner: &str, repo: &str, path: impl Into<String>) -> Self {
        Self {
            origin: format!("github:{}/{}", owner, repo),
            path: path.into(),
        }
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Self::local("")
    }
}

/// Detailed record for a local template.
///
/// `files` is the manifest: the authoritative list of files belonging to the
/// template. It is a snapshot kept current by every structural mutation and
/// is always sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TemplateKind,
    /// Informational only; never compared.
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub source: Provenance,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateMetadata {
    /// Fresh metadata for a local template.
    pub fn new(name: impl Into<String>, source: Provenance) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            kind: TemplateKind::Local,
            version: default_version(),
            source,
            files: Vec::new(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the manifest, normalizing to sorted unique entries.
    pub fn set_files<I, S>(&mut self, files: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = files.into_iter().map(Into::into).collect();
        self.files = unique.into_iter().collect();
    }

    /// Bump `updated_at`; `created_at` is never touched.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.binary_search_by(|f| f.as_str().cmp(path)).is_ok()
    }
}

/// Reads and writes `brick.json` files under the templates directory.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    templates_dir: PathBuf,
}

impl MetadataStore {
    pub fn new(paths: &StorePaths) -> Self {
        Self {
            templates_dir: paths.templates_dir(),
        }
    }

    /// Path of a template's `brick.json`.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.templates_dir.join(name).join(METADATA_FILE)
    }

    /// Load metadata. Missing or unparsable files are "not found", never errors.
    pub fn load(&self, name: &str) -> Option<TemplateMetadata> {
        read_metadata(&self.file_path(name))
    }

    /// Write metadata atomically (temp file + rename).
    pub fn save(&self, name: &str, metadata: &TemplateMetadata) -> Result<()> {
        let content = serde_json::to_string_pretty(metadata).map_err(anyhow::Error::from)?;
        write_atomic(&self.file_path(name), content.as_bytes())?;
        Ok(())
    }

    /// Delete a template's `brick.json` if present.
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Parse a `brick.json` at an arbitrary path (e.g. inside an unpacked archive).
pub fn read_metadata(path: &Path) -> Option<TemplateMetadata> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::warn!("Ignoring unreadable metadata {}: {}", path.display(), e);
            None
        }
    }
}
