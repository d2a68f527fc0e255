//! On-disk layout of a brick root directory.

use std::path::{Path, PathBuf};

/// File name of the per-template metadata record.
pub const METADATA_FILE: &str = "brick.json";

/// File name of the registry index.
pub const REGISTRY_FILE: &str = "store.json";

/// File name of the free-form settings file.
pub const CONFIG_FILE: &str = "config.json";

/// Directory (relative to the root) holding local template storage.
pub const TEMPLATES_DIR: &str = "templates";

/// Paths under a single brick root.
///
/// ```text
/// <root>/
///   config.json
///   store.json
///   templates/<name>/brick.json
///   templates/<name>/...template files
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    root: PathBuf,
}

impl StorePaths {
    /// Create paths for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default root: `~/.brick`.
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join(".brick")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn registry_file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    /// Storage directory for a local template.
    pub fn template_dir(&self, name: &str) -> PathBuf {
        self.templates_dir().join(name)
    }

    /// Storage path as recorded in a registry entry (relative to the root).
    pub fn relative_template_path(name: &str) -> String {
        format!("{}/{}", TEMPLATES_DIR, name)
    }

    /// Resolve a registry-recorded relative path against the root.
    pub fn resolve_relative(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn metadata_file(&self, name: &str) -> PathBuf {
        self.template_dir(name).join(METADATA_FILE)
    }
}
