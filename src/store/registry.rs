//! The template registry (`store.json`).
//!
//! The registry is the single index mapping template name to a summary
//! entry, and the only authority on name uniqueness. It is read fully into
//! memory on [`Registry::open`] and rewritten fully (atomically) on every
//! mutation. There is no locking: concurrent `brick` processes writing the
//! same root race, and the last writer wins.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::atomic::write_atomic;
use super::entry::RegistryEntry;
use super::paths::StorePaths;
use super::resolver::Selector;
use crate::error::{BrickError, Result};

/// Serialized form of `store.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryIndex {
    /// Schema version for migration.
    pub version: u32,
    /// Entries in insertion order; written as a JSON object.
    #[serde(default, with = "ordered_entries")]
    pub templates: Vec<(String, RegistryEntry)>,
}

impl Default for RegistryIndex {
    fn default() -> Self {
        Self {
            version: Registry::CURRENT_VERSION,
            templates: Vec::new(),
        }
    }
}

/// Open handle on a root's registry.
#[derive(Debug)]
pub struct Registry {
    path: PathBuf,
    index: RegistryIndex,
}

impl Registry {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Load the registry for a root. A missing file is an empty registry.
    pub fn open(paths: &StorePaths) -> Result<Self> {
        let path = paths.registry_file();

        let index = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| BrickError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            RegistryIndex::default()
        };

        tracing::debug!(
            "Opened registry {} ({} templates)",
            path.display(),
            index.templates.len()
        );

        Ok(Self { path, index })
    }

    /// Path of the backing `store.json`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.position(name).map(|i| &self.index.templates[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Name at a 0-based list position.
    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.index.templates.get(position).map(|(n, _)| n.as_str())
    }

    /// Insert or replace an entry and persist.
    ///
    /// Replacing keeps the entry's position; new names are appended.
    pub fn put(&mut self, name: &str, entry: RegistryEntry) -> Result<()> {
        match self.position(name) {
            Some(i) => self.index.templates[i].1 = entry,
            None => self.index.templates.push((name.to_string(), entry)),
        }
        self.flush()
    }

    /// Remove an entry and persist. Returns the removed entry, if any.
    pub fn remove(&mut self, name: &str) -> Result<Option<RegistryEntry>> {
        let Some(i) = self.position(name) else {
            return Ok(None);
        };
        let (_, entry) = self.index.templates.remove(i);
        self.flush()?;
        Ok(Some(entry))
    }

    /// Re-key an entry in place and persist.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if self.contains(new) {
            return Err(BrickError::AlreadyExists {
                name: new.to_string(),
            });
        }
        let i = self
            .position(old)
            .ok_or_else(|| BrickError::not_found(old))?;
        self.index.templates[i].0 = new.to_string();
        self.flush()
    }

    /// Entries in registry order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.index.templates.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn names(&self) -> Vec<&str> {
        self.list().map(|(n, _)| n).collect()
    }

    pub fn len(&self) -> usize {
        self.index.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.templates.is_empty()
    }

    /// Resolve a selector to a canonical name.
    pub fn resolve(&self, selector: &Selector) -> Result<String> {
        selector.resolve(self)
    }

    /// Rewrite `store.json` from memory.
    pub fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.index).map_err(anyhow::Error::from)?;
        write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    /// Flush and release the handle.
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.index.templates.iter().position(|(n, _)| n == name)
    }
}

/// Serialize `Vec<(name, entry)>` as a JSON object, preserving order both ways.
mod ordered_entries {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use crate::store::entry::RegistryEntry;

    pub fn serialize<S: Serializer>(
        entries: &[(String, RegistryEntry)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, entry) in entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, RegistryEntry)>, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(String, RegistryEntry)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of template names to entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, RegistryEntry)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, entry)) = access.next_entry::<String, RegistryEntry>()? {
                    match entries.iter_mut().find(|(n, _)| *n == name) {
                        Some(slot) => slot.1 = entry,
                        None => entries.push((name, entry)),
                    }
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
