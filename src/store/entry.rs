//! Registry entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::remote::RemoteRef;

/// Where a template's files live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Files are stored under the brick root.
    #[default]
    Local,
    /// Files are fetched on demand from GitHub.
    Remote,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Storage coordinates, tagged by `type` in `store.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Storage {
    Local {
        /// Storage directory relative to the brick root.
        path: String,
    },
    Remote(RemoteRef),
}

impl Storage {
    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Local { .. } => TemplateKind::Local,
            Self::Remote(_) => TemplateKind::Remote,
        }
    }

    pub fn as_remote(&self) -> Option<&RemoteRef> {
        match self {
            Self::Remote(remote) => Some(remote),
            Self::Local { .. } => None,
        }
    }
}

/// Summary of one template in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    #[serde(flatten)]
    pub storage: Storage,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegistryEntry {
    /// New entry with both timestamps set to now.
    pub fn new(storage: Storage) -> Self {
        let now = Utc::now();
        Self {
            storage,
            description: String::new(),
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Entry for a local template stored at `relative_path`.
    pub fn local(relative_path: impl Into<String>) -> Self {
        Self::new(Storage::Local {
            path: relative_path.into(),
        })
    }

    /// Entry for a remote template.
    pub fn remote(remote: RemoteRef) -> Self {
        Self::new(Storage::Remote(remote))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn kind(&self) -> TemplateKind {
        self.storage.kind()
    }

    pub fn is_local(&self) -> bool {
        self.kind() == TemplateKind::Local
    }

    /// Bump `updated_at`; `created_at` is never touched.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}
