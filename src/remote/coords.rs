//! GitHub coordinates for remote templates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BrickError, Result};

/// Branch used when a reference omits one.
pub const DEFAULT_REF: &str = "main";

fn default_ref() -> String {
    DEFAULT_REF.to_string()
}

/// Location of a template directory inside a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef {
    pub owner: String,
    pub repo: String,
    /// Directory inside the repository; empty for the repository root.
    #[serde(default)]
    pub path: String,
    /// Branch or tag name.
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
    /// Pinned commit SHA; overrides `git_ref` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl RemoteRef {
    pub fn new(owner: &str, repo: &str, path: &str, git_ref: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: path.trim_matches('/').to_string(),
            git_ref: git_ref.to_string(),
            commit: None,
        }
    }

    /// Pin to a specific commit.
    pub fn with_commit(mut self, sha: impl Into<String>) -> Self {
        self.commit = Some(sha.into());
        self
    }

    /// The revision to fetch: the pinned commit, else the ref.
    pub fn revision(&self) -> &str {
        self.commit.as_deref().unwrap_or(&self.git_ref)
    }

    /// Parse a GitHub URL or `owner/repo[/path][@ref]` shorthand.
    ///
    /// Accepted URL forms:
    /// - `https://github.com/owner/repo`
    /// - `https://github.com/owner/repo/tree/<ref>/<path>`
    /// - `https://github.com/owner/repo.git`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);

        if let Some(rest) = without_scheme.strip_prefix("github.com/") {
            return Self::parse_url_path(rest, input);
        }

        Self::parse_shorthand(without_scheme, input)
    }

    fn parse_url_path(rest: &str, original: &str) -> Result<Self> {
        let segments: Vec<&str> = rest
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if segments.len() < 2 {
            return Err(invalid(original));
        }

        let owner = segments[0];
        let repo = segments[1].trim_end_matches(".git");

        match segments.get(2) {
            None => Ok(Self::new(owner, repo, "", DEFAULT_REF)),
            Some(&"tree") | Some(&"blob") => {
                let git_ref = segments.get(3).ok_or_else(|| invalid(original))?;
                let path = segments[4..].join("/");
                Ok(Self::new(owner, repo, &path, git_ref))
            }
            Some(_) => Err(invalid(original)),
        }
    }

    fn parse_shorthand(shorthand: &str, original: &str) -> Result<Self> {
        let (location, git_ref) = match shorthand.rsplit_once('@') {
            Some((loc, r)) if !r.is_empty() => (loc, r),
            Some(_) => return Err(invalid(original)),
            None => (shorthand, DEFAULT_REF),
        };

        let mut parts = location.trim_matches('/').splitn(3, '/');
        let owner = parts.next().filter(|s| !s.is_empty());
        let repo = parts.next().filter(|s| !s.is_empty());

        match (owner, repo) {
            (Some(owner), Some(repo)) => {
                let path = parts.next().unwrap_or("");
                Ok(Self::new(owner, repo, path, git_ref))
            }
            _ => Err(invalid(original)),
        }
    }
}

fn invalid(input: &str) -> BrickError {
    BrickError::InvalidArgument {
        message: format!(
            "'{}' is not a GitHub URL or owner/repo[/path][@ref] reference",
            input
        ),
    }
}

impl fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if !self.path.is_empty() {
            write!(f, "/{}", self.path)?;
        }
        write!(f, "@{}", self.revision())
    }
}
