//! Free-form user settings (`config.json`).
//!
//! Settings are a flat JSON object. A few keys have typed accessors; every
//! other key is preserved verbatim across rewrites.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::atomic::write_atomic;
use super::paths::StorePaths;
use crate::error::{BrickError, Result};

/// Key holding the GitHub API token.
pub const GITHUB_TOKEN_KEY: &str = "githubToken";

/// Key holding extra names to skip when saving a directory.
pub const IGNORE_KEY: &str = "ignore";

/// Loaded settings file.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Settings {
    /// Load settings for a root. A missing file yields empty settings.
    pub fn load(paths: &StorePaths) -> Result<Self> {
        let path = paths.config_file();

        if !path.exists() {
            return Ok(Self {
                path,
                values: Map::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let values: Map<String, Value> =
            serde_json::from_str(&content).map_err(|e| BrickError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save settings using atomic write.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.values).map_err(anyhow::Error::from)?;
        write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a key. The raw value is stored as JSON when it parses as JSON,
    /// otherwise as a string.
    pub fn set(&mut self, key: &str, raw: &str) {
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        self.values.insert(key.to_string(), value);
    }

    pub fn unset(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// GitHub token from settings, if set and non-empty.
    pub fn github_token(&self) -> Option<&str> {
        self.values
            .get(GITHUB_TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Extra ignored names (array of strings, or a comma-separated string).
    pub fn ignore_names(&self) -> Vec<String> {
        match self.values.get(IGNORE_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Redacted display value (tokens are masked).
    pub fn display_value(key: &str, value: &Value) -> String {
        if key == GITHUB_TOKEN_KEY {
            if let Some(token) = value.as_str() {
                let visible: String = token.chars().take(4).collect();
                return format!("{}…", visible);
            }
        }
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&StorePaths::new(temp.path())).unwrap();
        assert!(settings.github_token().is_none());
        assert_eq!(settings.iter().count(), 0);
    }

    #[test]
    fn set_save_reload_preserves_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let paths = StorePaths::new(temp.path());
        fs::write(paths.config_file(), r#"{"theme": {"color": "blue"}}"#).unwrap();

        let mut settings = Settings::load(&paths).unwrap();
        settings.set(GITHUB_TOKEN_KEY, "ghp_secret");
        settings.save().unwrap();

        let reloaded = Settings::load(&paths).unwrap();
        assert_eq!(reloaded.github_token(), Some("ghp_secret"));
        assert_eq!(reloaded.get("theme").unwrap()["color"], "blue");
    }

    #[test]
    fn set_parses_json_values() {
        let mut settings = Settings::default();
        settings.set("ignore", r#"["dist", "coverage"]"#);
        settings.set("limit", "10");
        settings.set("name", "plain text");

        assert_eq!(settings.ignore_names(), vec!["dist", "coverage"]);
        assert_eq!(settings.get("limit"), Some(&Value::from(10)));
        assert_eq!(settings.get("name"), Some(&Value::from("plain text")));
    }

    #[test]
    fn ignore_accepts_comma_string() {
        let mut settings = Settings::default();
        settings.set("ignore", "dist, .cache,,tmp");
        assert_eq!(settings.ignore_names(), vec!["dist", ".cache", "tmp"]);
    }

    #[test]
    fn token_is_masked_for_display() {
        let shown = Settings::display_value(GITHUB_TOKEN_KEY, &Value::from("ghp_abcdef"));
        assert_eq!(shown, "ghp_…");
        assert!(!shown.contains("abcdef"));
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let paths = StorePaths::new(temp.path());
        fs::write(paths.config_file(), "[1, 2").unwrap();
        assert!(matches!(
            Settings::load(&paths),
            Err(BrickError::ConfigParseError { .. })
        ));
    }
}
