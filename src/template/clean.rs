//! Stripping project-relative imports from saved files.
//!
//! A template saved out of a larger project often imports siblings that were
//! not saved with it. Cleaning drops those import lines so the template
//! applies without dangling references. Rules are line-oriented and keyed by
//! file extension; multi-line import statements are left untouched.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use super::local::LocalTemplateEngine;
use crate::error::{BrickError, Result};
use crate::store::atomic::write_atomic;
use crate::store::TemplateKind;

static JS_RELATIVE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?:import\s+(?:type\s+)?(?:[^'"]*?\s+from\s+)?|export\s+(?:type\s+)?(?:\*|\{[^}]*\})(?:\s+as\s+\w+)?\s+from\s+|(?:const|let|var)\s+[^=]+=\s*require\(\s*)['"](?:\.{1,2}/|@/|~/)"#,
    )
    .expect("JS_RELATIVE_IMPORT must compile")
});

static PY_RELATIVE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*from\s+\.+[\w.]*\s+import\s").expect("PY_RELATIVE_IMPORT must compile")
});

static RUST_CRATE_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+(?:crate|super|self)::")
        .expect("RUST_CRATE_USE must compile")
});

static CSS_RELATIVE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*@(?:import|use|forward)\s+(?:url\()?['"](?:\.{1,2}/|@/|~/)"#)
        .expect("CSS_RELATIVE_IMPORT must compile")
});

/// Verdict for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Keep,
    Drop,
}

/// Decides whether a line survives cleaning.
pub type LineRule = fn(&str) -> LineAction;

fn drop_if(matches: bool) -> LineAction {
    if matches {
        LineAction::Drop
    } else {
        LineAction::Keep
    }
}

fn js_rule(line: &str) -> LineAction {
    drop_if(JS_RELATIVE_IMPORT.is_match(line))
}

fn python_rule(line: &str) -> LineAction {
    drop_if(PY_RELATIVE_IMPORT.is_match(line))
}

fn rust_rule(line: &str) -> LineAction {
    drop_if(RUST_CRATE_USE.is_match(line))
}

fn css_rule(line: &str) -> LineAction {
    drop_if(CSS_RELATIVE_IMPORT.is_match(line))
}

/// Extension-keyed rule table.
#[derive(Clone, Default)]
pub struct CleanRules {
    rules: HashMap<String, LineRule>,
}

impl CleanRules {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rules for JavaScript/TypeScript, Vue/Svelte, Python, Rust, and stylesheets.
    pub fn builtin() -> Self {
        let mut rules = Self::empty();
        for ext in ["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "vue", "svelte"] {
            rules.register(ext, js_rule);
        }
        rules.register("py", python_rule);
        rules.register("rs", rust_rule);
        for ext in ["css", "scss", "sass", "less"] {
            rules.register(ext, css_rule);
        }
        rules
    }

    pub fn register(&mut self, extension: &str, rule: LineRule) {
        self.rules.insert(extension.to_ascii_lowercase(), rule);
    }

    pub fn rule_for(&self, path: &str) -> Option<LineRule> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        self.rules.get(&ext).copied()
    }
}

/// Apply a rule to text, returning the cleaned text and the dropped lines.
///
/// Line endings of kept lines are preserved byte for byte.
pub fn clean_text(text: &str, rule: LineRule) -> (String, Vec<String>) {
    let mut kept = String::with_capacity(text.len());
    let mut dropped = Vec::new();
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        match rule(content) {
            LineAction::Keep => kept.push_str(line),
            LineAction::Drop => dropped.push(content.to_string()),
        }
    }
    (kept, dropped)
}

/// One file changed by cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedFile {
    pub path: String,
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub dry_run: bool,
    pub files: Vec<CleanedFile>,
}

impl CleanReport {
    pub fn dropped_lines(&self) -> usize {
        self.files.iter().map(|f| f.dropped.len()).sum()
    }
}

impl LocalTemplateEngine<'_> {
    /// Strip relative imports from every manifest file with a matching rule.
    pub fn clean(&mut self, name: &str, rules: &CleanRules, dry_run: bool) -> Result<CleanReport> {
        let entry = self.store.entry(name)?;
        if !entry.is_local() {
            return Err(BrickError::unsupported(name, "clean", TemplateKind::Remote));
        }
        let mut metadata = self.store.load_metadata(name)?;
        let dir = self.store.storage_dir(name)?;

        let mut report = CleanReport {
            dry_run,
            files: Vec::new(),
        };
        for file in &metadata.files {
            let Some(rule) = rules.rule_for(file) else {
                continue;
            };
            let path = dir.join(file);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Skipping {} while cleaning: {}", file, e);
                    continue;
                }
            };

            let (cleaned, dropped) = clean_text(&text, rule);
            if dropped.is_empty() {
                continue;
            }
            if !dry_run {
                write_atomic(&path, cleaned.as_bytes())?;
            }
            report.files.push(CleanedFile {
                path: file.clone(),
                dropped,
            });
        }

        if !dry_run && !report.files.is_empty() {
            metadata.touch();
            self.store.metadata().save(name, &metadata)?;
            self.touch_entry(name)?;
        }
        Ok(report)
    }
}
