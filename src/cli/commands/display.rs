//! Shared display helpers for commands.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::{BrickError, Result};
use crate::store::{RegistryEntry, Selector, Storage, Store};
use crate::template::FileFailure;
use crate::ui::{should_use_colors, BrickTheme, UserInterface};

/// Resolve a name-or-index argument against the store.
pub fn resolve(store: &Store, raw: &str) -> Result<String> {
    store.resolve(&Selector::parse(raw))
}

/// Theme for command output, plain when colors are off.
pub fn theme() -> BrickTheme {
    if should_use_colors() {
        BrickTheme::new()
    } else {
        BrickTheme::plain()
    }
}

/// Comma-separated tags, or `-` when there are none.
pub fn format_tags(tags: &BTreeSet<String>) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Where a template's files live, for one-line display.
pub fn location(entry: &RegistryEntry) -> String {
    match &entry.storage {
        Storage::Local { path } => path.clone(),
        Storage::Remote(remote) => remote.to_string(),
    }
}

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| BrickError::Other(e.into()))
}

/// Per-file failures as warnings.
pub fn show_batch_failures(ui: &mut dyn UserInterface, failures: &[FileFailure]) {
    for failure in failures {
        ui.warning(&format!("{}: {}", failure.path, failure.error));
    }
}

/// Render sorted manifest paths as an indented tree.
///
/// Directories are printed once, followed by their children:
///
/// ```text
/// a.ts
/// sub/
///   b.ts
/// ```
pub fn render_tree(files: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut open: Vec<&str> = Vec::new();

    for file in files {
        let parts: Vec<&str> = file.split('/').collect();
        let (dirs, leaf) = parts.split_at(parts.len() - 1);

        let shared = open
            .iter()
            .zip(dirs.iter())
            .take_while(|(a, b)| a == b)
            .count();
        open.truncate(shared);

        for dir in &dirs[shared..] {
            lines.push(format!("{}{}/", "  ".repeat(open.len()), dir));
            open.push(*dir);
        }
        lines.push(format!("{}{}", "  ".repeat(open.len()), leaf[0]));
    }

    lines
}
