//! Directory walking and relative-path handling.
//!
//! Manifest paths are always relative, forward-slash separated, and never
//! escape their base directory.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{BrickError, Result};

/// Names skipped when saving a whole directory.
pub const DEFAULT_IGNORE: &[&str] = &[
    ".git",
    "node_modules",
    ".DS_Store",
    "dist",
    "build",
    "coverage",
    ".next",
    ".turbo",
    "target",
];

/// Default ignore set plus any extra names.
pub fn ignore_set<I, S>(extra: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DEFAULT_IGNORE
        .iter()
        .map(|s| s.to_string())
        .chain(extra.into_iter().map(Into::into))
        .collect()
}

/// All files under `dir` as sorted relative paths.
///
/// Any path component whose name is in `ignore` is pruned along with its
/// subtree.
pub fn list_files(dir: &Path, ignore: &BTreeSet<String>) -> Result<Vec<String>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.file_name()
                .to_str()
                .map(|n| !ignore.contains(n))
                .unwrap_or(true)
        });

    for entry in walker {
        let entry = entry.map_err(|e| BrickError::Io(io::Error::other(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            files.push(to_manifest_path(relative));
        }
    }

    files.sort();
    Ok(files)
}

/// Render a relative path with forward slashes.
pub fn to_manifest_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalize user input into a manifest path.
///
/// Strips `./` and trailing slashes and converts backslashes. Rejects
/// absolute paths and `..` components.
pub fn normalize_relative(input: &str) -> Result<String> {
    let unified = input.trim().replace('\\', "/");
    let path = Path::new(&unified);

    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(BrickError::InvalidArgument {
                    message: format!("'{}' must be a relative path inside the directory", input),
                })
            }
        }
    }

    if parts.is_empty() {
        return Err(BrickError::InvalidArgument {
            message: format!("'{}' does not name a file", input),
        });
    }

    Ok(parts.join("/"))
}

/// Expand user paths relative to `base` into manifest files.
///
/// Directories expand to every file beneath them; anything else is kept
/// as-is so that a later copy reports it per file.
pub fn expand_paths(base: &Path, paths: &[String], ignore: &BTreeSet<String>) -> Result<Vec<String>> {
    let mut expanded = BTreeSet::new();

    for raw in paths {
        let relative = normalize_relative(raw)?;
        let full = base.join(&relative);
        if full.is_dir() {
            for file in list_files(&full, ignore)? {
                expanded.insert(format!("{}/{}", relative, file));
            }
        } else {
            expanded.insert(relative);
        }
    }

    Ok(expanded.into_iter().collect())
}

/// Copy one file, creating parent directories of the destination.
pub fn copy_file(from: &Path, to: &Path) -> io::Result<u64> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to)
}

/// Recursively copy a directory tree.
pub fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    for file in list_files(from, &BTreeSet::new())? {
        copy_file(&from.join(&file), &to.join(&file))?;
    }
    fs::create_dir_all(to)?;
    Ok(())
}

/// Remove now-empty directories from `start` up to (not including) `stop`.
pub fn prune_empty_dirs(start: &Path, stop: &Path) {
    let mut current: Option<PathBuf> = Some(start.to_path_buf());
    while let Some(dir) = current {
        if dir == stop || !dir.starts_with(stop) {
            break;
        }
        if fs::remove_dir(&dir).is_err() {
            break;
        }
        current = dir.parent().map(Path::to_path_buf);
    }
}
