//! Materializing a template into a destination directory.
//!
//! Application runs in two phases. Files with no counterpart at the
//! destination are written first; conflicting files are then resolved one by
//! one according to the [`ConflictPolicy`]. Cancelling during the second
//! phase stops processing but keeps everything already written.

use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use super::scan::normalize_relative;
use super::source::{open_source, FileSource};
use crate::error::{BrickError, Result};
use crate::remote::RemoteFetcher;
use crate::store::Store;

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Ask the resolver per file.
    #[default]
    Ask,
    Overwrite,
    Skip,
}

/// Options for one apply run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    pub policy: ConflictPolicy,
    /// Report what would happen without writing or prompting.
    pub dry_run: bool,
}

impl ApplyOptions {
    /// Build options from command-line flags.
    ///
    /// `force` and `skip_existing` are mutually exclusive.
    pub fn from_flags(force: bool, skip_existing: bool, dry_run: bool) -> Result<Self> {
        let policy = match (force, skip_existing) {
            (true, true) => {
                return Err(BrickError::InvalidArgument {
                    message: "--force and --skip-existing cannot be used together".to_string(),
                })
            }
            (true, false) => ConflictPolicy::Overwrite,
            (false, true) => ConflictPolicy::Skip,
            (false, false) => ConflictPolicy::Ask,
        };
        Ok(Self { policy, dry_run })
    }
}

/// Answer to a single conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    Overwrite,
    Skip,
    /// Stop processing the remaining conflicts.
    Cancel,
}

/// Decides conflicts under [`ConflictPolicy::Ask`].
pub trait ConflictResolver {
    fn decide(&mut self, relative: &str, destination: &Path) -> Result<ConflictDecision>;
}

/// Resolver that always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedResolver(pub ConflictDecision);

impl ConflictResolver for FixedResolver {
    fn decide(&mut self, _relative: &str, _destination: &Path) -> Result<ConflictDecision> {
        Ok(self.0)
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "action", content = "error")]
pub enum FileAction {
    Created,
    Overwritten,
    Skipped,
    /// Not processed because the user cancelled.
    Cancelled,
    /// Dry run: the conflict would be asked about.
    Pending,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: String,
    /// A file already existed at the destination.
    pub conflict: bool,
    pub action: FileAction,
}

/// Result of applying a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub template: String,
    pub destination: PathBuf,
    pub dry_run: bool,
    pub cancelled: bool,
    pub files: Vec<FileOutcome>,
}

impl ApplyReport {
    fn new(template: &str, destination: &Path, dry_run: bool) -> Self {
        Self {
            template: template.to_string(),
            destination: destination.to_path_buf(),
            dry_run,
            cancelled: false,
            files: Vec::new(),
        }
    }

    fn record(&mut self, path: &str, conflict: bool, action: FileAction) {
        self.files.push(FileOutcome {
            path: path.to_string(),
            conflict,
            action,
        });
    }

    /// Files created or overwritten (or that would be, on a dry run).
    pub fn written(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.action, FileAction::Created | FileAction::Overwritten))
            .count()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.conflict)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files
            .iter()
            .filter(|f| matches!(f.action, FileAction::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn outcome(&self, path: &str) -> Option<&FileAction> {
        self.files.iter().find(|f| f.path == path).map(|f| &f.action)
    }
}

/// Writes templates into destination directories.
pub struct ApplyEngine<'a> {
    store: &'a Store,
    fetcher: &'a dyn RemoteFetcher,
}

impl<'a> ApplyEngine<'a> {
    pub fn new(store: &'a Store, fetcher: &'a dyn RemoteFetcher) -> Self {
        Self { store, fetcher }
    }

    /// Apply a registered template to `destination`.
    pub fn apply(
        &self,
        name: &str,
        destination: &Path,
        options: ApplyOptions,
        resolver: &mut dyn ConflictResolver,
    ) -> Result<ApplyReport> {
        let source = open_source(self.store, name, self.fetcher)?;
        apply_source(name, source.as_ref(), destination, options, resolver)
    }
}

/// Apply any [`FileSource`] to `destination`.
pub fn apply_source(
    name: &str,
    source: &dyn FileSource,
    destination: &Path,
    options: ApplyOptions,
    resolver: &mut dyn ConflictResolver,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::new(name, destination, options.dry_run);
    if !options.dry_run {
        fs::create_dir_all(destination)?;
    }

    let mut conflicts = Vec::new();
    for file in source.files() {
        let relative = match normalize_relative(file) {
            Ok(relative) => relative,
            Err(e) => {
                report.record(file, false, FileAction::Failed(e.to_string()));
                continue;
            }
        };
        let target = destination.join(&relative);
        if target.exists() {
            conflicts.push((file.as_str(), target));
            continue;
        }

        let action = if options.dry_run {
            FileAction::Created
        } else {
            write_one(source, file, &target, FileAction::Created)
        };
        report.record(file, false, action);
    }

    let mut pending = conflicts.into_iter();
    while let Some((file, target)) = pending.next() {
        let decision = match options.policy {
            ConflictPolicy::Overwrite => ConflictDecision::Overwrite,
            ConflictPolicy::Skip => ConflictDecision::Skip,
            ConflictPolicy::Ask if options.dry_run => {
                report.record(file, true, FileAction::Pending);
                continue;
            }
            ConflictPolicy::Ask => match resolver.decide(file, &target) {
                Ok(decision) => decision,
                Err(BrickError::Cancelled) => ConflictDecision::Cancel,
                Err(e) => return Err(e),
            },
        };

        match decision {
            ConflictDecision::Overwrite => {
                let action = if options.dry_run {
                    FileAction::Overwritten
                } else {
                    write_one(source, file, &target, FileAction::Overwritten)
                };
                report.record(file, true, action);
            }
            ConflictDecision::Skip => report.record(file, true, FileAction::Skipped),
            ConflictDecision::Cancel => {
                report.cancelled = true;
                report.record(file, true, FileAction::Cancelled);
                for (rest, _) in pending.by_ref() {
                    report.record(rest, true, FileAction::Cancelled);
                }
            }
        }
    }

    tracing::info!(
        "Applied {} to {}: {} written, {} conflict(s)",
        name,
        destination.display(),
        report.written(),
        report.conflicts().count()
    );
    Ok(report)
}

fn write_one(source: &dyn FileSource, relative: &str, target: &Path, success: FileAction) -> FileAction {
    match copy_stream(source, relative, target) {
        Ok(()) => success,
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", target.display(), e);
            FileAction::Failed(e.to_string())
        }
    }
}

fn copy_stream(source: &dyn FileSource, relative: &str, target: &Path) -> Result<()> {
    let mut reader = source.open(relative)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(target)?;
    io::copy(&mut reader, &mut out)?;
    Ok(())
}
