//! Per-file outcome reporting for batch operations.

use serde::Serialize;

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

/// Result of copying a set of files (save, add).
///
/// Individual failures do not abort the batch; they are listed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<FileFailure>,
}

impl BatchReport {
    pub fn record_success(&mut self, path: impl Into<String>) {
        self.succeeded.push(path.into());
    }

    pub fn record_failure(&mut self, path: impl Into<String>, error: impl ToString) {
        self.failed.push(FileFailure {
            path: path.into(),
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Result of removing manifest entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoveReport {
    /// Manifest entries that were removed.
    pub removed: Vec<String>,
    /// Requested paths that matched nothing in the manifest.
    pub unmatched: Vec<String>,
    /// Files that could not be deleted; they stay in the manifest.
    pub failed: Vec<FileFailure>,
}

impl RemoveReport {
    pub fn record_failure(&mut self, path: impl Into<String>, error: impl ToString) {
        self.failed.push(FileFailure {
            path: path.into(),
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_report_tracks_failures() {
        let mut report = BatchReport::default();
        report.record_success("a.ts");
        assert!(!report.has_failures());

        report.record_failure("b.ts", "permission denied");
        assert!(report.has_failures());
        assert_eq!(report.failed[0].path, "b.ts");
        assert_eq!(report.failed[0].error, "permission denied");
    }
}
