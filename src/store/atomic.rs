//! Write-to-temp-then-rename file replacement.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temp path used while replacing `path`. Lives in the same directory so the
/// final rename never crosses a filesystem boundary.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `contents` atomically.
///
/// A crash before the rename leaves the previous file untouched; at worst a
/// stale `.tmp` sibling remains and is overwritten by the next write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    fs::rename(&temp_path, path)?;

    tracing::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
