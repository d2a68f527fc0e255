//! Archive encoding.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::Path;
use tar::{Archive, Builder};

use crate::template::scan::list_files;

/// Packs a directory into a byte stream and back.
pub trait ArchiveCodec {
    /// Write every file under `dir` (minus `exclude`d names) to `out`.
    fn pack_directory(
        &self,
        dir: &Path,
        exclude: &BTreeSet<String>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()>;

    /// Extract an archive stream into `dest`.
    fn unpack(&self, input: &mut dyn Read, dest: &Path) -> anyhow::Result<()>;
}

/// `.tar.gz` codec.
#[derive(Debug, Clone, Copy)]
pub struct TarGzCodec {
    level: u32,
}

impl TarGzCodec {
    pub fn new() -> Self {
        Self { level: 6 }
    }

    /// Compression level, clamped to 1-9.
    pub fn with_level(level: u32) -> Self {
        Self {
            level: level.clamp(1, 9),
        }
    }
}

impl Default for TarGzCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveCodec for TarGzCodec {
    fn pack_directory(
        &self,
        dir: &Path,
        exclude: &BTreeSet<String>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let encoder = GzEncoder::new(out, Compression::new(self.level));
        let mut tar = Builder::new(encoder);

        for relative in list_files(dir, exclude)? {
            tar.append_path_with_name(dir.join(&relative), &relative)?;
        }

        let encoder = tar.into_inner()?;
        encoder.finish()?;
        Ok(())
    }

    fn unpack(&self, input: &mut dyn Read, dest: &Path) -> anyhow::Result<()> {
        let mut archive = Archive::new(GzDecoder::new(input));
        archive.unpack(dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn pack_then_unpack_preserves_tree() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("a/b")).unwrap();
        fs::write(src.path().join("a/b/c.txt"), "deep").unwrap();
        fs::write(src.path().join("top.txt"), "top").unwrap();
        fs::write(src.path().join("skip.log"), "nope").unwrap();

        let exclude: BTreeSet<String> = ["skip.log".to_string()].into_iter().collect();
        let mut bytes = Vec::new();
        TarGzCodec::new()
            .pack_directory(src.path(), &exclude, &mut bytes)
            .unwrap();

        let dest = TempDir::new().unwrap();
        TarGzCodec::new()
            .unpack(&mut bytes.as_slice(), dest.path())
            .unwrap();

        assert_eq!(fs::read_to_string(dest.path().join("a/b/c.txt")).unwrap(), "deep");
        assert_eq!(fs::read_to_string(dest.path().join("top.txt")).unwrap(), "top");
        assert!(!dest.path().join("skip.log").exists());
    }

    #[test]
    fn garbage_input_fails() {
        let dest = TempDir::new().unwrap();
        let result = TarGzCodec::new().unpack(&mut &b"not an archive"[..], dest.path());
        assert!(result.is_err());
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(TarGzCodec::with_level(42).level, 9);
        assert_eq!(TarGzCodec::with_level(0).level, 1);
    }
}
