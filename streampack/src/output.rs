//! Writing containers to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::convert::ConversionSummary;
use crate::error::{EncodeError, EncodeResult};

/// Write `bytes` to `path` so that readers see either the old file or the
/// complete new one.
///
/// Data goes to a temporary file in the destination directory which is then
/// renamed over `path`. If anything fails the temporary file is removed and
/// `path` is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> EncodeResult<()> {
    let write_failed = |source| EncodeError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_failed)?;
    file.write_all(bytes).map_err(write_failed)?;
    file.as_file().sync_all().map_err(write_failed)?;
    file.persist(path).map_err(|e| write_failed(e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Persisted file");
    Ok(())
}

/// Sidecar path for a container: same location, `.info` extension.
pub fn info_path(container: &Path) -> PathBuf {
    container.with_extension("info")
}

/// Write the human-readable report for a container next to it.
///
/// Returns the sidecar path.
pub fn write_info(container: &Path, summary: &ConversionSummary) -> EncodeResult<PathBuf> {
    let path = info_path(container);
    write_atomic(&path, summary.to_string().as_bytes())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ImageSummary;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.bin");
        write_atomic(&path, &[1, 2, 3]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.bin");
        std::fs::write(&path, b"old contents").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.bin");
        write_atomic(&path, &[0; 64]).unwrap();
        let entries: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("out.bin");
        let err = write_atomic(&path, &[1]).unwrap_err();
        match err {
            EncodeError::WriteFailed { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_info_path() {
        assert_eq!(info_path(Path::new("a/logo.bin")), PathBuf::from("a/logo.info"));
        assert_eq!(info_path(Path::new("font-16.font")), PathBuf::from("font-16.info"));
    }

    #[test]
    fn test_write_info() {
        let temp = TempDir::new().unwrap();
        let container = temp.path().join("logo.bin");
        let summary = ConversionSummary::Image(ImageSummary {
            width: 2,
            height: 2,
            colors: 4,
            bpp: 2,
            distinct_colors: 4,
            palette_bytes: 8,
            bitmap_bytes: 1,
            total_bytes: 15,
        });
        let path = write_info(&container, &summary).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("Image Information\n"));
        assert!(text.contains("Width: 2 pixels\n"));
        assert!(text.contains("Total File Size: 15 bytes\n"));
    }
}
