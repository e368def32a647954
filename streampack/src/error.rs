//! Error types for asset conversion.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::container::ContainerError;

/// Result type for conversion operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while converting an asset.
///
/// Every variant is fatal for the asset being converted. Nothing is retried
/// and no partial container is left at the output path.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Color count is not a power of two in `[1, 256]`.
    #[error("invalid color depth: colors must be a power of two between 1 and 256, got {0}")]
    InvalidColorDepth(u32),

    /// Font bits-per-pixel outside `1..=8`.
    #[error("invalid bits per pixel: expected 1 to 8, got {0}")]
    InvalidBitsPerPixel(u8),

    /// Font pixel size is zero or does not fit the container header.
    #[error("invalid font size: expected 1 to 65535 pixels, got {0}")]
    InvalidFontSize(u32),

    /// Input path does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The image decoder cannot interpret the input.
    #[error("unsupported image format in {}: {reason}", path.display())]
    UnsupportedImageFormat { path: PathBuf, reason: String },

    /// The font parser cannot interpret the input.
    #[error("unsupported font format in {}: {reason}", path.display())]
    UnsupportedFontFormat { path: PathBuf, reason: String },

    /// Input exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Container layout or parsing failed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Configuration file is malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EncodeError {
    /// Classify an I/O error raised while opening an input file.
    pub(crate) fn from_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            EncodeError::FileNotFound(path)
        } else {
            EncodeError::ReadFailed { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_color_depth_display() {
        let err = EncodeError::InvalidColorDepth(3);
        assert_eq!(
            err.to_string(),
            "invalid color depth: colors must be a power of two between 1 and 256, got 3"
        );
    }

    #[test]
    fn test_file_not_found_display() {
        let err = EncodeError::FileNotFound(PathBuf::from("/tmp/missing.png"));
        assert_eq!(err.to_string(), "file not found: /tmp/missing.png");
    }

    #[test]
    fn test_write_failed_display() {
        let err = EncodeError::WriteFailed {
            path: PathBuf::from("/out/logo.bin"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("failed to write /out/logo.bin"));
    }

    #[test]
    fn test_from_read_not_found() {
        let err = EncodeError::from_read("a.png", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, EncodeError::FileNotFound(_)));
    }

    #[test]
    fn test_from_read_other() {
        let err = EncodeError::from_read(
            "a.png",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, EncodeError::ReadFailed { .. }));
    }

    #[test]
    fn test_from_container_error() {
        let err: EncodeError = ContainerError::EmptyCharacterSet.into();
        assert!(matches!(err, EncodeError::Container(_)));
    }
}
