//! CLI error type.

use std::io;
use std::path::PathBuf;

use streampack::container::ContainerError;
use streampack::EncodeError;
use thiserror::Error;

/// Errors surfaced to the user by `main`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Conversion failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A container could not be parsed.
    #[error("{}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        source: ContainerError,
    },

    /// An auxiliary input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Invalid combination of arguments or configuration.
    #[error("{0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_is_transparent() {
        let err = CliError::from(EncodeError::InvalidColorDepth(3));
        assert_eq!(err.to_string(), EncodeError::InvalidColorDepth(3).to_string());
    }

    #[test]
    fn test_inspect_error_names_file() {
        let err = CliError::Inspect {
            path: PathBuf::from("logo.bin"),
            source: ContainerError::EmptyCharacterSet,
        };
        assert!(err.to_string().starts_with("logo.bin: "));
    }
}
