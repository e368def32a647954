//! Error types for container serialization and parsing.

use thiserror::Error;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Errors that can occur while laying out or reading a container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// Fewer bytes than the layout requires.
    #[error("container truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Font container does not start with `FONT`.
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    /// Header fields contradict each other.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Image side does not fit the 16-bit header field.
    #[error("image {width}×{height} exceeds the 65535 pixel limit")]
    DimensionsTooLarge { width: u32, height: u32 },

    /// Glyph render width does not fit the 8-bit width table.
    #[error("glyph {character:?} is {width} pixels wide, the width table holds at most 255")]
    GlyphTooWide { character: char, width: u32 },

    /// Encoded character map does not fit the 16-bit length field.
    #[error("character map is {0} bytes, at most 65535 fit the header")]
    CharacterMapTooLong(usize),

    /// A font container needs at least one character.
    #[error("character set is empty")]
    EmptyCharacterSet,

    /// Character map is not UTF-8 or not strictly ordered by code point.
    #[error("invalid character map: {0}")]
    InvalidCharacterMap(String),
}
