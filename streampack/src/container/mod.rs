//! Streamable binary containers.
//!
//! Two closed formats, both little-endian with fixed-width numeric fields:
//!
//! - [`ImageContainer`] - 6-byte header, RGB565 palette, packed bitmap
//! - [`FontContainer`] - `FONT` header, character map, width and offset
//!   tables, packed glyph bitmaps
//!
//! The header of either format is enough to compute the byte range holding
//! any pixel or glyph, so a reader with a small fixed buffer can seek
//! directly to it. [`ImageHeader`] and [`FontHeader`] expose those offset
//! calculations for tests and tooling.

mod error;
mod font;
mod image;

pub use error::{ContainerError, ContainerResult};
pub use font::{FontBuilder, FontContainer, FontGlyph, FontHeader, FONT_MAGIC};
pub use self::image::{ImageContainer, ImageHeader};

use std::ops::Range;

/// Which container a blob holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Image,
    Font,
}

impl ContainerKind {
    /// Classify by magic. Image containers carry no magic, so anything that
    /// is not a font is treated as an image.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(FONT_MAGIC) {
            ContainerKind::Font
        } else {
            ContainerKind::Image
        }
    }
}

/// Byte range within `base..` covering `bits` bits starting at `bit_offset`.
pub(crate) fn bit_span_bytes(base: u64, bit_offset: u64, bits: u64) -> Range<u64> {
    let start = base + bit_offset / 8;
    let end = base + (bit_offset + bits).div_ceil(8);
    start..end.max(start)
}

/// Fail with [`ContainerError::Truncated`] unless `bytes` holds `needed`.
pub(crate) fn require(bytes: &[u8], needed: usize) -> ContainerResult<()> {
    if bytes.len() < needed {
        return Err(ContainerError::Truncated {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

pub(crate) fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind() {
        assert_eq!(ContainerKind::detect(b"FONT\x01"), ContainerKind::Font);
        assert_eq!(ContainerKind::detect(&[2, 0, 2, 0, 4, 2]), ContainerKind::Image);
        assert_eq!(ContainerKind::detect(b""), ContainerKind::Image);
    }

    #[test]
    fn test_bit_span_bytes() {
        // bits 6..9 touch bytes 0 and 1
        assert_eq!(bit_span_bytes(10, 6, 3), 10..12);
        // byte-aligned 8 bits
        assert_eq!(bit_span_bytes(0, 8, 8), 1..2);
        // zero-width span is empty
        assert_eq!(bit_span_bytes(4, 16, 0), 6..6);
    }

    #[test]
    fn test_require() {
        assert!(require(&[0; 4], 4).is_ok());
        assert_eq!(
            require(&[0; 3], 4),
            Err(ContainerError::Truncated {
                needed: 4,
                available: 3
            })
        );
    }
}
