//! Image container layout.
//!
//! ```text
//! offset  size          field
//! 0       2             width  (u16 LE)
//! 2       2             height (u16 LE)
//! 4       1             colors (256 stored as 0)
//! 5       1             bpp
//! 6       colors × 2    palette, byte-swapped RGB565
//! 6+2c    ⌈w·h·bpp/8⌉   bitmap, row-major, no row padding
//! ```

use std::ops::Range;

use super::{bit_span_bytes, read_u16, require, ContainerError, ContainerResult};
use crate::bits::{packed_len, BitReader};
use crate::color::WireColor;
use crate::quantize::{ColorDepth, Palette, QuantizedRaster};

/// Fixed image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u16,
    pub height: u16,
    /// Palette entries, 1 to 256.
    pub colors: u16,
    pub bpp: u8,
}

impl ImageHeader {
    /// Encoded header length.
    pub const SIZE: usize = 6;

    /// Parse the first [`SIZE`](Self::SIZE) bytes.
    ///
    /// # Errors
    ///
    /// [`ContainerError::Truncated`] on short input and
    /// [`ContainerError::InvalidHeader`] when `colors` and `bpp` disagree.
    pub fn parse(bytes: &[u8]) -> ContainerResult<Self> {
        require(bytes, Self::SIZE)?;
        let colors = match bytes[4] {
            0 => 256,
            n => n as u16,
        };
        let bpp = bytes[5];
        let depth = ColorDepth::new(colors as u32)
            .map_err(|_| ContainerError::InvalidHeader(format!("{} colors", colors)))?;
        if depth.bpp() != bpp {
            return Err(ContainerError::InvalidHeader(format!(
                "{} colors need {} bpp, header says {}",
                colors,
                depth.bpp(),
                bpp
            )));
        }
        Ok(Self {
            width: read_u16(bytes, 0),
            height: read_u16(bytes, 2),
            colors,
            bpp,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let w = self.width.to_le_bytes();
        let h = self.height.to_le_bytes();
        // 256 wraps to 0 in the single byte
        [w[0], w[1], h[0], h[1], self.colors as u8, self.bpp]
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// File offset of palette entry `index`.
    pub fn palette_entry_offset(&self, index: u16) -> u64 {
        Self::SIZE as u64 + index as u64 * 2
    }

    /// File offset of the first bitmap byte.
    pub fn bitmap_offset(&self) -> u64 {
        Self::SIZE as u64 + self.colors as u64 * 2
    }

    pub fn bitmap_len(&self) -> usize {
        packed_len(self.pixel_count(), self.bpp)
    }

    /// Total container length.
    pub fn total_len(&self) -> u64 {
        self.bitmap_offset() + self.bitmap_len() as u64
    }

    /// Bit offset of pixel `(x, y)` from the start of the bitmap.
    pub fn pixel_bit_offset(&self, x: u16, y: u16) -> u64 {
        (y as u64 * self.width as u64 + x as u64) * self.bpp as u64
    }

    /// File byte range holding pixel `(x, y)`.
    pub fn pixel_byte_range(&self, x: u16, y: u16) -> Range<u64> {
        bit_span_bytes(
            self.bitmap_offset(),
            self.pixel_bit_offset(x, y),
            self.bpp as u64,
        )
    }

    /// File byte range holding every pixel of row `y`.
    pub fn row_byte_range(&self, y: u16) -> Range<u64> {
        bit_span_bytes(
            self.bitmap_offset(),
            self.pixel_bit_offset(0, y),
            self.width as u64 * self.bpp as u64,
        )
    }
}

/// A complete image container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContainer {
    header: ImageHeader,
    palette: Vec<WireColor>,
    bitmap: Vec<u8>,
}

impl ImageContainer {
    /// Assemble a container from a palette and the raster indexing it.
    ///
    /// # Errors
    ///
    /// [`ContainerError::DimensionsTooLarge`] if either side exceeds 65535.
    pub fn new(palette: &Palette, raster: &QuantizedRaster) -> ContainerResult<Self> {
        let (width, height) = (raster.width(), raster.height());
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(ContainerError::DimensionsTooLarge { width, height });
        };
        let depth = raster.depth();
        if palette.len() != depth.colors() as usize {
            return Err(ContainerError::InvalidHeader(format!(
                "palette has {} entries, depth needs {}",
                palette.len(),
                depth.colors()
            )));
        }

        Ok(Self {
            header: ImageHeader {
                width: w,
                height: h,
                colors: depth.colors(),
                bpp: depth.bpp(),
            },
            palette: palette.wire_colors(),
            bitmap: raster.pack().into_bytes(),
        })
    }

    /// Parse a serialized container, checking every section length.
    pub fn from_bytes(bytes: &[u8]) -> ContainerResult<Self> {
        let header = ImageHeader::parse(bytes)?;
        let total = header.total_len() as usize;
        require(bytes, total)?;
        if bytes.len() > total {
            return Err(ContainerError::InvalidHeader(format!(
                "{} trailing bytes after bitmap",
                bytes.len() - total
            )));
        }

        let palette_start = ImageHeader::SIZE;
        let bitmap_start = header.bitmap_offset() as usize;
        let palette = bytes[palette_start..bitmap_start]
            .chunks_exact(2)
            .map(|pair| WireColor::from_raw(u16::from_le_bytes([pair[0], pair[1]])))
            .collect();

        Ok(Self {
            header,
            palette,
            bitmap: bytes[bitmap_start..].to_vec(),
        })
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    pub fn palette(&self) -> &[WireColor] {
        &self.palette
    }

    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Palette index stored for pixel `(x, y)`.
    pub fn pixel_index(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.header.width || y >= self.header.height {
            return None;
        }
        BitReader::new(&self.bitmap)
            .read_at(self.header.pixel_bit_offset(x, y), self.header.bpp)
            .map(|v| v as u8)
    }

    /// Wire color of pixel `(x, y)`.
    pub fn pixel_color(&self, x: u16, y: u16) -> Option<WireColor> {
        self.pixel_index(x, y)
            .and_then(|i| self.palette.get(i as usize).copied())
    }

    /// Serialize header, palette and bitmap.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.total_len() as usize);
        out.extend_from_slice(&self.header.to_bytes());
        for color in &self.palette {
            out.extend_from_slice(&color.to_le_bytes());
        }
        out.extend_from_slice(&self.bitmap);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn sample() -> ImageContainer {
        let depth = ColorDepth::new(4).unwrap();
        let palette = Palette::padded(
            vec![
                Rgb::new(0, 0, 255),
                Rgb::new(0, 255, 0),
                Rgb::new(255, 0, 0),
                Rgb::new(255, 255, 255),
            ],
            depth,
        );
        let raster = QuantizedRaster::new(3, 2, depth, vec![2, 1, 0, 3, 3, 1]);
        ImageContainer::new(&palette, &raster).unwrap()
    }

    #[test]
    fn test_layout() {
        let bytes = sample().to_bytes();
        // header
        assert_eq!(&bytes[0..6], &[3, 0, 2, 0, 4, 2]);
        // palette: blue, green, red, white as swapped RGB565
        assert_eq!(&bytes[6..14], &[0x00, 0x1F, 0x07, 0xE0, 0xF8, 0x00, 0xFF, 0xFF]);
        // 6 pixels × 2 bits = 12 bits -> 2 bytes: 10 01 00 11 | 11 01 0000
        assert_eq!(&bytes[14..], &[0b1001_0011, 0b1101_0000]);
    }

    #[test]
    fn test_header_offsets() {
        let header = *sample().header();
        assert_eq!(header.bitmap_offset(), 14);
        assert_eq!(header.bitmap_len(), 2);
        assert_eq!(header.total_len(), 16);
        assert_eq!(header.palette_entry_offset(3), 12);
        assert_eq!(header.pixel_bit_offset(0, 1), 6);
        assert_eq!(header.pixel_byte_range(0, 1), 14..15);
        assert_eq!(header.pixel_byte_range(1, 1), 15..16);
        assert_eq!(header.row_byte_range(1), 14..16);
    }

    #[test]
    fn test_pixel_lookup() {
        let container = sample();
        assert_eq!(container.pixel_index(0, 0), Some(2));
        assert_eq!(container.pixel_index(2, 1), Some(1));
        assert_eq!(container.pixel_index(3, 0), None);
        assert_eq!(
            container.pixel_color(0, 0),
            Some(WireColor::from_rgb(Rgb::new(255, 0, 0)))
        );
    }

    #[test]
    fn test_from_bytes_round_trip() {
        let container = sample();
        let parsed = ImageContainer::from_bytes(&container.to_bytes()).unwrap();
        assert_eq!(parsed, container);
    }

    #[test]
    fn test_256_colors_stored_as_zero() {
        let depth = ColorDepth::new(256).unwrap();
        let palette = Palette::padded(vec![Rgb::new(1, 1, 1)], depth);
        let raster = QuantizedRaster::new(1, 1, depth, vec![0]);
        let container = ImageContainer::new(&palette, &raster).unwrap();
        let bytes = container.to_bytes();

        assert_eq!(bytes[4], 0);
        assert_eq!(bytes[5], 8);
        assert_eq!(bytes.len(), 6 + 512 + 1);

        let header = ImageHeader::parse(&bytes).unwrap();
        assert_eq!(header.colors, 256);
    }

    #[test]
    fn test_single_color_has_empty_bitmap() {
        let depth = ColorDepth::new(1).unwrap();
        let palette = Palette::padded(vec![Rgb::new(9, 9, 9)], depth);
        let raster = QuantizedRaster::new(4, 4, depth, vec![0; 16]);
        let container = ImageContainer::new(&palette, &raster).unwrap();
        assert!(container.bitmap().is_empty());
        assert_eq!(container.to_bytes().len(), 8);
        assert_eq!(container.pixel_index(3, 3), Some(0));
    }

    #[test]
    fn test_parse_rejects_inconsistent_bpp() {
        assert!(matches!(
            ImageHeader::parse(&[1, 0, 1, 0, 4, 3]),
            Err(ContainerError::InvalidHeader(_))
        ));
        assert!(matches!(
            ImageHeader::parse(&[1, 0, 1, 0, 3, 2]),
            Err(ContainerError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_parse_truncated() {
        assert!(matches!(
            ImageHeader::parse(&[1, 0, 1]),
            Err(ContainerError::Truncated { needed: 6, .. })
        ));
        let mut bytes = sample().to_bytes();
        bytes.pop();
        assert!(matches!(
            ImageContainer::from_bytes(&bytes),
            Err(ContainerError::Truncated { .. })
        ));
    }

    #[test]
    fn test_dimensions_too_large() {
        let depth = ColorDepth::new(1).unwrap();
        let palette = Palette::padded(vec![], depth);
        let raster = QuantizedRaster::new(70_000, 1, depth, vec![0; 70_000]);
        assert_eq!(
            ImageContainer::new(&palette, &raster),
            Err(ContainerError::DimensionsTooLarge {
                width: 70_000,
                height: 1
            })
        );
    }
}
