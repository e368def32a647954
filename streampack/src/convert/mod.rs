//! End-to-end conversion.
//!
//! Each converter validates its parameters at construction, runs the
//! pipeline stages in order and returns the finished container together with
//! a [`ConversionSummary`]. Converters never touch the filesystem except in
//! their `convert_file` helpers, which read the input, then write the output
//! atomically.
//!
//! ```text
//! ImageConverter::convert_file
//!     load_image ─▶ Quantizer ─▶ ImageContainer ─▶ write_atomic
//!
//! FontConverter::convert_file
//!     TrueTypeRasterizer ─▶ coverage levels ─▶ FontBuilder ─▶ write_atomic
//! ```

mod font;
mod image;

pub use self::font::{coverage_level, FontConverter};
pub use self::image::ImageConverter;

use std::fmt;

/// Sizes and counts for a converted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub width: u16,
    pub height: u16,
    pub colors: u16,
    pub bpp: u8,
    /// Distinct colors in the source before quantization.
    pub distinct_colors: usize,
    pub palette_bytes: usize,
    pub bitmap_bytes: usize,
    pub total_bytes: usize,
}

/// Sizes and counts for a converted font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSummary {
    pub bpp: u8,
    pub height: u16,
    pub max_width: u16,
    pub offset_width: u8,
    pub glyphs: usize,
    /// Requested characters the font had no glyph for.
    pub missing: Vec<char>,
    pub map_bytes: usize,
    pub width_table_bytes: usize,
    pub offset_table_bytes: usize,
    pub bitmap_bytes: usize,
    pub total_bytes: usize,
}

/// What a conversion produced. `Display` renders the `.info` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionSummary {
    Image(ImageSummary),
    Font(FontSummary),
}

impl ConversionSummary {
    pub fn total_bytes(&self) -> usize {
        match self {
            ConversionSummary::Image(s) => s.total_bytes,
            ConversionSummary::Font(s) => s.total_bytes,
        }
    }
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionSummary::Image(s) => {
                writeln!(f, "Image Information")?;
                writeln!(f, "=================")?;
                writeln!(f, "Width: {} pixels", s.width)?;
                writeln!(f, "Height: {} pixels", s.height)?;
                writeln!(f, "Colors: {}", s.colors)?;
                writeln!(f, "BPP: {}", s.bpp)?;
                writeln!(f, "Source Colors: {}", s.distinct_colors)?;
                writeln!(f, "Palette Size: {} bytes", s.palette_bytes)?;
                writeln!(f, "Bitmap Size: {} bytes", s.bitmap_bytes)?;
                writeln!(f, "Total File Size: {} bytes", s.total_bytes)
            }
            ConversionSummary::Font(s) => {
                writeln!(f, "Font Information")?;
                writeln!(f, "================")?;
                writeln!(f, "BPP: {}", s.bpp)?;
                writeln!(f, "Height: {}", s.height)?;
                writeln!(f, "Max Width: {}", s.max_width)?;
                writeln!(f, "Offset Width: {}", s.offset_width)?;
                writeln!(f, "Character Count: {}", s.glyphs)?;
                if !s.missing.is_empty() {
                    let missing: String = s.missing.iter().collect();
                    writeln!(f, "Missing Characters: {:?}", missing)?;
                }
                writeln!(f, "Character Map Size: {} bytes", s.map_bytes)?;
                writeln!(f, "Widths Size: {} bytes", s.width_table_bytes)?;
                writeln!(f, "Offsets Size: {} bytes", s.offset_table_bytes)?;
                writeln!(f, "Bitmaps Size: {} bytes", s.bitmap_bytes)?;
                writeln!(f, "Total File Size: {} bytes", s.total_bytes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_summary_lists_missing() {
        let summary = ConversionSummary::Font(FontSummary {
            bpp: 1,
            height: 8,
            max_width: 5,
            offset_width: 1,
            glyphs: 2,
            missing: vec!['€'],
            map_bytes: 4,
            width_table_bytes: 2,
            offset_table_bytes: 2,
            bitmap_bytes: 10,
            total_bytes: 30,
        });
        let text = summary.to_string();
        assert!(text.starts_with("Font Information\n"));
        assert!(text.contains("Character Count: 2\n"));
        assert!(text.contains("Missing Characters: \"€\"\n"));
        assert!(text.ends_with("Total File Size: 30 bytes\n"));
        assert_eq!(summary.total_bytes(), 30);
    }
}
