//! TrueType glyph rasterization.

use std::path::Path;

use thiserror::Error;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use ttf_parser::{Face, FaceParsingError, GlyphId, OutlineBuilder};
use tracing::{debug, warn};

use super::{GlyphBitmap, GlyphSource};
use crate::error::{EncodeError, EncodeResult};

/// Largest pixel size the font container header can describe.
pub const MAX_FONT_SIZE: u32 = u16::MAX as u32;

/// Errors raised while preparing a font for rasterization.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to parse font: {0}")]
    Parse(#[from] FaceParsingError),

    #[error("font size must be between 1 and {MAX_FONT_SIZE} pixels, got {0}")]
    InvalidSize(u32),
}

impl FontError {
    /// Attach the file the font bytes came from.
    pub fn at(self, path: &Path) -> EncodeError {
        match self {
            FontError::Parse(e) => EncodeError::UnsupportedFontFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
            FontError::InvalidSize(size) => EncodeError::InvalidFontSize(size),
        }
    }
}

/// Read a font file into memory.
pub fn read_font_file(path: &Path) -> EncodeResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| EncodeError::from_read(path, e))
}

/// Renders glyph outlines at a fixed pixel height.
///
/// The font's ascender-to-descender span is scaled onto exactly `size`
/// rows with the baseline at the scaled ascender. Each glyph is as wide as
/// its rounded horizontal advance; ink outside `[0, advance)` is clipped.
pub struct TrueTypeRasterizer<'a> {
    face: Face<'a>,
    size: u32,
    scale: f32,
    baseline: f32,
}

impl<'a> TrueTypeRasterizer<'a> {
    /// Parse `data` and prepare to render at `size` pixels.
    pub fn new(data: &'a [u8], size: u32) -> Result<Self, FontError> {
        if size == 0 || size > MAX_FONT_SIZE {
            return Err(FontError::InvalidSize(size));
        }
        let face = Face::parse(data, 0)?;

        let ascender = face.ascender() as f32;
        let descender = face.descender() as f32;
        let span = if ascender - descender > 0.0 {
            ascender - descender
        } else {
            face.units_per_em() as f32
        };
        let scale = size as f32 / span;

        debug!(
            size,
            units_per_em = face.units_per_em(),
            ascender,
            descender,
            glyphs = face.number_of_glyphs(),
            "Loaded font face"
        );

        Ok(Self {
            face,
            size,
            scale,
            baseline: ascender.max(0.0) * scale,
        })
    }

    fn glyph_id(&self, character: char) -> GlyphId {
        self.face.glyph_index(character).unwrap_or_else(|| {
            warn!(character = ?character, "Character not in font, using .notdef");
            GlyphId(0)
        })
    }

    fn advance(&self, id: GlyphId) -> u32 {
        let units = self.face.glyph_hor_advance(id).unwrap_or(0) as f32;
        (units * self.scale).round() as u32
    }
}

impl GlyphSource for TrueTypeRasterizer<'_> {
    fn height(&self) -> u32 {
        self.size
    }

    fn has_glyph(&self, character: char) -> bool {
        self.face.glyph_index(character).is_some()
    }

    fn render(&self, character: char) -> GlyphBitmap {
        let id = self.glyph_id(character);
        let width = self.advance(id);

        let mut sink = PathSink {
            builder: PathBuilder::new(),
            scale: self.scale,
            baseline: self.baseline,
        };
        if self.face.outline_glyph(id, &mut sink).is_none() {
            // No contours (e.g. space)
            return GlyphBitmap::blank(character, width, self.size);
        }
        let (Some(path), Some(mut pixmap)) = (sink.builder.finish(), Pixmap::new(width, self.size))
        else {
            return GlyphBitmap::blank(character, width, self.size);
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

        GlyphBitmap {
            character,
            width,
            height: self.size,
            coverage: pixmap.pixels().iter().map(|p| p.alpha()).collect(),
        }
    }
}

/// Maps font units (y up, origin on the baseline) to pixels (y down).
struct PathSink {
    builder: PathBuilder,
    scale: f32,
    baseline: f32,
}

impl PathSink {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const DEJAVU: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/DejaVuSans.ttf"
    ));

    /// Plane 16 private use, absent from any stock font.
    const UNMAPPED: char = '\u{10FFFD}';

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        let result = TrueTypeRasterizer::new(b"definitely not a font", 16);
        assert!(matches!(result, Err(FontError::Parse(_))));
    }

    #[test]
    fn test_zero_size_rejected_before_parsing() {
        let result = TrueTypeRasterizer::new(b"", 0);
        assert!(matches!(result, Err(FontError::InvalidSize(0))));
    }

    #[test]
    fn test_oversized_rejected() {
        let result = TrueTypeRasterizer::new(b"", 70_000);
        assert!(matches!(result, Err(FontError::InvalidSize(70_000))));
    }

    #[test]
    fn test_font_error_at_path() {
        let err = FontError::Parse(FaceParsingError::UnknownMagic).at(Path::new("x.ttf"));
        match err {
            EncodeError::UnsupportedFontFormat { path, .. } => {
                assert_eq!(path, PathBuf::from("x.ttf"))
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = FontError::InvalidSize(0).at(Path::new("x.ttf"));
        assert!(matches!(err, EncodeError::InvalidFontSize(0)));
    }

    #[test]
    fn test_read_missing_font_file() {
        let err = read_font_file(Path::new("/nonexistent/streampack/font.ttf")).unwrap_err();
        assert!(matches!(err, EncodeError::FileNotFound(_)));
    }

    #[test]
    fn test_path_sink_flips_y() {
        let sink = PathSink {
            builder: PathBuilder::new(),
            scale: 0.5,
            baseline: 12.0,
        };
        assert_eq!(sink.point(0.0, 0.0), (0.0, 12.0));
        assert_eq!(sink.point(10.0, 24.0), (5.0, 0.0));
        assert_eq!(sink.point(4.0, -4.0), (2.0, 14.0));
    }

    #[test]
    fn test_path_sink_builds_filled_square() {
        let mut sink = PathSink {
            builder: PathBuilder::new(),
            scale: 1.0,
            baseline: 4.0,
        };
        sink.move_to(0.0, 0.0);
        sink.line_to(4.0, 0.0);
        sink.line_to(4.0, 4.0);
        sink.line_to(0.0, 4.0);
        sink.close();
        let path = sink.builder.finish().unwrap();

        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = false;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn test_real_glyph_dimensions() {
        let rasterizer = TrueTypeRasterizer::new(DEJAVU, 16).unwrap();
        assert_eq!(rasterizer.height(), 16);

        for character in ['A', 'B', 'W'] {
            let glyph = rasterizer.render(character);
            let id = rasterizer.face.glyph_index(character).unwrap();
            assert_eq!(glyph.height, 16);
            assert_eq!(glyph.width, rasterizer.advance(id));
            assert_eq!(glyph.coverage.len(), (glyph.width * 16) as usize);
            assert!(
                glyph.coverage.iter().any(|&c| c > 128),
                "{:?} has no ink",
                character
            );
        }
    }

    #[test]
    fn test_real_glyph_ink_sits_between_baseline_and_top() {
        let rasterizer = TrueTypeRasterizer::new(DEJAVU, 16).unwrap();
        let glyph = rasterizer.render('A');
        let inked_rows: Vec<u32> = (0..glyph.height)
            .filter(|&y| (0..glyph.width).any(|x| glyph.coverage_at(x, y) > 0))
            .collect();
        // Capital letters stop at the baseline, leaving the descender rows empty
        assert!(inked_rows.last().copied().unwrap() < rasterizer.baseline.ceil() as u32);
        assert!(inked_rows.len() > 8);
    }

    #[test]
    fn test_space_is_blank_with_advance() {
        let rasterizer = TrueTypeRasterizer::new(DEJAVU, 16).unwrap();
        let glyph = rasterizer.render(' ');
        assert!(glyph.width > 0);
        assert_eq!(glyph.height, 16);
        assert!(glyph.coverage.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_unmapped_character_uses_notdef() {
        let rasterizer = TrueTypeRasterizer::new(DEJAVU, 16).unwrap();
        assert!(rasterizer.has_glyph('A'));
        assert!(!rasterizer.has_glyph(UNMAPPED));

        let glyph = rasterizer.render(UNMAPPED);
        assert_eq!(glyph.character, UNMAPPED);
        assert_eq!(glyph.width, rasterizer.advance(GlyphId(0)));
        assert!(glyph.width > 0);
        assert_eq!(glyph.coverage.len(), (glyph.width * 16) as usize);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let rasterizer = TrueTypeRasterizer::new(DEJAVU, 12).unwrap();
        assert_eq!(rasterizer.render('g'), rasterizer.render('g'));
    }
}
