//! Glyph outlines to font container.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::{ConversionSummary, FontSummary};
use crate::config::PRINTABLE_ASCII;
use crate::container::{ContainerError, FontBuilder, FontContainer};
use crate::error::{EncodeError, EncodeResult};
use crate::output::write_atomic;
use crate::quantize::ColorDepth;
use crate::report::{ConversionEvent, NullReporter, Reporter};
use crate::source::{read_font_file, GlyphSource, TrueTypeRasterizer, MAX_FONT_SIZE};

/// Map 8-bit coverage onto one of `2^bpp` evenly spaced levels.
///
/// `0` stays background and `255` becomes the top level; everything else
/// rounds to the nearest level.
pub fn coverage_level(coverage: u8, bpp: u8) -> u8 {
    let top = (1u32 << bpp) - 1;
    ((coverage as u32 * top + 127) / 255) as u8
}

/// Renders a character set at a fixed pixel height and packs it into a
/// font container.
#[derive(Clone)]
pub struct FontConverter {
    size: u32,
    depth: ColorDepth,
    characters: BTreeSet<char>,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for FontConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontConverter")
            .field("size", &self.size)
            .field("bpp", &self.depth.bpp())
            .field("characters", &self.characters.len())
            .finish()
    }
}

impl FontConverter {
    /// Create a converter for `size`-pixel glyphs at 1 bpp covering
    /// printable ASCII.
    ///
    /// # Errors
    ///
    /// [`EncodeError::InvalidFontSize`] if `size` is 0 or above 65535.
    pub fn new(size: u32) -> EncodeResult<Self> {
        if size == 0 || size > MAX_FONT_SIZE {
            return Err(EncodeError::InvalidFontSize(size));
        }
        Ok(Self {
            size,
            depth: ColorDepth::from_bpp(1)?,
            characters: PRINTABLE_ASCII.chars().collect(),
            reporter: Arc::new(NullReporter),
        })
    }

    /// Store glyphs at `bpp` bits per pixel.
    ///
    /// # Errors
    ///
    /// [`EncodeError::InvalidBitsPerPixel`] unless `bpp` is in `1..=8`.
    pub fn with_bpp(mut self, bpp: u8) -> EncodeResult<Self> {
        if bpp == 0 {
            return Err(EncodeError::InvalidBitsPerPixel(bpp));
        }
        self.depth = ColorDepth::from_bpp(bpp)?;
        Ok(self)
    }

    /// Replace the character set. Duplicates collapse and order does not
    /// matter; the container is always sorted by code point.
    pub fn with_characters(mut self, characters: impl AsRef<str>) -> Self {
        self.characters = characters.as_ref().chars().collect();
        self
    }

    /// Send conversion events to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn bpp(&self) -> u8 {
        self.depth.bpp()
    }

    /// Characters that will be rendered, in container order.
    pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
        self.characters.iter().copied()
    }

    /// Render every character from `source` and lay out the container.
    pub fn convert(
        &self,
        source: &dyn GlyphSource,
    ) -> EncodeResult<(FontContainer, ConversionSummary)> {
        let height = source.height();
        let height16 =
            u16::try_from(height).map_err(|_| EncodeError::InvalidFontSize(height))?;
        let bpp = self.depth.bpp();

        let mut builder = FontBuilder::new(height16, self.depth);
        let mut missing = Vec::new();
        for &character in &self.characters {
            if !source.has_glyph(character) {
                missing.push(character);
                self.reporter
                    .report(&ConversionEvent::MissingGlyph { character });
            }

            let glyph = source.render(character);
            if glyph.height != height
                || glyph.coverage.len() as u64 != glyph.width as u64 * height as u64
            {
                return Err(ContainerError::InvalidHeader(format!(
                    "glyph {:?} rendered as {}x{} with {} samples, expected height {}",
                    character,
                    glyph.width,
                    glyph.height,
                    glyph.coverage.len(),
                    height
                ))
                .into());
            }

            let levels = glyph
                .coverage
                .iter()
                .map(|&c| coverage_level(c, bpp))
                .collect();
            builder.add_glyph(character, glyph.width, levels);
            self.reporter.report(&ConversionEvent::GlyphRendered {
                character,
                width: glyph.width,
            });
        }

        let container = builder.finish()?;
        let summary = summarize(&container, missing);
        debug!(
            height,
            bpp,
            glyphs = summary.glyphs,
            missing = summary.missing.len(),
            bytes = summary.total_bytes,
            "Encoded font"
        );
        Ok((container, ConversionSummary::Font(summary)))
    }

    /// Rasterize the font at `font_path` and write the container to
    /// `output`.
    ///
    /// Nothing is written unless the whole conversion succeeds.
    pub fn convert_file(&self, font_path: &Path, output: &Path) -> EncodeResult<ConversionSummary> {
        let data = read_font_file(font_path)?;
        let rasterizer =
            TrueTypeRasterizer::new(&data, self.size).map_err(|e| e.at(font_path))?;
        let (container, summary) = self.convert(&rasterizer)?;

        let bytes = container.to_bytes();
        write_atomic(output, &bytes)?;
        self.reporter.report(&ConversionEvent::ContainerWritten {
            path: output.to_path_buf(),
            bytes: bytes.len(),
        });
        info!(
            font = %font_path.display(),
            output = %output.display(),
            size = self.size,
            bytes = bytes.len(),
            "Converted font"
        );
        Ok(summary)
    }
}

fn summarize(container: &FontContainer, missing: Vec<char>) -> FontSummary {
    let header = container.header();
    let glyphs = header.glyph_count();
    FontSummary {
        bpp: header.bpp,
        height: header.height,
        max_width: header.max_width,
        offset_width: header.offset_width,
        glyphs,
        missing,
        map_bytes: header.map_len() as usize,
        width_table_bytes: glyphs,
        offset_table_bytes: glyphs * header.offset_width as usize,
        bitmap_bytes: container.bitmap().len(),
        total_bytes: header.bitmap_offset() as usize + container.bitmap().len(),
    }
}
