//! Source loaders.
//!
//! Everything downstream of this module sees pixels through two small
//! capability traits so that any decoder or rasterizer can feed the
//! pipeline:
//!
//! - [`PixelSource`] - a width×height matrix of 24-bit colors
//! - [`GlyphSource`] - per-character coverage bitmaps at a fixed height
//!
//! Concrete loaders:
//!
//! - [`load_image`] - any format the `image` crate decodes, flattened to RGB
//! - [`TrueTypeRasterizer`] - TrueType/OpenType outlines via `ttf-parser`,
//!   filled with `tiny-skia`

mod font;
mod raster;

pub use self::font::{read_font_file, FontError, TrueTypeRasterizer, MAX_FONT_SIZE};
pub use self::raster::{load_image, RgbRaster};
pub use crate::color::Rgb;

/// Read access to a matrix of RGB pixels.
pub trait PixelSource {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Color at `(x, y)`. Callers stay within [`dimensions`](Self::dimensions).
    fn pixel(&self, x: u32, y: u32) -> Rgb;
}

/// One rasterized character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub character: char,
    /// Render width (horizontal advance) in pixels.
    pub width: u32,
    pub height: u32,
    /// Coverage per pixel, 0 (background) to 255 (ink), row-major.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// A glyph with no ink.
    pub fn blank(character: char, width: u32, height: u32) -> Self {
        Self {
            character,
            width,
            height,
            coverage: vec![0; width as usize * height as usize],
        }
    }

    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.width + x) as usize]
    }
}

/// Produces glyph bitmaps of a uniform height.
pub trait GlyphSource {
    /// Row count of every glyph this source renders.
    fn height(&self) -> u32;

    /// Whether the source has a dedicated glyph for `character`. Missing
    /// characters still render, usually as a fallback box.
    fn has_glyph(&self, _character: char) -> bool {
        true
    }

    /// Rasterize `character`.
    fn render(&self, character: char) -> GlyphBitmap;
}
