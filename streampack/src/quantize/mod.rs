//! Color quantization.
//!
//! Reduces a full-color [`PixelSource`] to an ordered [`Palette`] of exactly
//! `colors` entries and a [`QuantizedRaster`] holding one palette index per
//! pixel.
//!
//! The [`Quantizer`] trait is the seam for palette-generation strategies.
//! Any implementation must be deterministic: the same pixels and depth
//! always produce the same palette and indices. [`MedianCut`] is the one
//! shipped here.
//!
//! ```
//! use streampack::quantize::{ColorDepth, MedianCut, Quantizer};
//! use streampack::source::{Rgb, RgbRaster};
//!
//! let raster = RgbRaster::filled(3, 2, Rgb::new(10, 20, 30));
//! let depth = ColorDepth::new(2).unwrap();
//! let result = MedianCut.quantize(&raster, depth);
//!
//! assert_eq!(result.palette.len(), 2);
//! assert_eq!(result.raster.index(2, 1), 0);
//! ```

mod median_cut;

pub use median_cut::MedianCut;

use crate::bits::{self, BitStream};
use crate::color::{Rgb, WireColor};
use crate::error::{EncodeError, EncodeResult};
use crate::source::PixelSource;

/// Largest palette a container can describe.
pub const MAX_COLORS: u32 = 256;

/// A validated palette size: a power of two in `[1, 256]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorDepth {
    colors: u16,
}

impl ColorDepth {
    /// Validate a requested color count.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::InvalidColorDepth`] unless `colors` is a power
    /// of two between 1 and 256.
    pub fn new(colors: u32) -> EncodeResult<Self> {
        if colors == 0 || colors > MAX_COLORS || !colors.is_power_of_two() {
            return Err(EncodeError::InvalidColorDepth(colors));
        }
        Ok(Self {
            colors: colors as u16,
        })
    }

    /// Depth holding `2^bpp` colors, `bpp` in `0..=8`.
    pub fn from_bpp(bpp: u8) -> EncodeResult<Self> {
        if bpp > 8 {
            return Err(EncodeError::InvalidBitsPerPixel(bpp));
        }
        Self::new(1u32 << bpp)
    }

    pub fn colors(self) -> u16 {
        self.colors
    }

    /// Minimum bits per index, `ceil(log2(colors))`.
    pub fn bpp(self) -> u8 {
        self.colors.trailing_zeros() as u8
    }
}

/// Ordered color table. Position is the index used by the raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette from `colors`, padding with black up to `depth`.
    ///
    /// Entries beyond the depth are dropped.
    pub fn padded(mut colors: Vec<Rgb>, depth: ColorDepth) -> Self {
        colors.resize(depth.colors() as usize, Rgb::BLACK);
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Palette entries transcoded for the wire, in palette order.
    pub fn wire_colors(&self) -> Vec<WireColor> {
        self.colors.iter().map(|&c| WireColor::from_rgb(c)).collect()
    }

    /// Index of the closest entry; ties go to the lowest index.
    pub fn nearest(&self, color: Rgb) -> u8 {
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let dist = entry.distance_sq(color);
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }
}

/// Width×height matrix of palette indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedRaster {
    width: u32,
    height: u32,
    depth: ColorDepth,
    indices: Vec<u8>,
}

impl QuantizedRaster {
    /// Wrap indices produced by a quantizer.
    ///
    /// # Panics
    ///
    /// Panics if the index count does not match the dimensions or an index
    /// is outside the depth. Both are quantizer bugs, not input errors.
    pub fn new(width: u32, height: u32, depth: ColorDepth, indices: Vec<u8>) -> Self {
        assert_eq!(
            indices.len() as u64,
            width as u64 * height as u64,
            "index count must match dimensions"
        );
        assert!(
            indices.iter().all(|&i| (i as u16) < depth.colors()),
            "index outside palette"
        );
        Self {
            width,
            height,
            depth,
            indices,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Palette index at `(x, y)`.
    pub fn index(&self, x: u32, y: u32) -> u8 {
        self.indices[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Pack row-major at the depth's bpp with no row padding.
    pub fn pack(&self) -> BitStream {
        bits::pack_indices(&self.indices, self.depth.bpp())
    }
}

/// Output of a quantizer run.
#[derive(Debug, Clone)]
pub struct Quantization {
    pub palette: Palette,
    pub raster: QuantizedRaster,
    /// Distinct colors found in the source before reduction.
    pub distinct_colors: usize,
}

impl Quantization {
    /// Smallest bpp that would represent every distinct source color, when
    /// that is less than the requested depth.
    pub fn suggested_bpp(&self) -> Option<u8> {
        let needed = (self.distinct_colors.max(1) as u32)
            .next_power_of_two()
            .trailing_zeros() as u8;
        (needed < self.raster.depth().bpp()).then_some(needed)
    }
}

/// Palette-generation strategy.
pub trait Quantizer: Send + Sync {
    /// Reduce `source` to `depth.colors()` palette entries.
    fn quantize(&self, source: &dyn PixelSource, depth: ColorDepth) -> Quantization;

    /// Human-readable strategy name.
    fn name(&self) -> &str;
}
