//! Streampack - streamable image and font containers for small displays
//!
//! This library turns raster images and TrueType glyph outlines into
//! palette-indexed, bit-packed binary containers. The containers are laid
//! out so that a reader with a few kilobytes of RAM can compute the location
//! of any pixel or glyph from the header alone and seek straight to it.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────────┐   ┌───────────┐   ┌───────────┐
//! │  source  │──▶│ quantize  │──▶│    bits    │──▶│   color   │──▶│ container │
//! │ (loader) │   │ (palette) │   │ (packing)  │   │ (RGB565)  │   │ (IMG/FONT)│
//! └──────────┘   └───────────┘   └────────────┘   └───────────┘   └───────────┘
//! ```
//!
//! The [`convert`] module wires the stages together and [`output`] writes the
//! result atomically.
//!
//! # Example
//!
//! ```
//! use streampack::convert::ImageConverter;
//! use streampack::source::{Rgb, RgbRaster};
//!
//! let raster = RgbRaster::from_pixels(
//!     2,
//!     2,
//!     vec![
//!         Rgb::new(255, 0, 0),
//!         Rgb::new(0, 255, 0),
//!         Rgb::new(0, 0, 255),
//!         Rgb::new(255, 255, 255),
//!     ],
//! )
//! .unwrap();
//!
//! let converter = ImageConverter::new(4).unwrap();
//! let (container, _summary) = converter.convert(&raster).unwrap();
//! assert_eq!(container.palette().len(), 4);
//! assert_eq!(container.bitmap().len(), 1);
//! ```

pub mod bits;
pub mod color;
pub mod config;
pub mod container;
pub mod convert;
pub mod error;
pub mod logging;
pub mod output;
pub mod quantize;
pub mod report;
pub mod source;

pub use error::{EncodeError, EncodeResult};
