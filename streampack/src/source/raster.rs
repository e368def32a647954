//! Raster image loading.

use std::io;
use std::path::Path;

use image::{ImageError, RgbImage};
use tracing::debug;

use super::PixelSource;
use crate::color::Rgb;
use crate::error::{EncodeError, EncodeResult};

/// In-memory RGB pixel matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl RgbRaster {
    /// Build from row-major pixels. Returns `None` if the pixel count does
    /// not match `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<Self> {
        (pixels.len() as u64 == width as u64 * height as u64).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single-color raster.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

impl From<&RgbImage> for RgbRaster {
    fn from(img: &RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.pixels().map(|&p| Rgb::from(p)).collect(),
        }
    }
}

impl PixelSource for RgbRaster {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }
}

impl PixelSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        Rgb::from(*self.get_pixel(x, y))
    }
}

/// Decode an image file and flatten it to 8-bit RGB.
///
/// Paletted, grayscale, 16-bit and alpha images are all converted; alpha is
/// discarded.
///
/// # Errors
///
/// - [`EncodeError::FileNotFound`] if `path` does not exist
/// - [`EncodeError::UnsupportedImageFormat`] if the decoder rejects the data
/// - [`EncodeError::ReadFailed`] for any other I/O failure
pub fn load_image(path: &Path) -> EncodeResult<RgbImage> {
    if !path.exists() {
        return Err(EncodeError::FileNotFound(path.to_path_buf()));
    }

    let reader = image::ImageReader::open(path)
        .map_err(|e| EncodeError::from_read(path, e))?
        .with_guessed_format()
        .map_err(|e| EncodeError::from_read(path, e))?;

    let decoded = reader.decode().map_err(|e| match e {
        ImageError::IoError(source) if source.kind() != io::ErrorKind::UnexpectedEof => {
            EncodeError::from_read(path, source)
        }
        other => EncodeError::UnsupportedImageFormat {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    debug!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "Decoded image"
    );

    Ok(decoded.to_rgb8())
}
