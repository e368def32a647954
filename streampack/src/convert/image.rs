//! Raster image to image container.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::{ConversionSummary, ImageSummary};
use crate::container::{ContainerError, ImageContainer, ImageHeader};
use crate::error::EncodeResult;
use crate::output::write_atomic;
use crate::quantize::{ColorDepth, MedianCut, Quantizer};
use crate::report::{ConversionEvent, NullReporter, Reporter};
use crate::source::{load_image, PixelSource};

/// Converts images to palette-indexed containers at a fixed color depth.
#[derive(Clone)]
pub struct ImageConverter {
    depth: ColorDepth,
    quantizer: Arc<dyn Quantizer>,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for ImageConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageConverter")
            .field("depth", &self.depth)
            .field("quantizer", &self.quantizer.name())
            .finish()
    }
}

impl ImageConverter {
    /// Create a converter producing `colors` palette entries.
    ///
    /// # Errors
    ///
    /// [`EncodeError::InvalidColorDepth`](crate::EncodeError::InvalidColorDepth)
    /// unless `colors` is a power of two in `[1, 256]`.
    pub fn new(colors: u32) -> EncodeResult<Self> {
        Ok(Self {
            depth: ColorDepth::new(colors)?,
            quantizer: Arc::new(MedianCut),
            reporter: Arc::new(NullReporter),
        })
    }

    /// Use a different palette strategy.
    pub fn with_quantizer(mut self, quantizer: Arc<dyn Quantizer>) -> Self {
        self.quantizer = quantizer;
        self
    }

    /// Send conversion events to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// Quantize `source` and lay out the container.
    pub fn convert(
        &self,
        source: &dyn PixelSource,
    ) -> EncodeResult<(ImageContainer, ConversionSummary)> {
        let (width, height) = source.dimensions();
        if width > u16::MAX as u32 || height > u16::MAX as u32 {
            return Err(ContainerError::DimensionsTooLarge { width, height }.into());
        }

        let quantization = self.quantizer.quantize(source, self.depth);
        if let Some(suggested_bpp) = quantization.suggested_bpp() {
            self.reporter
                .report(&ConversionEvent::FewerColorsThanRequested {
                    distinct: quantization.distinct_colors,
                    requested: self.depth.colors(),
                    suggested_bpp,
                });
        }

        let container = ImageContainer::new(&quantization.palette, &quantization.raster)?;
        let summary = summarize(container.header(), quantization.distinct_colors);
        debug!(
            width,
            height,
            colors = self.depth.colors(),
            bpp = self.depth.bpp(),
            quantizer = self.quantizer.name(),
            bytes = summary.total_bytes,
            "Encoded image"
        );
        Ok((container, ConversionSummary::Image(summary)))
    }

    /// Convert the image at `input` and write the container to `output`.
    ///
    /// Nothing is written unless the whole conversion succeeds.
    pub fn convert_file(&self, input: &Path, output: &Path) -> EncodeResult<ConversionSummary> {
        let image = load_image(input)?;
        let (container, summary) = self.convert(&image)?;

        let bytes = container.to_bytes();
        write_atomic(output, &bytes)?;
        self.reporter.report(&ConversionEvent::ContainerWritten {
            path: output.to_path_buf(),
            bytes: bytes.len(),
        });
        info!(
            input = %input.display(),
            output = %output.display(),
            bytes = bytes.len(),
            "Converted image"
        );
        Ok(summary)
    }
}

fn summarize(header: &ImageHeader, distinct_colors: usize) -> ImageSummary {
    ImageSummary {
        width: header.width,
        height: header.height,
        colors: header.colors,
        bpp: header.bpp,
        distinct_colors,
        palette_bytes: header.colors as usize * 2,
        bitmap_bytes: header.bitmap_len(),
        total_bytes: header.total_len() as usize,
    }
}
