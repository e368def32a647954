//! Conversion progress reporting.
//!
//! Converters never print. Anything a user might want to see goes through a
//! [`Reporter`], which the caller picks:
//!
//! ```text
//! ImageConverter ──┐
//!                  ├──▶ Arc<dyn Reporter> ──▶ NullReporter     (default)
//! FontConverter  ──┘                     └──▶ TracingReporter  (CLI)
//! ```

use std::path::PathBuf;

use tracing::{debug, info, warn};

/// Something worth telling the user about during a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionEvent {
    /// The image has fewer distinct colors than the palette holds; a
    /// smaller depth would encode it without loss.
    FewerColorsThanRequested {
        distinct: usize,
        requested: u16,
        suggested_bpp: u8,
    },

    /// A requested character is not in the font and was drawn as `.notdef`.
    MissingGlyph { character: char },

    /// One glyph finished rendering.
    GlyphRendered { character: char, width: u32 },

    /// A container was written.
    ContainerWritten { path: PathBuf, bytes: usize },
}

/// Receives [`ConversionEvent`]s.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &ConversionEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &ConversionEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &ConversionEvent) {
        match event {
            ConversionEvent::FewerColorsThanRequested {
                distinct,
                requested,
                suggested_bpp,
            } => warn!(
                distinct,
                requested,
                suggested_bpp,
                "Image has fewer colors than requested, a smaller palette would do"
            ),
            // The rasterizer already warns when it falls back to .notdef
            ConversionEvent::MissingGlyph { character } => {
                debug!(character = ?character, "Character missing from font")
            }
            ConversionEvent::GlyphRendered { character, width } => {
                debug!(character = ?character, width, "Rendered glyph")
            }
            ConversionEvent::ContainerWritten { path, bytes } => {
                info!(path = %path.display(), bytes, "Wrote container")
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingReporter;
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reporters_are_object_safe() {
        let reporters: Vec<Arc<dyn Reporter>> = vec![
            Arc::new(NullReporter),
            Arc::new(TracingReporter),
            Arc::new(RecordingReporter::default()),
        ];
        for reporter in &reporters {
            reporter.report(&ConversionEvent::MissingGlyph { character: '?' });
        }
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::default();
        reporter.report(&ConversionEvent::GlyphRendered {
            character: 'a',
            width: 3,
        });
        reporter.report(&ConversionEvent::MissingGlyph { character: 'b' });
        assert_eq!(
            reporter.events(),
            vec![
                ConversionEvent::GlyphRendered {
                    character: 'a',
                    width: 3
                },
                ConversionEvent::MissingGlyph { character: 'b' },
            ]
        );
    }
}
