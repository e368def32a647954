//! `inspect` command: print a container's header.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::Args;
use streampack::container::{ContainerError, ContainerKind, FontContainer, ImageContainer};

use crate::error::CliError;

/// Arguments for `inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Image or font container to describe
    pub container: PathBuf,
}

/// Run `inspect`.
pub fn run(args: InspectArgs) -> Result<(), CliError> {
    print!("{}", describe_file(&args.container)?);
    Ok(())
}

/// Describe the container stored at `path`.
pub fn describe_file(path: &Path) -> Result<String, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    describe(&bytes).map_err(|source| CliError::Inspect {
        path: path.to_path_buf(),
        source,
    })
}

/// Human-readable description of a serialized container.
pub fn describe(bytes: &[u8]) -> Result<String, ContainerError> {
    Ok(match ContainerKind::detect(bytes) {
        ContainerKind::Image => ImageReport(&ImageContainer::from_bytes(bytes)?).to_string(),
        ContainerKind::Font => FontReport(&FontContainer::from_bytes(bytes)?).to_string(),
    })
}

struct ImageReport<'a>(&'a ImageContainer);

impl fmt::Display for ImageReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.0.header();
        writeln!(f, "Image container")?;
        writeln!(f, "  Size:    {}x{}", header.width, header.height)?;
        writeln!(f, "  Colors:  {}", header.colors)?;
        writeln!(f, "  BPP:     {}", header.bpp)?;
        writeln!(
            f,
            "  Bitmap:  {} bytes at offset {}",
            header.bitmap_len(),
            header.bitmap_offset()
        )?;
        writeln!(f, "  Total:   {} bytes", header.total_len())?;
        write!(f, "  Palette:")?;
        for (i, color) in self.0.palette().iter().enumerate() {
            if i % 8 == 0 {
                write!(f, "\n   ")?;
            }
            write!(f, " {}", color)?;
        }
        writeln!(f)
    }
}

struct FontReport<'a>(&'a FontContainer);

impl fmt::Display for FontReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.0.header();
        let characters: String = header.characters.iter().collect();
        writeln!(f, "Font container")?;
        writeln!(f, "  BPP:          {}", header.bpp)?;
        writeln!(f, "  Height:       {}", header.height)?;
        writeln!(f, "  Max width:    {}", header.max_width)?;
        writeln!(f, "  Offset width: {} bytes", header.offset_width)?;
        writeln!(f, "  Glyphs:       {}", header.glyph_count())?;
        writeln!(f, "  Characters:   {:?}", characters)?;
        writeln!(
            f,
            "  Bitmap:       {} bytes at offset {}",
            self.0.bitmap().len(),
            header.bitmap_offset()
        )?;
        writeln!(f, "  Glyph table:")?;
        for glyph in self.0.glyphs() {
            writeln!(
                f,
                "    {:<10} width {:>3}  bit {}",
                format!("{:?}", glyph.character),
                glyph.width,
                glyph.bit_offset
            )?;
        }
        Ok(())
    }
}
