//! `convert-font` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use streampack::config::EncoderConfig;
use streampack::convert::FontConverter;
use streampack::report::TracingReporter;

use super::common::{default_font_output, report_written};
use crate::error::CliError;

/// Arguments for `convert-font`.
#[derive(Debug, Args)]
pub struct ConvertFontArgs {
    /// TrueType or OpenType font file
    pub font: PathBuf,

    /// Glyph height in pixels
    pub size: u32,

    /// Output file [default: <font stem>-<size>.font next to the font]
    pub output: Option<PathBuf>,

    /// Characters to include [default: from config, else printable ASCII]
    #[arg(long, conflicts_with = "chars_file")]
    pub chars: Option<String>,

    /// Read the characters to include from a UTF-8 text file
    #[arg(long)]
    pub chars_file: Option<PathBuf>,

    /// Bits per pixel, 1 to 8 [default: from config, else 1]
    #[arg(long)]
    pub bpp: Option<u8>,

    /// Also write a human-readable .info report
    #[arg(long)]
    pub info: bool,
}

/// Characters from `--chars`, `--chars-file` or the config, in that order.
/// Line breaks in a characters file are ignored.
fn resolve_characters(args: &ConvertFontArgs, config: &EncoderConfig) -> Result<String, CliError> {
    if let Some(chars) = &args.chars {
        return Ok(chars.clone());
    }
    if let Some(path) = &args.chars_file {
        return read_characters_file(path);
    }
    Ok(config.characters.clone())
}

fn read_characters_file(path: &Path) -> Result<String, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}

/// Run `convert-font`.
pub fn run(args: ConvertFontArgs, config: &EncoderConfig) -> Result<(), CliError> {
    let characters = resolve_characters(&args, config)?;
    let converter = FontConverter::new(args.size)?
        .with_bpp(args.bpp.unwrap_or(config.font_bpp))?
        .with_characters(characters)
        .with_reporter(Arc::new(TracingReporter));

    let output = args
        .output
        .unwrap_or_else(|| default_font_output(&args.font, args.size));
    let summary = converter.convert_file(&args.font, &output)?;
    report_written(&output, &summary, args.info || config.write_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use streampack::EncodeError;
    use tempfile::TempDir;

    fn args(font: PathBuf) -> ConvertFontArgs {
        ConvertFontArgs {
            font,
            size: 12,
            output: None,
            chars: None,
            chars_file: None,
            bpp: None,
            info: false,
        }
    }

    #[test]
    fn test_characters_precedence() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("chars.txt");
        std::fs::write(&file, "xyz\n123\r\n").unwrap();
        let config = EncoderConfig::default().with_characters("cfg");

        let mut a = args(PathBuf::from("f.ttf"));
        assert_eq!(resolve_characters(&a, &config).unwrap(), "cfg");

        a.chars_file = Some(file);
        assert_eq!(resolve_characters(&a, &config).unwrap(), "xyz123");

        a.chars = Some("AB".to_string());
        assert_eq!(resolve_characters(&a, &config).unwrap(), "AB");
    }

    #[test]
    fn test_missing_chars_file() {
        let mut a = args(PathBuf::from("f.ttf"));
        a.chars_file = Some(PathBuf::from("/nonexistent/streampack/chars.txt"));
        assert!(matches!(
            resolve_characters(&a, &EncoderConfig::default()),
            Err(CliError::Read { .. })
        ));
    }

    #[test]
    fn test_invalid_bpp_before_reading_font() {
        let mut a = args(PathBuf::from("/nonexistent/font.ttf"));
        a.bpp = Some(9);
        assert!(matches!(
            run(a, &EncoderConfig::default()),
            Err(CliError::Encode(EncodeError::InvalidBitsPerPixel(9)))
        ));
    }

    #[test]
    fn test_invalid_size() {
        let mut a = args(PathBuf::from("/nonexistent/font.ttf"));
        a.size = 0;
        assert!(matches!(
            run(a, &EncoderConfig::default()),
            Err(CliError::Encode(EncodeError::InvalidFontSize(0)))
        ));
    }

    #[test]
    fn test_garbage_font_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let font = temp.path().join("junk.ttf");
        std::fs::write(&font, b"\0\0\0\0junk").unwrap();

        let result = run(args(font), &EncoderConfig::default());
        assert!(matches!(
            result,
            Err(CliError::Encode(EncodeError::UnsupportedFontFormat { .. }))
        ));
        assert!(!temp.path().join("junk-12.font").exists());
    }
}
