//! `convert-image` command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use streampack::config::EncoderConfig;
use streampack::convert::ImageConverter;
use streampack::report::TracingReporter;

use super::common::{default_image_output, report_written};
use crate::error::CliError;

/// Arguments for `convert-image`.
#[derive(Debug, Args)]
pub struct ConvertImageArgs {
    /// Image to convert (any format the decoder understands)
    pub input: PathBuf,

    /// Palette size, a power of two from 1 to 256
    pub colors: u32,

    /// Output file [default: input path with a .bin extension]
    pub output: Option<PathBuf>,

    /// Also write a human-readable .info report
    #[arg(long)]
    pub info: bool,
}

/// Run `convert-image`.
pub fn run(args: ConvertImageArgs, config: &EncoderConfig) -> Result<(), CliError> {
    // Validate before touching either file
    let converter = ImageConverter::new(args.colors)?.with_reporter(Arc::new(TracingReporter));

    let output = args
        .output
        .unwrap_or_else(|| default_image_output(&args.input));
    if output == args.input {
        return Err(CliError::Config(format!(
            "output would overwrite the input image: {}",
            output.display()
        )));
    }

    let summary = converter.convert_file(&args.input, &output)?;
    report_written(&output, &summary, args.info || config.write_info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use streampack::container::ImageContainer;
    use streampack::EncodeError;
    use tempfile::TempDir;

    fn write_png(path: &std::path::Path) {
        ::image::RgbImage::from_fn(4, 4, |x, y| ::image::Rgb([(x * 60) as u8, (y * 60) as u8, 0]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_converts_with_default_output() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("tile.png");
        write_png(&input);

        let args = ConvertImageArgs {
            input: input.clone(),
            colors: 4,
            output: None,
            info: true,
        };
        run(args, &EncoderConfig::default()).unwrap();

        let bytes = std::fs::read(temp.path().join("tile.bin")).unwrap();
        let container = ImageContainer::from_bytes(&bytes).unwrap();
        assert_eq!(container.header().colors, 4);
        assert!(temp.path().join("tile.info").exists());
    }

    #[test]
    fn test_explicit_output_without_info() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("tile.png");
        let output = temp.path().join("out.bin");
        write_png(&input);

        let args = ConvertImageArgs {
            input,
            colors: 2,
            output: Some(output.clone()),
            info: false,
        };
        run(args, &EncoderConfig::default()).unwrap();

        let container = ImageContainer::from_bytes(&std::fs::read(&output).unwrap()).unwrap();
        assert_eq!(container.header().colors, 2);
        assert!(!temp.path().join("out.info").exists());
    }

    #[test]
    fn test_invalid_colors_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("tile.png");
        write_png(&input);

        let args = ConvertImageArgs {
            input,
            colors: 3,
            output: None,
            info: false,
        };
        let err = run(args, &EncoderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Encode(EncodeError::InvalidColorDepth(3))
        ));
        assert!(!temp.path().join("tile.bin").exists());
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("tile.bin");
        let args = ConvertImageArgs {
            input,
            colors: 4,
            output: None,
            info: false,
        };
        assert!(matches!(
            run(args, &EncoderConfig::default()),
            Err(CliError::Config(_))
        ));
    }
}
