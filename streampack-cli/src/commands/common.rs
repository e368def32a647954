//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use streampack::config::EncoderConfig;
use streampack::convert::ConversionSummary;
use streampack::output::write_info;
use tracing::debug;

use crate::error::CliError;

/// Load the config file, honoring `--config` when given.
pub fn load_config(path: Option<&Path>) -> Result<EncoderConfig, CliError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            EncoderConfig::load_from(path)?
        }
        None => EncoderConfig::load()?,
    };
    debug!(?config, "Effective config");
    Ok(config)
}

/// `<input>.bin` next to the input image.
pub fn default_image_output(input: &Path) -> PathBuf {
    input.with_extension("bin")
}

/// `<stem>-<size>.font` next to the input font.
pub fn default_font_output(font: &Path, size: u32) -> PathBuf {
    let stem = font
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".to_string());
    font.with_file_name(format!("{}-{}.font", stem, size))
}

/// Print what was written and, if requested, write the `.info` sidecar.
pub fn report_written(
    output: &Path,
    summary: &ConversionSummary,
    with_info: bool,
) -> Result<(), CliError> {
    println!(
        "Wrote {} ({} bytes)",
        output.display(),
        summary.total_bytes()
    );
    if with_info {
        let info = write_info(output, summary)?;
        println!("Wrote {}", info.display());
    }
    Ok(())
}
