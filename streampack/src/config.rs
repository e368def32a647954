//! Encoder defaults loaded from an INI file.
//!
//! The file lives at `<config dir>/streampack/config.ini` unless a path is
//! given explicitly. A missing file is not an error; every key is optional.
//!
//! ```ini
//! [font]
//! bpp = 1
//! characters = 0123456789
//!
//! [output]
//! write_info = false
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use crate::error::{EncodeError, EncodeResult};

/// Printable ASCII, 0x20 through 0x7E.
pub const PRINTABLE_ASCII: &str =
    " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

const APP_DIR: &str = "streampack";
const CONFIG_FILE: &str = "config.ini";

/// Defaults applied when the command line leaves a value unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Bits per pixel for font glyphs.
    pub font_bpp: u8,

    /// Characters included in a font container.
    pub characters: String,

    /// Whether to write a `.info` report next to each container.
    pub write_info: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            font_bpp: 1,
            characters: PRINTABLE_ASCII.to_string(),
            write_info: false,
        }
    }
}

impl EncoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default font bits per pixel.
    pub fn with_font_bpp(mut self, bpp: u8) -> Self {
        self.font_bpp = bpp;
        self
    }

    /// Set the default character set.
    pub fn with_characters(mut self, characters: impl Into<String>) -> Self {
        self.characters = characters.into();
        self
    }

    /// Enable or disable `.info` sidecars.
    pub fn with_write_info(mut self, write_info: bool) -> Self {
        self.write_info = write_info;
        self
    }

    /// Load from the default location, falling back to defaults if the
    /// file or the config directory does not exist.
    pub fn load() -> EncodeResult<Self> {
        match config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> EncodeResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)
            .map_err(|e| EncodeError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Parse INI text.
    pub fn from_ini_str(text: &str) -> EncodeResult<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| EncodeError::Config(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> EncodeResult<Self> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("font")) {
            if let Some(value) = section.get("bpp") {
                let bpp = parse_number::<u8>("font.bpp", value)?;
                if !(1..=8).contains(&bpp) {
                    return Err(EncodeError::Config(format!(
                        "font.bpp: expected 1 to 8, got {}",
                        bpp
                    )));
                }
                config.font_bpp = bpp;
            }
            if let Some(value) = section.get("characters") {
                if value.is_empty() {
                    return Err(EncodeError::Config(
                        "font.characters: must not be empty".to_string(),
                    ));
                }
                config.characters = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("output")) {
            if let Some(value) = section.get("write_info") {
                config.write_info = parse_bool("output.write_info", value)?;
            }
        }

        Ok(config)
    }
}

/// `<config dir>/streampack/config.ini`, if the platform has a config dir.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> EncodeResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EncodeError::Config(format!("{}: '{}' is not a valid number", key, value)))
}

fn parse_bool(key: &str, value: &str) -> EncodeResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(EncodeError::Config(format!(
            "{}: '{}' is not a boolean",
            key, value
        ))),
    }
}
