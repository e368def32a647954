//! 24-bit colors and their 16-bit wire representation.
//!
//! Display controllers in the ST7789 family take RGB565 pixels. The wire
//! value is the RGB565 word with its two bytes swapped, so that a reader
//! pulling two raw bytes into a little-endian `u16` gets the panel's
//! native big-endian order without any extra work.

use std::fmt;

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into `0x00RRGGBB`.
    ///
    /// Ordering by this key is the ordering the quantizer uses for its
    /// histogram.
    pub fn key(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Squared euclidean distance in RGB space.
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(c: image::Rgb<u8>) -> Self {
        Rgb::new(c.0[0], c.0[1], c.0[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Byte-swapped RGB565 color as stored in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireColor(u16);

impl WireColor {
    /// Transcode a 24-bit color. Drops the low 3 bits of red and blue and
    /// the low 2 bits of green.
    pub fn from_rgb(color: Rgb) -> Self {
        let rgb565 = ((color.r as u16 & 0xF8) << 8)
            | ((color.g as u16 & 0xFC) << 3)
            | (color.b as u16 >> 3);
        WireColor(rgb565.swap_bytes())
    }

    /// Wrap a raw wire value read from a container.
    pub fn from_raw(value: u16) -> Self {
        WireColor(value)
    }

    /// The swapped value.
    pub fn value(self) -> u16 {
        self.0
    }

    /// The unswapped RGB565 word.
    pub fn rgb565(self) -> u16 {
        self.0.swap_bytes()
    }

    /// Bytes in container order (little-endian encoding of the wire value).
    pub fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    /// Expand back to 24 bits. The truncated low bits come back as zero.
    pub fn to_rgb(self) -> Rgb {
        let v = self.rgb565();
        Rgb::new(
            ((v >> 8) & 0xF8) as u8,
            ((v >> 3) & 0xFC) as u8,
            ((v << 3) & 0xF8) as u8,
        )
    }
}

impl From<Rgb> for WireColor {
    fn from(color: Rgb) -> Self {
        WireColor::from_rgb(color)
    }
}

impl fmt::Display for WireColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}
