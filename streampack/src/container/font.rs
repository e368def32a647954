//! Font container layout.
//!
//! ```text
//! offset      size        field
//! 0           4           magic "FONT"
//! 4           1           bpp
//! 5           2           glyph height (u16 LE)
//! 7           2           max glyph width (u16 LE)
//! 9           1           offset entry width in bytes (ow)
//! 10          2           character map length in bytes (m)
//! 12          m           character map, UTF-8, ascending code points
//! 12+m        n           width table, u8 per glyph
//! 12+m+n      n × ow      offset table, glyph start in bits (LE)
//! 12+m+n+n·ow …           glyph bitmaps, one continuous bit stream
//! ```
//!
//! `n` is the number of characters in the map. Glyph `i` occupies
//! `width[i] * height * bpp` bits starting at `offset[i]`; glyphs follow one
//! another without padding, so `offset[i + 1] = offset[i] + width[i] * height * bpp`.

use std::collections::BTreeMap;
use std::ops::Range;

use super::{bit_span_bytes, read_u16, require, ContainerError, ContainerResult};
use crate::bits::{packed_len, BitReader, BitWriter};
use crate::quantize::ColorDepth;

/// Magic bytes opening every font container.
pub const FONT_MAGIC: &[u8; 4] = b"FONT";

const FIXED_HEADER_LEN: usize = 12;

/// Font header including the character map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHeader {
    pub bpp: u8,
    pub height: u16,
    pub max_width: u16,
    /// Bytes per offset-table entry, 1 to 4.
    pub offset_width: u8,
    /// Characters in map order (ascending code point).
    pub characters: Vec<char>,
    map_len: u16,
}

impl FontHeader {
    /// Length of the fixed part preceding the character map.
    pub const FIXED_SIZE: usize = FIXED_HEADER_LEN;

    /// Total header length (fixed part plus character map), read from the
    /// first [`FIXED_SIZE`](Self::FIXED_SIZE) bytes.
    ///
    /// A streaming reader reads the fixed part, calls this, then reads the
    /// rest of the header.
    pub fn header_len(prefix: &[u8]) -> ContainerResult<usize> {
        Self::check_magic(prefix)?;
        require(prefix, FIXED_HEADER_LEN)?;
        Ok(FIXED_HEADER_LEN + read_u16(prefix, 10) as usize)
    }

    fn check_magic(bytes: &[u8]) -> ContainerResult<()> {
        require(bytes, FONT_MAGIC.len())?;
        if &bytes[..4] != FONT_MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(&bytes[..4]);
            return Err(ContainerError::BadMagic {
                expected: *FONT_MAGIC,
                found,
            });
        }
        Ok(())
    }

    /// Parse the fixed header and character map.
    pub fn parse(bytes: &[u8]) -> ContainerResult<Self> {
        let header_len = Self::header_len(bytes)?;
        require(bytes, header_len)?;

        let bpp = bytes[4];
        if !(1..=8).contains(&bpp) {
            return Err(ContainerError::InvalidHeader(format!("bpp {}", bpp)));
        }
        let offset_width = bytes[9];
        if !(1..=4).contains(&offset_width) {
            return Err(ContainerError::InvalidHeader(format!(
                "offset width {}",
                offset_width
            )));
        }

        let map = std::str::from_utf8(&bytes[FIXED_HEADER_LEN..header_len])
            .map_err(|e| ContainerError::InvalidCharacterMap(e.to_string()))?;
        let characters: Vec<char> = map.chars().collect();
        if let Some(pair) = characters.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ContainerError::InvalidCharacterMap(format!(
                "{:?} does not sort before {:?}",
                pair[0], pair[1]
            )));
        }

        Ok(Self {
            bpp,
            height: read_u16(bytes, 5),
            max_width: read_u16(bytes, 7),
            offset_width,
            characters,
            map_len: (header_len - FIXED_HEADER_LEN) as u16,
        })
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(FONT_MAGIC);
        out.push(self.bpp);
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.max_width.to_le_bytes());
        out.push(self.offset_width);
        out.extend_from_slice(&self.map_len.to_le_bytes());
        for c in &self.characters {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.characters.len()
    }

    /// Byte length of the character map.
    pub fn map_len(&self) -> u16 {
        self.map_len
    }

    /// Position of `character` in the map.
    pub fn glyph_index(&self, character: char) -> Option<usize> {
        self.characters.binary_search(&character).ok()
    }

    /// File offset of the first width-table entry.
    pub fn width_table_offset(&self) -> u64 {
        (FIXED_HEADER_LEN + self.map_len as usize) as u64
    }

    pub fn width_entry_offset(&self, index: usize) -> u64 {
        self.width_table_offset() + index as u64
    }

    /// File offset of the first offset-table entry.
    pub fn offset_table_offset(&self) -> u64 {
        self.width_table_offset() + self.glyph_count() as u64
    }

    pub fn offset_entry_offset(&self, index: usize) -> u64 {
        self.offset_table_offset() + index as u64 * self.offset_width as u64
    }

    /// File offset of the first glyph bitmap byte.
    pub fn bitmap_offset(&self) -> u64 {
        self.offset_table_offset() + self.glyph_count() as u64 * self.offset_width as u64
    }

    /// Bits used by a glyph of `width` pixels.
    pub fn glyph_bits(&self, width: u8) -> u64 {
        width as u64 * self.height as u64 * self.bpp as u64
    }

    /// File byte range holding a glyph of `width` pixels starting at
    /// `bit_offset`.
    pub fn glyph_byte_range(&self, bit_offset: u32, width: u8) -> Range<u64> {
        bit_span_bytes(
            self.bitmap_offset(),
            bit_offset as u64,
            self.glyph_bits(width),
        )
    }

    /// Decode one little-endian offset-table entry.
    pub fn decode_offset(&self, entry: &[u8]) -> u32 {
        entry
            .iter()
            .take(self.offset_width as usize)
            .rev()
            .fold(0u32, |acc, &b| acc << 8 | b as u32)
    }
}

/// Width-table and offset-table entry for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontGlyph {
    pub character: char,
    pub width: u8,
    /// Start of the glyph in the bitmap section, in bits.
    pub bit_offset: u32,
}

/// A complete font container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontContainer {
    header: FontHeader,
    widths: Vec<u8>,
    offsets: Vec<u32>,
    bitmap: Vec<u8>,
}

impl FontContainer {
    pub fn header(&self) -> &FontHeader {
        &self.header
    }

    pub fn widths(&self) -> &[u8] {
        &self.widths
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Table entries for `character`.
    pub fn glyph(&self, character: char) -> Option<FontGlyph> {
        let index = self.header.glyph_index(character)?;
        Some(FontGlyph {
            character,
            width: self.widths[index],
            bit_offset: self.offsets[index],
        })
    }

    /// All glyphs in map order.
    pub fn glyphs(&self) -> impl Iterator<Item = FontGlyph> + '_ {
        self.header
            .characters
            .iter()
            .zip(self.widths.iter().zip(&self.offsets))
            .map(|(&character, (&width, &bit_offset))| FontGlyph {
                character,
                width,
                bit_offset,
            })
    }

    /// Level stored for pixel `(x, y)` of `character`.
    pub fn glyph_pixel(&self, character: char, x: u8, y: u16) -> Option<u8> {
        let glyph = self.glyph(character)?;
        if x >= glyph.width || y >= self.header.height {
            return None;
        }
        let bit = glyph.bit_offset as u64
            + (y as u64 * glyph.width as u64 + x as u64) * self.header.bpp as u64;
        BitReader::new(&self.bitmap)
            .read_at(bit, self.header.bpp)
            .map(|v| v as u8)
    }

    /// Serialize the container.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.bitmap_offset() as usize + self.bitmap.len());
        self.header.write_to(&mut out);
        out.extend_from_slice(&self.widths);
        let ow = self.header.offset_width as usize;
        for offset in &self.offsets {
            out.extend_from_slice(&offset.to_le_bytes()[..ow]);
        }
        out.extend_from_slice(&self.bitmap);
        out
    }

    /// Parse a serialized container, checking table and bitmap lengths.
    pub fn from_bytes(bytes: &[u8]) -> ContainerResult<Self> {
        let header = FontHeader::parse(bytes)?;
        let n = header.glyph_count();
        let bitmap_start = header.bitmap_offset() as usize;
        require(bytes, bitmap_start)?;

        let width_start = header.width_table_offset() as usize;
        let widths = bytes[width_start..width_start + n].to_vec();

        let ow = header.offset_width as usize;
        let offset_start = header.offset_table_offset() as usize;
        let offsets: Vec<u32> = bytes[offset_start..bitmap_start]
            .chunks_exact(ow)
            .map(|entry| header.decode_offset(entry))
            .collect();

        let mut expected_bits = 0u64;
        for (i, (&offset, &width)) in offsets.iter().zip(&widths).enumerate() {
            if offset as u64 != expected_bits {
                return Err(ContainerError::InvalidHeader(format!(
                    "glyph {} starts at bit {}, expected {}",
                    i, offset, expected_bits
                )));
            }
            expected_bits += header.glyph_bits(width);
        }
        let bitmap_len = expected_bits.div_ceil(8) as usize;
        require(bytes, bitmap_start + bitmap_len)?;
        if bytes.len() > bitmap_start + bitmap_len {
            return Err(ContainerError::InvalidHeader(format!(
                "{} trailing bytes after glyph bitmaps",
                bytes.len() - bitmap_start - bitmap_len
            )));
        }

        Ok(Self {
            header,
            widths,
            offsets,
            bitmap: bytes[bitmap_start..].to_vec(),
        })
    }
}

/// Collects glyph bitmaps and lays out a [`FontContainer`].
///
/// Glyphs may be added in any order; the container stores them sorted by
/// code point. Adding a character twice keeps the first bitmap.
#[derive(Debug)]
pub struct FontBuilder {
    height: u16,
    depth: ColorDepth,
    glyphs: BTreeMap<char, (u32, Vec<u8>)>,
}

impl FontBuilder {
    /// Start a font of `height` rows with `depth.bpp()` bits per pixel.
    pub fn new(height: u16, depth: ColorDepth) -> Self {
        Self {
            height,
            depth,
            glyphs: BTreeMap::new(),
        }
    }

    /// Add a glyph of `width` pixels; `levels` holds `width * height`
    /// row-major values below `depth.colors()`.
    ///
    /// # Panics
    ///
    /// Panics if `levels` does not match `width * height`.
    pub fn add_glyph(&mut self, character: char, width: u32, levels: Vec<u8>) -> &mut Self {
        assert_eq!(
            levels.len() as u64,
            width as u64 * self.height as u64,
            "glyph level count must match width × height"
        );
        self.glyphs.entry(character).or_insert((width, levels));
        self
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Lay out the tables and pack every glyph into one bit stream.
    pub fn finish(self) -> ContainerResult<FontContainer> {
        if self.glyphs.is_empty() {
            return Err(ContainerError::EmptyCharacterSet);
        }

        let bpp = self.depth.bpp();
        let mut map_len = 0usize;
        let mut widths = Vec::with_capacity(self.glyphs.len());
        let mut offsets = Vec::with_capacity(self.glyphs.len());
        let total_bits: u64 = self
            .glyphs
            .values()
            .map(|(w, _)| *w as u64 * self.height as u64 * bpp as u64)
            .sum();
        let mut writer = BitWriter::with_capacity(packed_len(total_bits, 1));

        for (&character, (width, levels)) in &self.glyphs {
            let width = u8::try_from(*width).map_err(|_| ContainerError::GlyphTooWide {
                character,
                width: *width,
            })?;
            let offset = u32::try_from(writer.bit_len()).map_err(|_| {
                ContainerError::InvalidHeader("glyph bitmaps exceed 4 GiB of bits".to_string())
            })?;
            map_len += character.len_utf8();
            widths.push(width);
            offsets.push(offset);
            for &level in levels {
                writer.write(level as u32, bpp);
            }
        }

        let map_len =
            u16::try_from(map_len).map_err(|_| ContainerError::CharacterMapTooLong(map_len))?;
        let max_offset = offsets.last().copied().unwrap_or(0);
        let max_width = widths.iter().copied().max().unwrap_or(0) as u16;

        Ok(FontContainer {
            header: FontHeader {
                bpp,
                height: self.height,
                max_width,
                offset_width: offset_width_for(max_offset),
                characters: self.glyphs.keys().copied().collect(),
                map_len,
            },
            widths,
            offsets,
            bitmap: writer.finish().into_bytes(),
        })
    }
}

/// Smallest number of bytes (at least 1) that can hold `max_offset`.
fn offset_width_for(max_offset: u32) -> u8 {
    match max_offset {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}
