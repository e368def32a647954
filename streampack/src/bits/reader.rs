//! Random-access bit extraction.

/// Reads fixed-width MSB-first values at arbitrary bit offsets.
#[derive(Debug, Clone, Copy)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Total bits available, including any trailing padding.
    pub fn capacity_bits(&self) -> u64 {
        self.bytes.len() as u64 * 8
    }

    /// Read `bits` bits (up to 32) starting at `bit_offset`.
    ///
    /// Returns `None` if the range runs past the end of the buffer.
    pub fn read_at(&self, bit_offset: u64, bits: u8) -> Option<u32> {
        if bits == 0 {
            return Some(0);
        }
        if bits > 32 {
            return None;
        }
        let end = bit_offset.checked_add(bits as u64)?;
        if end > self.capacity_bits() {
            return None;
        }

        let mut value = 0u32;
        for pos in bit_offset..end {
            let byte = self.bytes[(pos / 8) as usize];
            let bit = (byte >> (7 - (pos % 8))) & 1;
            value = (value << 1) | bit as u32;
        }
        Some(value)
    }

    /// Read `count` consecutive values of `bits` bits starting at `bit_offset`.
    pub fn read_run(&self, bit_offset: u64, bits: u8, count: usize) -> Option<Vec<u32>> {
        (0..count as u64)
            .map(|n| self.read_at(bit_offset + n * bits as u64, bits))
            .collect()
    }
}
