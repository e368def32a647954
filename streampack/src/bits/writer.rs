//! Bit stream construction.

/// A finished, byte-aligned bit stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitStream {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl BitStream {
    /// Packed bytes, trailing byte zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of meaningful bits (excludes trailing padding).
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Appends fixed-width values MSB-first with no alignment between them.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u64,
    pending: u32,
    bit_len: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bytes` output bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Append the low `bits` bits of `value`, most significant bit first.
    ///
    /// `bits` may be 0 (nothing is written) up to 32.
    pub fn write(&mut self, value: u32, bits: u8) {
        debug_assert!(bits <= 32, "at most 32 bits per write");
        if bits == 0 {
            return;
        }
        let bits = bits as u32;
        let value = value as u64 & ((1u64 << bits) - 1);
        self.acc = (self.acc << bits) | value;
        self.pending += bits;
        while self.pending >= 8 {
            self.pending -= 8;
            self.bytes.push((self.acc >> self.pending) as u8);
        }
        self.acc &= (1u64 << self.pending) - 1;
        self.bit_len += bits as u64;
    }

    /// Bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Flush the partial byte, padding with zeros.
    pub fn finish(mut self) -> BitStream {
        if self.pending > 0 {
            self.bytes.push((self.acc << (8 - self.pending)) as u8);
        }
        BitStream {
            bytes: self.bytes,
            bit_len: self.bit_len,
        }
    }
}
