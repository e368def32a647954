//! Dense MSB-first bit packing.
//!
//! Indices are written back to back with no row alignment: the value for
//! sample `n` at `bpp` bits per sample always starts at bit `n * bpp`. Only
//! the final byte of a stream can carry padding, and that padding is zero.
//!
//! ```
//! use streampack::bits::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! for index in [1u32, 2, 3, 0] {
//!     writer.write(index, 2);
//! }
//! let stream = writer.finish();
//! assert_eq!(stream.as_bytes(), &[0b01_10_11_00]);
//!
//! let reader = BitReader::new(stream.as_bytes());
//! assert_eq!(reader.read_at(2 * 2, 2), Some(3));
//! ```

mod reader;
mod writer;

pub use reader::BitReader;
pub use writer::{BitStream, BitWriter};

/// Number of bytes needed to hold `count` samples of `bpp` bits.
pub fn packed_len(count: u64, bpp: u8) -> usize {
    (count * bpp as u64).div_ceil(8) as usize
}

/// Pack a slice of indices at `bpp` bits each.
pub fn pack_indices(indices: &[u8], bpp: u8) -> BitStream {
    let mut writer = BitWriter::with_capacity(packed_len(indices.len() as u64, bpp));
    for &index in indices {
        writer.write(index as u32, bpp);
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(4, 2), 1);
        assert_eq!(packed_len(5, 2), 2);
        assert_eq!(packed_len(1, 8), 1);
        assert_eq!(packed_len(3, 3), 2);
        assert_eq!(packed_len(100, 0), 0);
        assert_eq!(packed_len(0, 8), 0);
    }

    #[test]
    fn test_pack_indices_crosses_byte_boundary() {
        // 3 samples at 3 bpp: 101 011 110 -> 10101111 0xxxxxxx
        let stream = pack_indices(&[0b101, 0b011, 0b110], 3);
        assert_eq!(stream.as_bytes(), &[0b1010_1111, 0b0000_0000]);
        assert_eq!(stream.bit_len(), 9);
    }

    #[test]
    fn test_pack_indices_trailing_padding_is_zero() {
        let stream = pack_indices(&[1, 1, 1, 1, 1], 1);
        assert_eq!(stream.as_bytes(), &[0b1111_1000]);
    }

    #[test]
    fn test_pack_zero_bpp_is_empty() {
        let stream = pack_indices(&[0, 0, 0, 0], 0);
        assert!(stream.as_bytes().is_empty());
        assert_eq!(stream.bit_len(), 0);
    }

    proptest! {
        #[test]
        fn test_pack_then_read_reproduces_indices(
            bpp in 1u8..=8,
            seed in proptest::collection::vec(any::<u8>(), 0..300)
        ) {
            let mask = ((1u16 << bpp) - 1) as u8;
            let indices: Vec<u8> = seed.iter().map(|v| v & mask).collect();
            let stream = pack_indices(&indices, bpp);

            prop_assert_eq!(stream.as_bytes().len(), packed_len(indices.len() as u64, bpp));

            let reader = BitReader::new(stream.as_bytes());
            for (n, &expected) in indices.iter().enumerate() {
                let value = reader.read_at(n as u64 * bpp as u64, bpp);
                prop_assert_eq!(value, Some(expected as u32));
            }
        }
    }
}
