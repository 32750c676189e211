//! The 112-bit block window.
//!
//! One block packs 8 codewords of 14 bits each with no gaps: symbol 0 lands in the highest
//! 14 bits (111..98) and symbol 7 in the lowest (13..0). The window serializes as 14 bytes,
//! most significant byte first, with no padding. This byte layout is the only wire format
//! the codec defines.
//!
//! The window is held in a `u128` whose top 16 bits are always zero.

use crate::consts::{
    CODEWORD_BITS, CODEWORD_MASK, ENCODED_BLOCK_LEN, SYMBOLS_PER_BLOCK, WINDOW_BITS,
};

/// Mask covering the low 112 bits of a `u128`.
pub const WINDOW_MASK: u128 = (1 << WINDOW_BITS) - 1;

/// Bytes of a big-endian `u128` that sit above the window.
const UNUSED_BYTES: usize = 16 - ENCODED_BLOCK_LEN;

/// Bit offset of codeword `index` from the low end of the window.
#[inline]
const fn offset(index: usize) -> u32 {
    (SYMBOLS_PER_BLOCK - 1 - index) as u32 * CODEWORD_BITS
}

/// Eight packed 14-bit codewords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct BlockWindow(u128);

impl BlockWindow {
    /// Wraps a raw value, discarding anything above bit 111.
    pub const fn new(value: u128) -> Self {
        Self(value & WINDOW_MASK)
    }

    /// The raw 112-bit value.
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Packs 8 codewords, first codeword highest. Each is masked to 14 bits.
    pub const fn pack(codewords: &[u16; SYMBOLS_PER_BLOCK]) -> Self {
        let mut value: u128 = 0;
        let mut index = 0;
        while index < SYMBOLS_PER_BLOCK {
            value |= ((codewords[index] & CODEWORD_MASK) as u128) << offset(index);
            index += 1;
        }
        Self(value)
    }

    /// The 14-bit field for symbol `index`.
    ///
    /// # Panics
    /// If `index` is 8 or more.
    pub const fn codeword(self, index: usize) -> u16 {
        assert!(index < SYMBOLS_PER_BLOCK, "block index out of range");
        (self.0 >> offset(index)) as u16 & CODEWORD_MASK
    }

    /// All 8 fields, in symbol order.
    pub const fn codewords(self) -> [u16; SYMBOLS_PER_BLOCK] {
        let mut codewords = [0u16; SYMBOLS_PER_BLOCK];
        let mut index = 0;
        while index < SYMBOLS_PER_BLOCK {
            codewords[index] = self.codeword(index);
            index += 1;
        }
        codewords
    }

    /// Serializes the window as 14 big-endian bytes; the first byte holds bits 111..104.
    pub fn to_bytes(self) -> [u8; ENCODED_BLOCK_LEN] {
        let mut bytes = [0u8; ENCODED_BLOCK_LEN];
        bytes.copy_from_slice(&self.0.to_be_bytes()[UNUSED_BYTES..]);
        bytes
    }

    /// Parses 14 big-endian bytes.
    pub fn from_bytes(bytes: &[u8; ENCODED_BLOCK_LEN]) -> Self {
        let mut wide = [0u8; 16];
        wide[UNUSED_BYTES..].copy_from_slice(bytes);
        Self(u128::from_be_bytes(wide))
    }

    /// Builds a window from a high/low 64-bit split.
    ///
    /// `high` carries bits 127..64; only its low 48 bits land in the window.
    pub const fn from_halves(high: u64, low: u64) -> Self {
        Self::new(((high as u128) << 64) | low as u128)
    }

    /// Splits the window into high and low 64-bit words.
    pub const fn halves(self) -> (u64, u64) {
        ((self.0 >> 64) as u64, self.0 as u64)
    }
}

impl From<BlockWindow> for u128 {
    fn from(window: BlockWindow) -> Self {
        window.0
    }
}

impl From<BlockWindow> for [u8; ENCODED_BLOCK_LEN] {
    fn from(window: BlockWindow) -> Self {
        window.to_bytes()
    }
}

impl From<&[u8; ENCODED_BLOCK_LEN]> for BlockWindow {
    fn from(bytes: &[u8; ENCODED_BLOCK_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}
