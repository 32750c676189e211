//! Constants shared by the EFM tables, the block window, and the codec.
//!
//! ## Key Concepts
//!
//! - **Symbols**: every 8-bit value is a data symbol, so the forward table has 256 entries.
//! - **Codewords**: 14-bit channel values. Only 256 of the 16384 possible values are used.
//! - **Blocks**: 8 symbols pack into one 112-bit window, serialized as 14 bytes.
//! - **Run-length limits**: every codeword keeps between 2 and 10 zeros between consecutive
//!   ones, and never starts or ends with more than 10 zeros.

/// Number of data symbols (one per byte value).
pub const SYMBOL_COUNT: usize = 256;

/// Width of a channel codeword, in bits.
pub const CODEWORD_BITS: u32 = 14;

/// Mask selecting the low 14 bits of a value.
pub const CODEWORD_MASK: u16 = 0x3FFF;

/// Number of slots in the reverse table, one per possible 14-bit value.
pub const REVERSE_TABLE_SIZE: usize = 1 << CODEWORD_BITS;

/// Symbols (input bytes) consumed per encoded block.
pub const SYMBOLS_PER_BLOCK: usize = 8;

/// Bytes produced per encoded block.
///
/// `SYMBOLS_PER_BLOCK * CODEWORD_BITS` bits packed with no padding.
pub const ENCODED_BLOCK_LEN: usize = SYMBOLS_PER_BLOCK * CODEWORD_BITS as usize / 8;

/// Width of the packed block window, in bits.
pub const WINDOW_BITS: u32 = SYMBOLS_PER_BLOCK as u32 * CODEWORD_BITS;

/// Smallest number of zeros allowed between two ones inside a codeword.
pub const MIN_ZERO_RUN: u32 = 2;

/// Largest number of consecutive zeros allowed anywhere inside a codeword.
pub const MAX_ZERO_RUN: u32 = 10;
