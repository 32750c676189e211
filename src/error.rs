//! Error type returned by the EFM tables and codec.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, EfmError>;

/// Everything that can go wrong while building tables or coding a buffer.
///
/// All variants are deterministic: retrying with the same input gives the same error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum EfmError {
    /// The input is not a whole number of blocks.
    ///
    /// Raised before any processing starts.
    #[error("input length {len} is not a multiple of the {block}-byte block size")]
    InvalidLength {
        /// Length of the rejected input, in bytes.
        len: usize,
        /// Required block size: 8 for encoding, 14 for decoding.
        block: usize,
    },

    /// A 14-bit field in the input has no symbol in the reverse table.
    ///
    /// The whole decode call fails; no partial output is reported.
    #[error("invalid codeword {codeword:#06x} at symbol {index} of block {chunk}")]
    InvalidCodeword {
        /// Block number within the call, counted from zero.
        chunk: usize,
        /// Symbol position within the block, `0..8`.
        index: usize,
        /// The offending 14-bit field.
        codeword: u16,
    },

    /// The output buffer cannot hold the result.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall {
        /// Bytes the operation needs to write.
        required: usize,
        /// Bytes the caller made available.
        provided: usize,
    },

    /// A custom table entry does not fit in 14 bits.
    #[error("codeword {codeword:#x} for symbol {symbol} is wider than 14 bits")]
    CodewordOutOfRange {
        /// Symbol whose entry is out of range.
        symbol: u8,
        /// The rejected entry.
        codeword: u16,
    },

    /// Two symbols of a custom table share a codeword.
    #[error("codeword {codeword:#06x} is assigned to both symbol {first} and symbol {second}")]
    DuplicateCodeword {
        /// The shared codeword.
        codeword: u16,
        /// Lower symbol using the codeword.
        first: u8,
        /// Higher symbol using the codeword.
        second: u8,
    },

    /// A custom table entry breaks the EFM run-length limits.
    #[error("codeword {codeword:#06x} for symbol {symbol} violates the run-length limits")]
    RunLengthViolation {
        /// Symbol whose entry is rejected.
        symbol: u8,
        /// The rejected entry.
        codeword: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_length_message() {
        let err = EfmError::InvalidLength { len: 5, block: 8 };
        assert_eq!(
            err.to_string(),
            "input length 5 is not a multiple of the 8-byte block size"
        );
    }

    #[test]
    fn test_invalid_codeword_message_uses_hex() {
        let err = EfmError::InvalidCodeword {
            chunk: 1,
            index: 0,
            codeword: 0x3FFF,
        };
        assert_eq!(
            err.to_string(),
            "invalid codeword 0x3fff at symbol 0 of block 1"
        );
    }
}
