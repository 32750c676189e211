//! Block encoding and decoding over byte buffers.
//!
//! [`Efm`] turns every 8 input bytes into one 14-byte block and back. Buffers are processed
//! block by block with no state carried between blocks or between calls, and the output is
//! the in-order concatenation of the per-block results.
//!
//! ## Functions
//!
//! - [`Efm::encode_block`] / [`Efm::decode_block`]: a single 8-symbol block
//! - [`Efm::encode_into`] / [`Efm::decode_into`]: caller-provided output slice, no allocation
//! - [`Efm::encode`] / [`Efm::decode`]: owned output (`Vec` with `std`, `heapless::Vec` without)
//! - [`Efm::encode_par`] / [`Efm::decode_par`]: block-parallel variants (feature `parallel`)
//!
//! ## Limitations
//!
//! - Encode input must be a multiple of 8 bytes, decode input a multiple of 14 bytes
//! - Decoding is all-or-nothing: one invalid codeword fails the whole call
//! - Sync patterns, merging bits and framing are left to the caller

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::consts::{ENCODED_BLOCK_LEN, SYMBOLS_PER_BLOCK};
use crate::error::{EfmError, Result};
use crate::tables::CodeTables;
use crate::window::BlockWindow;

/// Encoded size of `len` input bytes, or `None` if `len` is not a multiple of 8.
pub const fn encoded_len(len: usize) -> Option<usize> {
    if len % SYMBOLS_PER_BLOCK != 0 {
        return None;
    }
    Some(len / SYMBOLS_PER_BLOCK * ENCODED_BLOCK_LEN)
}

/// Decoded size of `len` encoded bytes, or `None` if `len` is not a multiple of 14.
pub const fn decoded_len(len: usize) -> Option<usize> {
    if len % ENCODED_BLOCK_LEN != 0 {
        return None;
    }
    Some(len / ENCODED_BLOCK_LEN * SYMBOLS_PER_BLOCK)
}

fn invalid_length(len: usize, block: usize) -> EfmError {
    warn!("input length {} is not a multiple of {}", len, block);
    EfmError::InvalidLength { len, block }
}

fn check_capacity(required: usize, provided: usize) -> Result<()> {
    if provided < required {
        warn!("output buffer holds {} bytes, {} required", provided, required);
        return Err(EfmError::BufferTooSmall { required, provided });
    }
    Ok(())
}

// Callers only pass `chunks_exact` slices, so the lengths always match.
fn block<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut block = [0u8; N];
    block.copy_from_slice(chunk);
    block
}

/// An EFM codec bound to a pair of lookup tables.
///
/// The codec only holds a shared reference to immutable tables, so it is `Copy`, and one
/// instance can be used from many threads at once.
///
/// ```rust
/// use efm14::Efm;
///
/// let efm = Efm::new();
/// let encoded = efm.encode(b"12345678").unwrap();
/// assert_eq!(encoded, [130, 34, 72, 136, 68, 16, 136, 2, 32, 72, 130, 34, 18, 8]);
/// assert_eq!(efm.decode(&encoded).unwrap(), b"12345678");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Efm<'a> {
    tables: &'a CodeTables,
}

impl Efm<'static> {
    /// A codec using the standard EFM tables.
    pub fn new() -> Self {
        Self {
            tables: CodeTables::standard(),
        }
    }
}

impl Default for Efm<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Efm<'a> {
    /// A codec using custom tables.
    pub const fn with_tables(tables: &'a CodeTables) -> Self {
        Self { tables }
    }

    /// The tables this codec reads from.
    pub const fn tables(&self) -> &'a CodeTables {
        self.tables
    }

    /// Encodes one block of 8 symbols into a packed window.
    ///
    /// Never fails: every byte value has a codeword.
    pub fn encode_block(&self, symbols: &[u8; SYMBOLS_PER_BLOCK]) -> BlockWindow {
        let mut codewords = [0u16; SYMBOLS_PER_BLOCK];
        for (slot, &symbol) in codewords.iter_mut().zip(symbols) {
            *slot = self.tables.codeword(symbol);
        }
        BlockWindow::pack(&codewords)
    }

    /// Decodes one packed window into 8 symbols.
    ///
    /// Fails with [`EfmError::InvalidCodeword`] (with `chunk` 0) on the first field that is not
    /// a valid codeword.
    pub fn decode_block(&self, window: BlockWindow) -> Result<[u8; SYMBOLS_PER_BLOCK]> {
        self.decode_chunk(0, window)
    }

    fn decode_chunk(&self, chunk: usize, window: BlockWindow) -> Result<[u8; SYMBOLS_PER_BLOCK]> {
        let mut symbols = [0u8; SYMBOLS_PER_BLOCK];
        for (index, (slot, codeword)) in symbols.iter_mut().zip(window.codewords()).enumerate() {
            *slot = self
                .tables
                .symbol(codeword)
                .ok_or(EfmError::InvalidCodeword {
                    chunk,
                    index,
                    codeword,
                })?;
        }
        Ok(symbols)
    }

    /// Encodes `input` into the front of `output`.
    ///
    /// # Returns
    /// The number of bytes written, always `input.len() / 8 * 14`.
    ///
    /// # Errors
    /// - [`EfmError::InvalidLength`] if `input.len()` is not a multiple of 8
    /// - [`EfmError::BufferTooSmall`] if `output` is shorter than the encoded size
    ///
    /// Both are checked before anything is written.
    pub fn encode_into(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let required = encoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), SYMBOLS_PER_BLOCK))?;
        check_capacity(required, output.len())?;
        trace!("encoding {} bytes into {} bytes", input.len(), required);

        for (chunk, out) in input
            .chunks_exact(SYMBOLS_PER_BLOCK)
            .zip(output.chunks_exact_mut(ENCODED_BLOCK_LEN))
        {
            out.copy_from_slice(&self.encode_block(&block(chunk)).to_bytes());
        }
        Ok(required)
    }

    /// Decodes `input` into the front of `output`.
    ///
    /// # Returns
    /// The number of bytes written, always `input.len() / 14 * 8`.
    ///
    /// # Errors
    /// - [`EfmError::InvalidLength`] if `input.len()` is not a multiple of 14
    /// - [`EfmError::BufferTooSmall`] if `output` is shorter than the decoded size
    /// - [`EfmError::InvalidCodeword`] on the first field with no symbol. Whatever was
    ///   already written to `output` must be discarded.
    pub fn decode_into(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let required = decoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), ENCODED_BLOCK_LEN))?;
        check_capacity(required, output.len())?;
        trace!("decoding {} bytes into {} bytes", input.len(), required);

        for (chunk, (bytes, out)) in input
            .chunks_exact(ENCODED_BLOCK_LEN)
            .zip(output.chunks_exact_mut(SYMBOLS_PER_BLOCK))
            .enumerate()
        {
            let window = BlockWindow::from_bytes(&block(bytes));
            let symbols = self.decode_chunk(chunk, window).inspect_err(|_| {
                warn!("invalid codeword in block {}", chunk);
            })?;
            out.copy_from_slice(&symbols);
        }
        Ok(required)
    }

    /// Encodes `input` into a new vector of exactly `input.len() / 8 * 14` bytes.
    ///
    /// # Errors
    /// [`EfmError::InvalidLength`] if `input.len()` is not a multiple of 8.
    #[cfg(feature = "std")]
    pub fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let required = encoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), SYMBOLS_PER_BLOCK))?;
        let mut output = vec![0u8; required];
        let written = self.encode_into(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }

    /// Decodes `input` into a new vector of exactly `input.len() / 14 * 8` bytes.
    ///
    /// # Errors
    /// - [`EfmError::InvalidLength`] if `input.len()` is not a multiple of 14
    /// - [`EfmError::InvalidCodeword`] if any field is not a codeword; nothing is returned
    #[cfg(feature = "std")]
    pub fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let required = decoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), ENCODED_BLOCK_LEN))?;
        let mut output = vec![0u8; required];
        let written = self.decode_into(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }

    /// Encodes `input` into a fixed-capacity vector.
    ///
    /// # Errors
    /// - [`EfmError::InvalidLength`] if `input.len()` is not a multiple of 8
    /// - [`EfmError::BufferTooSmall`] if `N` is smaller than the encoded size
    #[cfg(not(feature = "std"))]
    pub fn encode<const N: usize>(&self, input: &[u8]) -> Result<heapless::Vec<u8, N>> {
        let required = encoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), SYMBOLS_PER_BLOCK))?;
        let mut output = sized_vec::<N>(required)?;
        let written = self.encode_into(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }

    /// Decodes `input` into a fixed-capacity vector.
    ///
    /// # Errors
    /// - [`EfmError::InvalidLength`] if `input.len()` is not a multiple of 14
    /// - [`EfmError::BufferTooSmall`] if `N` is smaller than the decoded size
    /// - [`EfmError::InvalidCodeword`] if any field is not a codeword; nothing is returned
    #[cfg(not(feature = "std"))]
    pub fn decode<const N: usize>(&self, input: &[u8]) -> Result<heapless::Vec<u8, N>> {
        let required = decoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), ENCODED_BLOCK_LEN))?;
        let mut output = sized_vec::<N>(required)?;
        let written = self.decode_into(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }

    /// Like [`encode`](Self::encode), with blocks spread across the rayon thread pool.
    ///
    /// The output is byte-for-byte identical to the sequential path.
    #[cfg(feature = "parallel")]
    pub fn encode_par(&self, input: &[u8]) -> Result<Vec<u8>> {
        let required = encoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), SYMBOLS_PER_BLOCK))?;
        trace!("encoding {} bytes into {} bytes in parallel", input.len(), required);
        let mut output = vec![0u8; required];
        output
            .par_chunks_exact_mut(ENCODED_BLOCK_LEN)
            .zip(input.par_chunks_exact(SYMBOLS_PER_BLOCK))
            .for_each(|(out, chunk)| {
                out.copy_from_slice(&self.encode_block(&block(chunk)).to_bytes());
            });
        Ok(output)
    }

    /// Like [`decode`](Self::decode), with blocks spread across the rayon thread pool.
    ///
    /// When several blocks are invalid, the error names the lowest-numbered one, matching
    /// the sequential path.
    #[cfg(feature = "parallel")]
    pub fn decode_par(&self, input: &[u8]) -> Result<Vec<u8>> {
        let required = decoded_len(input.len())
            .ok_or_else(|| invalid_length(input.len(), ENCODED_BLOCK_LEN))?;
        trace!("decoding {} bytes into {} bytes in parallel", input.len(), required);
        let mut output = vec![0u8; required];
        let failure = output
            .par_chunks_exact_mut(SYMBOLS_PER_BLOCK)
            .zip(input.par_chunks_exact(ENCODED_BLOCK_LEN))
            .enumerate()
            .filter_map(|(chunk, (out, bytes))| {
                match self.decode_chunk(chunk, BlockWindow::from_bytes(&block(bytes))) {
                    Ok(symbols) => {
                        out.copy_from_slice(&symbols);
                        None
                    }
                    Err(err) => Some((chunk, err)),
                }
            })
            .min_by_key(|&(chunk, _)| chunk);
        if let Some((chunk, err)) = failure {
            warn!("invalid codeword in block {}", chunk);
            return Err(err);
        }
        Ok(output)
    }
}

#[cfg(not(feature = "std"))]
fn sized_vec<const N: usize>(len: usize) -> Result<heapless::Vec<u8, N>> {
    check_capacity(len, N)?;
    let mut output = heapless::Vec::new();
    output
        .resize_default(len)
        .map_err(|()| EfmError::BufferTooSmall {
            required: len,
            provided: N,
        })?;
    Ok(output)
}

/// Encodes `input` with the standard tables.
///
/// ```rust
/// let encoded = efm14::encode(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]).unwrap();
/// assert_eq!(encoded, [132, 0, 146, 0, 9, 9, 34, 129, 6, 36, 144, 64, 73, 4]);
/// ```
#[cfg(feature = "std")]
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    Efm::new().encode(input)
}

/// Decodes `input` with the standard tables.
///
/// ```rust
/// use efm14::EfmError;
///
/// assert!(matches!(
///     efm14::decode(&[0xFF; 14]),
///     Err(EfmError::InvalidCodeword { chunk: 0, index: 0, codeword: 0x3FFF })
/// ));
/// ```
#[cfg(feature = "std")]
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    Efm::new().decode(input)
}

/// Encodes `input` with the standard tables into a fixed-capacity vector.
#[cfg(not(feature = "std"))]
pub fn encode<const N: usize>(input: &[u8]) -> Result<heapless::Vec<u8, N>> {
    Efm::new().encode::<N>(input)
}

/// Decodes `input` with the standard tables into a fixed-capacity vector.
#[cfg(not(feature = "std"))]
pub fn decode<const N: usize>(input: &[u8]) -> Result<heapless::Vec<u8, N>> {
    Efm::new().decode::<N>(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SYMBOL_COUNT;
    use crate::tables::EFM_CODEWORDS;

    const SCENARIO_A: [u8; 8] = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF];
    const SCENARIO_A_ENCODED: [u8; 14] = [132, 0, 146, 0, 9, 9, 34, 129, 6, 36, 144, 64, 73, 4];

    #[test]
    fn test_encode_block_matches_canonical_window() {
        let efm = Efm::new();
        assert_eq!(
            efm.encode_block(&SCENARIO_A).halves(),
            (145137984342281, 2486275223393945860)
        );
        assert_eq!(
            efm.encode_block(&[0xFF; 8]).halves(),
            (35495776224392, 1306123611396147218)
        );
        assert_eq!(
            efm.encode_block(&[0x00; 8]).halves(),
            (79719458703378, 2326251190641758752)
        );
    }

    #[test]
    fn test_decode_block_matches_canonical_window() {
        let efm = Efm::new();
        let window = BlockWindow::from_halves(145137984342281, 2486275223393945860);
        assert_eq!(efm.decode_block(window), Ok(SCENARIO_A));
    }

    #[test]
    fn test_decode_block_rejects_zero_window() {
        let efm = Efm::new();
        assert_eq!(
            efm.decode_block(BlockWindow::default()),
            Err(EfmError::InvalidCodeword {
                chunk: 0,
                index: 0,
                codeword: 0,
            })
        );
    }

    #[test]
    fn test_decode_block_reports_bad_field_position() {
        let efm = Efm::new();
        let mut codewords = efm.encode_block(&SCENARIO_A).codewords();
        codewords[6] = 0x0001;
        assert_eq!(
            efm.decode_block(BlockWindow::pack(&codewords)),
            Err(EfmError::InvalidCodeword {
                chunk: 0,
                index: 6,
                codeword: 0x0001,
            })
        );
    }

    #[test]
    fn test_scenario_a_round_trip() {
        let efm = Efm::new();
        let encoded = efm.encode(&SCENARIO_A).unwrap();
        assert_eq!(encoded, SCENARIO_A_ENCODED);
        assert_eq!(efm.decode(&encoded).unwrap(), SCENARIO_A);
    }

    #[test]
    fn test_scenario_b_all_ones_is_invalid() {
        assert_eq!(
            Efm::new().decode(&[0xFF; 14]),
            Err(EfmError::InvalidCodeword {
                chunk: 0,
                index: 0,
                codeword: 0x3FFF,
            })
        );
    }

    #[test]
    fn test_scenario_c_empty_input() {
        let efm = Efm::new();
        assert_eq!(efm.encode(&[]), Ok(Vec::new()));
        assert_eq!(efm.decode(&[]), Ok(Vec::new()));
        assert_eq!(efm.encode_into(&[], &mut []), Ok(0));
        assert_eq!(efm.decode_into(&[], &mut []), Ok(0));
    }

    #[test]
    fn test_scenario_d_multi_block() {
        let efm = Efm::new();
        let input = b"1234567890ABCDEF1234567890ABCDEF";
        let encoded = efm.encode(input).unwrap();
        assert_eq!(encoded.len(), 56);
        assert_eq!(encoded[..14], encoded[28..42]);
        assert_eq!(encoded[14..28], encoded[42..]);
        assert_eq!(efm.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_known_ascii_vector() {
        let encoded = [130, 34, 72, 136, 68, 16, 136, 2, 32, 72, 130, 34, 18, 8];
        assert_eq!(encode(b"12345678").unwrap(), encoded);
        assert_eq!(decode(&encoded).unwrap(), b"12345678");
    }

    #[test]
    fn test_round_trip_every_symbol() {
        let efm = Efm::new();
        let input: Vec<u8> = (0..=u8::MAX).collect();
        let encoded = efm.encode(&input).unwrap();
        assert_eq!(encoded.len(), SYMBOL_COUNT / 8 * 14);
        assert_eq!(efm.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_encode_rejects_partial_block() {
        let efm = Efm::new();
        assert_eq!(
            efm.encode(b"12345"),
            Err(EfmError::InvalidLength { len: 5, block: 8 })
        );
        assert_eq!(
            efm.encode(&[0u8; 15]),
            Err(EfmError::InvalidLength { len: 15, block: 8 })
        );
    }

    #[test]
    fn test_decode_rejects_partial_block() {
        let efm = Efm::new();
        assert_eq!(
            efm.decode(&[0x01, 0x23, 0x45]),
            Err(EfmError::InvalidLength { len: 3, block: 14 })
        );
        assert_eq!(
            efm.decode(&[0u8; 16]),
            Err(EfmError::InvalidLength { len: 16, block: 14 })
        );
    }

    #[test]
    fn test_decode_discards_earlier_blocks_on_failure() {
        let efm = Efm::new();
        let mut input = efm.encode(b"12345678").unwrap();
        input.extend_from_slice(&[0xFF; 14]);
        assert_eq!(
            efm.decode(&input),
            Err(EfmError::InvalidCodeword {
                chunk: 1,
                index: 0,
                codeword: 0x3FFF,
            })
        );
    }

    #[test]
    fn test_decode_rejects_unencoded_bytes() {
        let input: Vec<u8> = (0..14).chain(0..14).collect();
        assert_eq!(
            Efm::new().decode(&input),
            Err(EfmError::InvalidCodeword {
                chunk: 0,
                index: 0,
                codeword: 0,
            })
        );
    }

    #[test]
    fn test_encode_into_checks_capacity_before_writing() {
        let efm = Efm::new();
        let mut output = [0xAAu8; 13];
        assert_eq!(
            efm.encode_into(&SCENARIO_A, &mut output),
            Err(EfmError::BufferTooSmall {
                required: 14,
                provided: 13,
            })
        );
        assert_eq!(output, [0xAA; 13]);
    }

    #[test]
    fn test_length_is_checked_before_capacity() {
        let efm = Efm::new();
        assert_eq!(
            efm.decode_into(&[0u8; 13], &mut []),
            Err(EfmError::InvalidLength { len: 13, block: 14 })
        );
    }

    #[test]
    fn test_into_leaves_tail_of_larger_buffer() {
        let efm = Efm::new();
        let mut output = [0u8; 20];
        assert_eq!(efm.encode_into(&SCENARIO_A, &mut output), Ok(14));
        assert_eq!(output[..14], SCENARIO_A_ENCODED);
        assert_eq!(output[14..], [0u8; 6]);

        let mut decoded = [0u8; 8];
        assert_eq!(efm.decode_into(&output[..14], &mut decoded), Ok(8));
        assert_eq!(decoded, SCENARIO_A);
    }

    #[test]
    fn test_encoded_and_decoded_len() {
        assert_eq!(encoded_len(0), Some(0));
        assert_eq!(encoded_len(32), Some(56));
        assert_eq!(encoded_len(7), None);
        assert_eq!(decoded_len(0), Some(0));
        assert_eq!(decoded_len(56), Some(32));
        assert_eq!(decoded_len(15), None);
    }

    #[test]
    fn test_custom_tables() {
        let mut codewords = EFM_CODEWORDS;
        codewords.swap(0x31, 0x32);
        let tables = CodeTables::try_from_codewords(&codewords).unwrap();
        let custom = Efm::with_tables(&tables);
        let standard = Efm::new();

        let input = b"12121212";
        let encoded = custom.encode(input).unwrap();
        assert_eq!(encoded, standard.encode(b"21212121").unwrap());
        assert_eq!(custom.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_codec_is_shareable_across_threads() {
        let efm = Efm::new();
        std::thread::scope(|scope| {
            for fill in [0x00u8, 0x5A, 0xFF] {
                let _ = scope.spawn(move || {
                    let input = [fill; 64];
                    let encoded = efm.encode(&input).unwrap();
                    assert_eq!(efm.decode(&encoded).unwrap(), input);
                });
            }
        });
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let efm = Efm::new();
        let input: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 256) as u8).collect();
        let encoded = efm.encode(&input).unwrap();
        assert_eq!(efm.encode_par(&input).unwrap(), encoded);
        assert_eq!(efm.decode_par(&encoded).unwrap(), input);
        assert_eq!(
            efm.encode_par(&input[..9]),
            Err(EfmError::InvalidLength { len: 9, block: 8 })
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_reports_lowest_bad_block() {
        let efm = Efm::new();
        let mut encoded = efm.encode(&[0x42; 800]).unwrap();
        encoded[70 * 14..71 * 14].copy_from_slice(&[0xFF; 14]);
        encoded[3 * 14..4 * 14].copy_from_slice(&[0u8; 14]);
        assert_eq!(
            efm.decode_par(&encoded),
            Err(EfmError::InvalidCodeword {
                chunk: 3,
                index: 0,
                codeword: 0,
            })
        );
        assert_eq!(efm.decode_par(&encoded), efm.decode(&encoded));
    }
}
