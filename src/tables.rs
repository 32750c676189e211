//! Forward and reverse EFM lookup tables.
//!
//! Eight-to-Fourteen Modulation maps every 8-bit symbol onto a 14-bit channel codeword.
//! The codewords are curated so that ones are always separated by at least two and at
//! most ten zeros, which keeps the channel's run lengths bounded for clock recovery.
//!
//! ## Symbol Table
//!
//! [`EFM_CODEWORDS`] is the single source of truth: entry `s` is the codeword for symbol
//! `s`. [`CodeTables`] pairs it with a reverse table indexed by every 14-bit value, where
//! only the 256 codewords hit by the forward table map back to a symbol. Everything else
//! is `None`.
//!
//! The standard tables are built at compile time and shared through
//! [`CodeTables::standard`]. Custom tables can be built with
//! [`CodeTables::from_codewords`] (unchecked) or [`CodeTables::try_from_codewords`]
//! (rejects out-of-range, duplicate and run-length-violating entries).

use core::fmt;

use crate::consts::{
    CODEWORD_BITS, CODEWORD_MASK, MAX_ZERO_RUN, MIN_ZERO_RUN, REVERSE_TABLE_SIZE, SYMBOL_COUNT,
};
use crate::error::{EfmError, Result};

/// The canonical EFM codeword list, ordered by data symbol.
pub const EFM_CODEWORDS: [u16; SYMBOL_COUNT] = [
    0b01001000100000, 0b10000100000000, 0b10010000100000, 0b10001000100000, // 00-03
    0b01000100000000, 0b00000100010000, 0b00010000100000, 0b00100100000000, // 04-07
    0b01001001000000, 0b10000001000000, 0b10010001000000, 0b10001001000000, // 08-0B
    0b01000001000000, 0b00000001000000, 0b00010001000000, 0b00100001000000, // 0C-0F
    0b10000000100000, 0b10000010000000, 0b10010010000000, 0b00100000100000, // 10-13
    0b01000010000000, 0b00000010000000, 0b00010010000000, 0b00100010000000, // 14-17
    0b01001000010000, 0b10000000010000, 0b10010000010000, 0b10001000010000, // 18-1B
    0b01000000010000, 0b00001000010000, 0b00010000010000, 0b00100000010000, // 1C-1F
    0b00000000100000, 0b10000100001000, 0b00001000100000, 0b00100100100000, // 20-23
    0b01000100001000, 0b00000100001000, 0b01000000100000, 0b00100100001000, // 24-27
    0b01001001001000, 0b10000001001000, 0b10010001001000, 0b10001001001000, // 28-2B
    0b01000001001000, 0b00000001001000, 0b00010001001000, 0b00100001001000, // 2C-2F
    0b00000100000000, 0b10000010001000, 0b10010010001000, 0b10000100010000, // 30-33
    0b01000010001000, 0b00000010001000, 0b00010010001000, 0b00100010001000, // 34-37
    0b01001000001000, 0b10000000001000, 0b10010000001000, 0b10001000001000, // 38-3B
    0b01000000001000, 0b00001000001000, 0b00010000001000, 0b00100000001000, // 3C-3F
    0b01001000100100, 0b10000100100100, 0b10010000100100, 0b10001000100100, // 40-43
    0b01000100100100, 0b00000000100100, 0b00010000100100, 0b00100100100100, // 44-47
    0b01001001000100, 0b10000001000100, 0b10010001000100, 0b10001001000100, // 48-4B
    0b01000001000100, 0b00000001000100, 0b00010001000100, 0b00100001000100, // 4C-4F
    0b10000000100100, 0b10000010000100, 0b10010010000100, 0b00100000100100, // 50-53
    0b01000010000100, 0b00000010000100, 0b00010010000100, 0b00100010000100, // 54-57
    0b01001000000100, 0b10000000000100, 0b10010000000100, 0b10001000000100, // 58-5B
    0b01000000000100, 0b00001000000100, 0b00010000000100, 0b00100000000100, // 5C-5F
    0b01001000100010, 0b10000100100010, 0b10010000100010, 0b10001000100010, // 60-63
    0b01000100100010, 0b00000000100010, 0b01000000100100, 0b00100100100010, // 64-67
    0b01001001000010, 0b10000001000010, 0b10010001000010, 0b10001001000010, // 68-6B
    0b01000001000010, 0b00000001000010, 0b00010001000010, 0b00100001000010, // 6C-6F
    0b10000000100010, 0b10000010000010, 0b10010010000010, 0b00100000100010, // 70-73
    0b01000010000010, 0b00000010000010, 0b00010010000010, 0b00100010000010, // 74-77
    0b01001000000010, 0b00001001001000, 0b10010000000010, 0b10001000000010, // 78-7B
    0b01000000000010, 0b00001000000010, 0b00010000000010, 0b00100000000010, // 7C-7F
    0b01001000100001, 0b10000100100001, 0b10010000100001, 0b10001000100001, // 80-83
    0b01000100100001, 0b00000000100001, 0b00010000100001, 0b00100100100001, // 84-87
    0b01001001000001, 0b10000001000001, 0b10010001000001, 0b10001001000001, // 88-8B
    0b01000001000001, 0b00000001000001, 0b00010001000001, 0b00100001000001, // 8C-8F
    0b10000000100001, 0b10000010000001, 0b10010010000001, 0b00100000100001, // 90-93
    0b01000010000001, 0b00000010000001, 0b00010010000001, 0b00100010000001, // 94-97
    0b01001000000001, 0b10000010010000, 0b10010000000001, 0b10001000000001, // 98-9B
    0b01000010010000, 0b00001000000001, 0b00010000000001, 0b00100010010000, // 9C-9F
    0b00001000100001, 0b10000100001001, 0b01000100010000, 0b00000100100001, // A0-A3
    0b01000100001001, 0b00000100001001, 0b01000000100001, 0b00100100001001, // A4-A7
    0b01001001001001, 0b10000001001001, 0b10010001001001, 0b10001001001001, // A8-AB
    0b01000001001001, 0b00000001001001, 0b00010001001001, 0b00100001001001, // AC-AF
    0b00000100100000, 0b10000010001001, 0b10010010001001, 0b00100100010000, // B0-B3
    0b01000010001001, 0b00000010001001, 0b00010010001001, 0b00100010001001, // B4-B7
    0b01001000001001, 0b10000000001001, 0b10010000001001, 0b10001000001001, // B8-BB
    0b01000000001001, 0b00001000001001, 0b00010000001001, 0b00100000001001, // BC-BF
    0b01000100100000, 0b10000100010001, 0b10010010010000, 0b00001000100100, // C0-C3
    0b01000100010001, 0b00000100010001, 0b00010010010000, 0b00100100010001, // C4-C7
    0b00001001000001, 0b10000100000001, 0b00001001000100, 0b00001001000000, // C8-CB
    0b01000100000001, 0b00000100000001, 0b00000010010000, 0b00100100000001, // CC-CF
    0b00000100100100, 0b10000010010001, 0b10010010010001, 0b10000100100000, // D0-D3
    0b01000010010001, 0b00000010010001, 0b00010010010001, 0b00100010010001, // D4-D7
    0b01001000010001, 0b10000000010001, 0b10010000010001, 0b10001000010001, // D8-DB
    0b01000000010001, 0b00001000010001, 0b00010000010001, 0b00100000010001, // DC-DF
    0b01000100000010, 0b00000100000010, 0b10000100010010, 0b00100100000010, // E0-E3
    0b01000100010010, 0b00000100010010, 0b01000000100010, 0b00100100010010, // E4-E7
    0b10000100000010, 0b10000100000100, 0b00001001001001, 0b00001001000010, // E8-EB
    0b01000100000100, 0b00000100000100, 0b00010000100010, 0b00100100000100, // EC-EF
    0b00000100100010, 0b10000010010010, 0b10010010010010, 0b00001000100010, // F0-F3
    0b01000010010010, 0b00000010010010, 0b00010010010010, 0b00100010010010, // F4-F7
    0b01001000010010, 0b10000000010010, 0b10010000010010, 0b10001000010010, // F8-FB
    0b01000000010010, 0b00001000010010, 0b00010000010010, 0b00100000010010, // FC-FF
];

/// Tables built from [`EFM_CODEWORDS`] at compile time.
pub static STANDARD_TABLES: CodeTables = CodeTables::from_codewords(&EFM_CODEWORDS);

/// Returns `true` if `codeword` fits in 14 bits and obeys the EFM run-length limits.
///
/// Zeros between two ones must number [`MIN_ZERO_RUN`]..=[`MAX_ZERO_RUN`], and the leading
/// and trailing zero runs may not exceed [`MAX_ZERO_RUN`]. The all-zero word fails.
///
/// ```rust
/// use efm14::tables::satisfies_run_length;
///
/// assert!(satisfies_run_length(0b01001000100000));
/// assert!(!satisfies_run_length(0b01100000100000));
/// ```
pub const fn satisfies_run_length(codeword: u16) -> bool {
    if codeword > CODEWORD_MASK {
        return false;
    }
    let mut run: u32 = 0;
    let mut seen_one = false;
    let mut bit = CODEWORD_BITS;
    while bit > 0 {
        bit -= 1;
        if (codeword >> bit) & 1 == 1 {
            if run > MAX_ZERO_RUN || (seen_one && run < MIN_ZERO_RUN) {
                return false;
            }
            seen_one = true;
            run = 0;
        } else {
            run += 1;
        }
    }
    run <= MAX_ZERO_RUN
}

/// Immutable forward (symbol to codeword) and reverse (codeword to symbol) tables.
///
/// Both tables are fixed at construction and never change afterwards, so a shared
/// reference can be used from any number of threads.
#[derive(Clone, PartialEq, Eq)]
pub struct CodeTables {
    forward: [u16; SYMBOL_COUNT],
    reverse: [Option<u8>; REVERSE_TABLE_SIZE],
}

impl CodeTables {
    /// Builds tables from a codeword list without validating it.
    ///
    /// Entries are masked to 14 bits. The reverse table starts out all `None` and is filled in
    /// ascending symbol order, so if two symbols share a codeword the higher one wins and the
    /// lower one can no longer be decoded. Use [`try_from_codewords`](Self::try_from_codewords)
    /// to reject such lists.
    pub const fn from_codewords(codewords: &[u16; SYMBOL_COUNT]) -> Self {
        let mut forward = [0u16; SYMBOL_COUNT];
        let mut reverse = [None; REVERSE_TABLE_SIZE];
        let mut symbol = 0;
        while symbol < SYMBOL_COUNT {
            let codeword = codewords[symbol] & CODEWORD_MASK;
            forward[symbol] = codeword;
            reverse[codeword as usize] = Some(symbol as u8);
            symbol += 1;
        }
        Self { forward, reverse }
    }

    /// Builds tables from a codeword list, rejecting lists that would break the codec.
    ///
    /// Symbols are checked in ascending order and the first problem found is returned:
    /// - [`EfmError::CodewordOutOfRange`] for entries wider than 14 bits
    /// - [`EfmError::RunLengthViolation`] for entries outside the EFM run-length limits
    /// - [`EfmError::DuplicateCodeword`] when an entry repeats an earlier one
    ///
    /// ```rust
    /// use efm14::tables::{CodeTables, EFM_CODEWORDS};
    /// use efm14::EfmError;
    ///
    /// let mut codewords = EFM_CODEWORDS;
    /// codewords[9] = codewords[2];
    /// assert_eq!(
    ///     CodeTables::try_from_codewords(&codewords).unwrap_err(),
    ///     EfmError::DuplicateCodeword { codeword: EFM_CODEWORDS[2], first: 2, second: 9 },
    /// );
    /// ```
    pub fn try_from_codewords(codewords: &[u16; SYMBOL_COUNT]) -> Result<Self> {
        let mut reverse = [None; REVERSE_TABLE_SIZE];
        for (symbol, &codeword) in (0..=u8::MAX).zip(codewords.iter()) {
            let rejection = if codeword > CODEWORD_MASK {
                Some(EfmError::CodewordOutOfRange { symbol, codeword })
            } else if !satisfies_run_length(codeword) {
                Some(EfmError::RunLengthViolation { symbol, codeword })
            } else if let Some(first) = reverse[codeword as usize] {
                Some(EfmError::DuplicateCodeword {
                    codeword,
                    first,
                    second: symbol,
                })
            } else {
                None
            };
            if let Some(err) = rejection {
                warn!("rejecting codeword table at symbol {}", symbol);
                return Err(err);
            }
            reverse[codeword as usize] = Some(symbol);
        }
        debug!("accepted custom codeword table");
        Ok(Self {
            forward: *codewords,
            reverse,
        })
    }

    /// The compile-time tables for the canonical EFM code.
    pub fn standard() -> &'static Self {
        &STANDARD_TABLES
    }

    /// Codeword for `symbol`.
    #[inline]
    pub const fn codeword(&self, symbol: u8) -> u16 {
        self.forward[symbol as usize]
    }

    /// Symbol for `codeword`, or `None` if it is not in the forward table's image.
    ///
    /// Values wider than 14 bits are never valid.
    #[inline]
    pub const fn symbol(&self, codeword: u16) -> Option<u8> {
        if codeword > CODEWORD_MASK {
            return None;
        }
        self.reverse[codeword as usize]
    }

    /// Whether `codeword` decodes to a symbol.
    pub const fn is_valid(&self, codeword: u16) -> bool {
        self.symbol(codeword).is_some()
    }

    /// The forward table, indexed by symbol.
    pub const fn codewords(&self) -> &[u16; SYMBOL_COUNT] {
        &self.forward
    }
}

impl Default for CodeTables {
    fn default() -> Self {
        STANDARD_TABLES.clone()
    }
}

impl fmt::Debug for CodeTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 16K reverse slots are noise; the forward table determines them
        f.debug_struct("CodeTables")
            .field("forward", &self.forward)
            .finish_non_exhaustive()
    }
}
