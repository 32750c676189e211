//! # efm14
//!
//! A portable, no_std Rust implementation of Eight-to-Fourteen Modulation (EFM), the
//! run-length-limited line code that maps each 8-bit data symbol onto a 14-bit channel
//! codeword.
//!
//! The crate is a pure, stateless block codec:
//! - every 8 data bytes become 8 codewords packed into a 112-bit window
//! - the window is serialized as 14 bytes, big-endian, with no padding
//! - decoding looks each 14-bit field up in a reverse table and rejects anything that is
//!   not one of the 256 valid codewords
//!
//! ## Crate features
//! | Feature          | Description |
//! |------------------|-------------|
//! | `std` (default)  | Owned output as `std::vec::Vec`; without it, `heapless::Vec` |
//! | `parallel`       | Block-parallel `encode_par`/`decode_par` using `rayon` (implies `std`) |
//! | `defmt-0-3`      | Uses `defmt` logging and derives `defmt::Format` |
//! | `log`            | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! use efm14::{Efm, EfmError};
//!
//! let efm = Efm::new();
//! let encoded = efm.encode(b"1234567890ABCDEF").unwrap();
//! assert_eq!(encoded.len(), 28);
//! assert_eq!(efm.decode(&encoded).unwrap(), b"1234567890ABCDEF");
//!
//! assert_eq!(efm.encode(b"12345"), Err(EfmError::InvalidLength { len: 5, block: 8 }));
//! ```
//!
//! ## Integration Notes
//!
//! - Sync patterns, merging bits, scrambling and frame layout are not handled here. Callers
//!   that store or transmit encoded data must keep the 14-byte block layout intact.
//! - The standard tables are built at compile time and never change, so a codec can be
//!   shared freely between threads.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod macros;

pub mod codec;
pub mod consts;
pub mod error;
pub mod tables;
pub mod window;

pub use codec::{Efm, decode, decoded_len, encode, encoded_len};
pub use error::{EfmError, Result};
pub use tables::CodeTables;
pub use window::BlockWindow;
