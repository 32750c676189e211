//! Logging shims.
//!
//! Forwards to `defmt` when `defmt-0-3` is enabled, to `log` when only `log` is enabled,
//! and otherwise expands to an unused `format_args!` so arguments still count as used.
//! Format strings must stick to plain `{}` placeholders to stay valid for both backends.

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::trace!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::trace!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::debug!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::debug!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::warn!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::warn!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = format_args!($($arg)*);
    }};
}
