//! A multi-dimensional histogram engine: dense bin storage over the
//! Cartesian product of a set of axes, with adaptive per-cell width and a
//! compact binary serialization.
//!
//! The core API is [`Histogram`], parameterized over an [`Axes`]
//! collection — either a fixed tuple of concrete axis types (rank known at
//! compile time) or `Vec<axis::AnyAxis>` (rank known only at runtime).
//! Individual axis kinds live in [`axis`]; adaptive storage lives in
//! `storage` (crate-private, since its promotion ladder is an
//! implementation detail of [`Histogram`] rather than something callers
//! observe directly).
#![cfg_attr(not(feature = "unsafe"), forbid(unsafe_code))]

pub mod axes;
pub mod axis;
pub mod cell;
pub mod histogram;
mod linearize;
pub mod serialize;
mod storage;
#[cfg(test)]
mod tests;

pub use axes::Axes;
pub use histogram::Histogram;

use std::fmt;

/// Everything that can go wrong building, filling or decoding a histogram.
///
/// Deliberately small: most axis-level problems (a value landing outside
/// every reserved bin) are not errors, they're a dropped fill, per each
/// axis's own underflow/overflow/growth convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two histograms' axes don't match, in an operation that requires
    /// them to (`add_assign`, equality of mismatched dynamic histograms).
    ShapeMismatch,
    /// An index or axis selection (e.g. `reduce_to`'s `keep` list) named
    /// something outside the histogram's current shape.
    OutOfRange,
    /// A dynamic histogram's coordinate vector didn't have exactly one
    /// entry per axis.
    ArityMismatch,
    /// The decoder found a serialized stream it couldn't parse.
    Corrupt(&'static str),
    /// The serialized stream's format version isn't one this crate knows
    /// how to decode.
    UnsupportedVersion(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch => write!(f, "histogram shapes do not match"),
            Error::OutOfRange => write!(f, "index out of range"),
            Error::ArityMismatch => write!(f, "coordinate count does not match axis count"),
            Error::Corrupt(why) => write!(f, "corrupt histogram stream: {why}"),
            Error::UnsupportedVersion(v) => write!(f, "unsupported histogram format version {v}"),
        }
    }
}

impl std::error::Error for Error {}
