// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::layout::Category;
use std::fmt::Display;

/// Errors raised while laying out or packing a data texture.
///
/// All of these are caller invariant violations.  They are reported instead of panicking so the
/// layer that owns the inputs can decide how loud to be, but none of them is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A category that needs at least one record was given none, so the texture would have
    /// zero rows.
    ZeroHeight { category: Category },
    /// Per-object input columns disagree in length.
    LengthMismatch {
        category: Category,
        expected: usize,
        actual: usize,
    },
    /// A flat input isn't a whole number of records.
    RaggedInput {
        category: Category,
        len: usize,
        stride: usize,
    },
    /// A record index past the end of a retained texture.
    OutOfBounds { index: usize, count: usize },
    /// The layout needs more rows than a texture can address.
    TooLarge { category: Category, height: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroHeight { category } => {
                write!(f, "{category} texture height == 0")
            }
            Error::LengthMismatch {
                category,
                expected,
                actual,
            } => write!(
                f,
                "{category} inputs disagree in length: expected {expected}, got {actual}"
            ),
            Error::RaggedInput {
                category,
                len,
                stride,
            } => write!(
                f,
                "{category} input of length {len} is not a multiple of {stride}"
            ),
            Error::OutOfBounds { index, count } => {
                write!(f, "record {index} out of bounds for {count} records")
            }
            Error::TooLarge { category, height } => {
                write!(f, "{category} texture height {height} is too large")
            }
        }
    }
}
