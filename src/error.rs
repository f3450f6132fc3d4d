//! Error taxonomy (spec.md §7).

use thiserror::Error;

/// Errors produced by the engine.
///
/// `InvalidInput` and `NumericDegenerate` are ordinary, expected failure
/// modes callers should handle. `Internal` only appears when the `checked`
/// feature is enabled (see `poly.h`'s `CHECKS`-gated `assert`) and indicates
/// a bug in the engine itself.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("crossing at ({x}, {y}) cannot be snapped to the grid without introducing a new crossing; retry with a finer gridsize")]
    NumericDegenerate { x: i32, y: i32 },

    #[error("internal invariant violated: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fires `assert` only in checked builds, returning `Error::Internal`
/// instead of aborting (spec.md §7 replaces `gfxpoly_fail`'s abort with a
/// recoverable error, appropriate for a library).
#[cfg(feature = "checked")]
macro_rules! invariant {
    ($cond:expr, $($msg:tt)*) => {
        if !($cond) {
            return Err($crate::error::Error::Internal(format!($($msg)*)));
        }
    };
}

#[cfg(not(feature = "checked"))]
macro_rules! invariant {
    ($cond:expr, $($msg:tt)*) => {
        let _ = || { let _ = &$cond; };
    };
}

pub(crate) use invariant;
