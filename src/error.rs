//! Error handling for sampling and zero-encryption
//!
//! Provides a single `Error` type shared by every public operation so that the
//! API does not change with feature flags. Each variant names the precondition
//! that was violated.

use thiserror::Error;

use crate::context::ParmsId;

/// Error kinds raised by samplers, contexts and zero-ciphertext generators.
#[derive(Debug, Error)]
pub enum Error {
    /// The key does not belong to the requested context.
    ///
    /// Only raised while key validation is active.
    #[error("invalid key: {0}")]
    InvalidKey(&'static str),

    /// The centered binomial sampler only supports one standard deviation.
    #[error(
        "centered binomial noise requires standard deviation 3.2, got {standard_deviation}"
    )]
    UnsupportedParameter {
        /// The configured standard deviation.
        standard_deviation: f64,
    },

    /// A polynomial is too small to hold the seed marker and the seed.
    ///
    /// Zero-encryption never returns this; it downgrades to uncompressed storage.
    #[error("seed needs {required} words but the polynomial holds {available}")]
    CapacityTooSmall {
        /// Words needed for the sentinel plus the seed.
        required: usize,
        /// Words available in one polynomial.
        available: usize,
    },

    /// Degree, modulus list or noise configuration is malformed.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The parameter id is not part of the context's modulus chain.
    #[error("parms id {0:?} is not valid for this context")]
    UnknownParmsId(ParmsId),

    /// A ciphertext buffer does not match its declared shape.
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(&'static str),

    /// Encoding or decoding a serialized ciphertext failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Create an `Error::InvalidParameters` with format string support
macro_rules! params_err {
    ($($arg:tt)*) => {
        $crate::error::Error::InvalidParameters(format!($($arg)*))
    };
}

pub(crate) use params_err;
