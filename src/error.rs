//! Error types for wire decoding.
//!
//! All errors implement the `std::error::Error` trait and carry structured
//! context about where in the byte stream decoding went wrong.
//!
//! ## Error Categories
//!
//! - **Bounds Errors**: a read exceeded the cursor's current limit, which
//!   signals truncated or misaligned input
//! - **Varint Errors**: a varint ran past the maximum encoded length,
//!   which signals corrupt input and guards against runaway loops
//! - **Wire Type Errors**: a tag declared a wire type the encoding does
//!   not define
//! - **Decompression Errors**: a compressed payload could not be inflated
//!
//! None of these errors escape the top-level [`decode`] entry point: a
//! frame that fails to decode produces zero events and the error is
//! logged. The taxonomy exists so interior decode layers can distinguish
//! corruption from truncation in logs and tests.
//!
//! [`decode`]: crate::WebcastDecoder::decode

use thiserror::Error;

/// Result type alias for decode operations.
pub type Result<T, E = WireError> = std::result::Result<T, E>;

/// Main error type for wire decoding.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WireError {
    #[error("read of {requested} byte(s) at offset {offset} exceeds limit {limit}")]
    Bounds { offset: usize, requested: usize, limit: usize },

    #[error("varint did not terminate within {max_bytes} bytes")]
    MalformedVarint { max_bytes: usize },

    #[error("invalid wire type {value}")]
    InvalidWireType { value: u8 },

    #[error("gzip payload could not be inflated")]
    Decompression {
        #[source]
        source: std::io::Error,
    },
}

impl WireError {
    /// Helper constructor for bounds violations.
    pub fn bounds(offset: usize, requested: usize, limit: usize) -> Self {
        WireError::Bounds { offset, requested, limit }
    }

    /// Helper constructor for decompression failures.
    pub fn decompression(source: std::io::Error) -> Self {
        WireError::Decompression { source }
    }

    /// Returns whether this error indicates structurally corrupt input
    /// (as opposed to an inflate failure on an otherwise intact frame).
    pub fn is_corrupt_input(&self) -> bool {
        match self {
            WireError::Bounds { .. } => true,
            WireError::MalformedVarint { .. } => true,
            WireError::InvalidWireType { .. } => true,
            WireError::Decompression { .. } => false,
        }
    }
}
