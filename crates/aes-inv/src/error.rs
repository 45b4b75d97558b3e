//! Error type for schedule construction and block decryption.

use thiserror::Error;

/// Errors raised by the inverse cipher.
///
/// Both variants are caller mistakes. Nothing is retried or recovered inside the crate.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The key is not 16, 24 or 32 bytes long.
    #[error("invalid AES key length: expected 16, 24 or 32 bytes, got {actual}")]
    InvalidKeyLength {
        /// Length that was supplied.
        actual: usize,
    },
    /// A block handed to the cipher is not exactly 16 bytes long.
    #[error("invalid AES block length: expected 16 bytes, got {actual}")]
    InvalidBlockLength {
        /// Length that was supplied.
        actual: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
