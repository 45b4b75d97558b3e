//! Table-driven AES inverse cipher for AES-128, AES-192 and AES-256.
//!
//! This crate provides:
//! - Key expansion for 16, 24 and 32-byte keys ([`KeySchedule`]).
//! - Single-block decryption with fused inverse round steps ([`InverseCipher`]).
//! - In-place decryption of a buffer as independent blocks, leaving a partial
//!   tail untouched.
//!
//! There is no encryption, padding removal, chaining or authentication. The
//! lookup tables are not constant-time; the implementation should not be
//! treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
mod key;
mod round;
mod tables;

pub use crate::block::{Block, BLOCK_LEN};
pub use crate::cipher::{decrypt_block, InverseCipher};
pub use crate::error::{Error, Result};
pub use crate::key::KeySchedule;
