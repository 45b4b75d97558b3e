//! Session key derivation for the asset pipeline.
//!
//! The key fed to the inverse cipher comes out of one AES-128-CBC call over
//! a fixed 16-byte blob. The call runs the primitive in its cipher direction
//! with PKCS#7 padding, and only the finalisation block is kept. That block
//! is rendered as lowercase hex and the 32 ASCII characters themselves become
//! an AES-256 key. The hex is not decoded.

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Block};

/// Key of the unwrap step, taken from the page's session variable.
pub const UNWRAP_KEY: [u8; 16] = [
    0xc5, 0xe0, 0x4e, 0xa6, 0x9c, 0x1f, 0xae, 0x8b, 0xa4, 0x54, 0xf6, 0x86, 0xad, 0x7b, 0x1e, 0x00,
];

/// IV of the unwrap step, taken from the preloader.
pub const UNWRAP_IV: [u8; 16] = [
    0x2b, 0xbc, 0x27, 0x91, 0xdb, 0x69, 0x06, 0x13, 0x78, 0xa1, 0xef, 0x2c, 0xdf, 0x44, 0xa3, 0xfa,
];

/// Blob pushed through the unwrap step.
pub const UNWRAP_BLOB: [u8; 16] = [
    0x93, 0xb7, 0xf6, 0x0d, 0xda, 0xa6, 0x3c, 0xcc, 0xce, 0x50, 0x3b, 0x3c, 0x3d, 0x49, 0x0b, 0x76,
];

/// Inputs of the unwrap step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionParams {
    /// AES-128 key.
    pub key: [u8; 16],
    /// CBC initialization vector.
    pub iv: [u8; 16],
    /// The single block fed through the cipher.
    pub blob: [u8; 16],
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            key: UNWRAP_KEY,
            iv: UNWRAP_IV,
            blob: UNWRAP_BLOB,
        }
    }
}

impl SessionParams {
    /// Runs the unwrap step and returns the session hex string.
    pub fn session_hex(&self) -> String {
        let cipher = Aes128::new(&self.key.into());

        // CBC over the blob followed by a full PKCS#7 padding block. The
        // streamed output for the blob is discarded; the finalisation block
        // is the one that matters.
        let padding = [16u8; 16];
        let mut prev = Block::from(self.iv);
        for input in [&self.blob, &padding] {
            let mut block = Block::default();
            for (block_byte, (input_byte, prev_byte)) in
                block.iter_mut().zip(input.iter().zip(prev.iter()))
            {
                *block_byte = input_byte ^ prev_byte;
            }
            cipher.encrypt_block(&mut block);
            prev = block;
        }

        hex::encode(prev)
    }

    /// Key bytes handed to the inverse cipher: the ASCII codes of [`Self::session_hex`].
    pub fn key_material(&self) -> Vec<u8> {
        self.session_hex().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_give_known_session_hex() {
        assert_eq!(
            SessionParams::default().session_hex(),
            "45192527016767981f77ff30df698419"
        );
    }

    #[test]
    fn key_material_is_ascii_hex_not_decoded_bytes() {
        let material = SessionParams::default().key_material();
        assert_eq!(material.len(), 32);
        assert_eq!(&material[..4], b"4519");
        assert!(material.iter().all(|b| b.is_ascii_hexdigit()));
        assert!(!material.iter().any(|b| b.is_ascii_uppercase()));
    }

    #[test]
    fn session_hex_depends_on_every_input() {
        let base = SessionParams::default();
        let reference = base.session_hex();
        let mut other = base;
        other.iv[0] ^= 1;
        assert_ne!(other.session_hex(), reference);
        let mut other = base;
        other.blob[15] ^= 1;
        assert_ne!(other.session_hex(), reference);
        let mut other = base;
        other.key[7] ^= 1;
        assert_ne!(other.session_hex(), reference);
    }
}
