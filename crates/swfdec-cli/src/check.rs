//! Self-check of the inverse cipher against published and reference vectors.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use aes_inv::{Block, InverseCipher};
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use rand::RngCore;

/// FIPS-197 appendix C: key size, ciphertext. Keys count up from 0x00 and
/// every plaintext is `00112233445566778899aabbccddeeff`.
const KNOWN_ANSWERS: [(usize, &str); 3] = [
    (16, "69c4e0d86a7b0430d8cdb78070b4c55a"),
    (24, "dda97ca4864cdfe06eaf70a0ec0d7191"),
    (32, "8ea2b7ca516745bfeafc49904b496089"),
];

const KNOWN_PLAINTEXT: &str = "00112233445566778899aabbccddeeff";

/// Decrypts the FIPS-197 example vectors for all three key sizes.
pub fn known_answers() -> Result<()> {
    let plaintext = hex::decode(KNOWN_PLAINTEXT)?;
    for (key_len, ciphertext_hex) in KNOWN_ANSWERS {
        let key: Vec<u8> = (0..key_len as u8).collect();
        let cipher = InverseCipher::new(&key)?;
        let ciphertext = hex::decode(ciphertext_hex)?;
        let decrypted = cipher
            .decrypt_block(&ciphertext)
            .with_context(|| format!("AES-{} known answer", key_len * 8))?;
        if decrypted[..] != plaintext[..] {
            bail!("AES-{} known answer mismatch", key_len * 8);
        }
        info!("AES-{} known answer ok", key_len * 8);
    }
    Ok(())
}

/// Encrypts random blocks under random keys with the `aes` crate and checks
/// that they decrypt back.
pub fn random_samples(rng: &mut impl RngCore, samples: usize) -> Result<()> {
    for key_len in [16usize, 24, 32] {
        for _ in 0..samples {
            let mut key = vec![0u8; key_len];
            let mut plaintext: Block = [0u8; 16];
            rng.fill_bytes(&mut key);
            rng.fill_bytes(&mut plaintext);

            let ciphertext = reference_encrypt(&key, &plaintext)?;
            let cipher = InverseCipher::new(&key)?;
            if cipher.decrypt_block(&ciphertext)? != plaintext {
                bail!(
                    "mismatch against reference AES-{} for key {}",
                    key_len * 8,
                    hex::encode(&key)
                );
            }
        }
        info!("AES-{}: {} random sample(s) ok", key_len * 8, samples);
    }
    Ok(())
}

fn reference_encrypt(key: &[u8], plaintext: &Block) -> Result<Block> {
    let mut block = GenericArray::clone_from_slice(plaintext);
    match key.len() {
        16 => Aes128::new_from_slice(key)
            .map_err(|e| anyhow!("{e}"))?
            .encrypt_block(&mut block),
        24 => Aes192::new_from_slice(key)
            .map_err(|e| anyhow!("{e}"))?
            .encrypt_block(&mut block),
        32 => Aes256::new_from_slice(key)
            .map_err(|e| anyhow!("{e}"))?
            .encrypt_block(&mut block),
        other => bail!("unsupported key length {other}"),
    }
    Ok(block.into())
}
