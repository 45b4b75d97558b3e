//! AES inverse cipher over a pre-expanded key schedule.

use crate::block::{block_from_slice, Block, BLOCK_LEN};
use crate::key::KeySchedule;
use crate::round::{add_round_key, inv_mix_sub_shift, inv_shift_sub_bytes};
use crate::Result;

/// Decrypts one block in place with the given schedule.
///
/// Round order follows the FIPS-197 inverse cipher. The InvShiftRows,
/// InvSubBytes and InvMixColumns steps of each round are carried out by the
/// fused helpers in [`crate::round`].
fn decrypt_state(state: &mut Block, schedule: &KeySchedule) {
    let nr = schedule.rounds();

    add_round_key(state, schedule.round_key(nr));
    inv_shift_sub_bytes(state);

    for round in (0..nr).rev() {
        add_round_key(state, schedule.round_key(round));
        if round != 0 {
            inv_mix_sub_shift(state);
        }
    }
}

/// Decrypts a single 16-byte block with a pre-expanded schedule.
///
/// Returns [`crate::Error::InvalidBlockLength`] when `block` is not exactly 16 bytes.
pub fn decrypt_block(schedule: &KeySchedule, block: &[u8]) -> Result<Block> {
    let mut state = block_from_slice(block)?;
    decrypt_state(&mut state, schedule);
    Ok(state)
}

/// AES decryption bound to one key.
///
/// Holds no per-call state, so a single instance can be shared read-only
/// between threads.
#[derive(Clone, Debug)]
pub struct InverseCipher {
    schedule: KeySchedule,
}

impl InverseCipher {
    /// Expands `key` and binds the cipher to the resulting schedule.
    pub fn new(key: &[u8]) -> Result<Self> {
        KeySchedule::expand(key).map(Self::from_schedule)
    }

    /// Binds the cipher to an already expanded schedule.
    pub fn from_schedule(schedule: KeySchedule) -> Self {
        Self { schedule }
    }

    /// The schedule this cipher decrypts with.
    pub fn schedule(&self) -> &KeySchedule {
        &self.schedule
    }

    /// Decrypts one 16-byte block.
    pub fn decrypt_block(&self, block: &[u8]) -> Result<Block> {
        decrypt_block(&self.schedule, block)
    }

    /// Decrypts one block in place.
    #[inline]
    pub fn decrypt_block_in_place(&self, block: &mut Block) {
        decrypt_state(block, &self.schedule);
    }

    /// Decrypts `buf` block by block from offset 0, overwriting it in place.
    ///
    /// Blocks are independent: there is no IV and no chaining. A trailing
    /// partial block (`buf.len() % 16` bytes) is left untouched. Returns the
    /// number of blocks decrypted.
    pub fn decrypt_buffer(&self, buf: &mut [u8]) -> usize {
        let mut blocks = 0;
        for chunk in buf.chunks_exact_mut(BLOCK_LEN) {
            let mut state = [0u8; BLOCK_LEN];
            state.copy_from_slice(chunk);
            self.decrypt_block_in_place(&mut state);
            chunk.copy_from_slice(&state);
            blocks += 1;
        }
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const NIST_PLAIN: [u8; 16] = [
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    fn counting_key(len: usize) -> Vec<u8> {
        (0..len as u8).collect()
    }

    #[test]
    fn decrypt_matches_fips197_c1_aes128() {
        let schedule = KeySchedule::expand(&counting_key(16)).unwrap();
        let ct = hex::decode("69c4e0d86a7b0430d8cdb78070b4c55a").unwrap();
        assert_eq!(decrypt_block(&schedule, &ct).unwrap(), NIST_PLAIN);
    }

    #[test]
    fn decrypt_matches_fips197_c2_aes192() {
        let schedule = KeySchedule::expand(&counting_key(24)).unwrap();
        let ct = hex::decode("dda97ca4864cdfe06eaf70a0ec0d7191").unwrap();
        assert_eq!(decrypt_block(&schedule, &ct).unwrap(), NIST_PLAIN);
    }

    #[test]
    fn decrypt_matches_fips197_c3_aes256() {
        let schedule = KeySchedule::expand(&counting_key(32)).unwrap();
        let ct = hex::decode("8ea2b7ca516745bfeafc49904b496089").unwrap();
        assert_eq!(decrypt_block(&schedule, &ct).unwrap(), NIST_PLAIN);
    }

    #[test]
    fn rejects_blocks_that_are_not_16_bytes() {
        let cipher = InverseCipher::new(&counting_key(16)).unwrap();
        for len in [0usize, 15, 17] {
            let block = vec![0u8; len];
            assert_eq!(
                cipher.decrypt_block(&block),
                Err(Error::InvalidBlockLength { actual: len })
            );
        }
    }

    #[test]
    fn new_rejects_bad_key_length() {
        assert_eq!(
            InverseCipher::new(&[0u8; 20]).unwrap_err(),
            Error::InvalidKeyLength { actual: 20 }
        );
    }

    #[test]
    fn decrypt_block_has_no_hidden_state() {
        let cipher = InverseCipher::new(&counting_key(24)).unwrap();
        let block = [0x42u8; 16];
        let first = cipher.decrypt_block(&block).unwrap();
        let _ = cipher.decrypt_block(&[0x99u8; 16]).unwrap();
        assert_eq!(cipher.decrypt_block(&block).unwrap(), first);
    }

    #[test]
    fn buffer_with_tail_keeps_trailing_byte() {
        let cipher = InverseCipher::new(&counting_key(16)).unwrap();
        let mut buf = hex::decode("69c4e0d86a7b0430d8cdb78070b4c55a").unwrap();
        buf.push(0xa5);
        assert_eq!(cipher.decrypt_buffer(&mut buf), 1);
        assert_eq!(&buf[..16], &NIST_PLAIN);
        assert_eq!(buf[16], 0xa5);
    }

    #[test]
    fn short_buffer_is_left_alone() {
        let cipher = InverseCipher::new(&counting_key(32)).unwrap();
        let mut buf = vec![1u8, 2, 3, 4, 5];
        assert_eq!(cipher.decrypt_buffer(&mut buf), 0);
        assert_eq!(buf, vec![1u8, 2, 3, 4, 5]);
        assert_eq!(cipher.decrypt_buffer(&mut []), 0);
    }

    #[test]
    fn cipher_keeps_working_after_source_schedule_is_dropped() {
        let schedule = KeySchedule::expand(&counting_key(32)).unwrap();
        let cipher = InverseCipher::from_schedule(schedule.clone());
        drop(schedule);
        let ct = hex::decode("8ea2b7ca516745bfeafc49904b496089").unwrap();
        assert_eq!(cipher.decrypt_block(&ct).unwrap(), NIST_PLAIN);

        let copy = cipher.clone();
        drop(cipher);
        assert_eq!(copy.decrypt_block(&ct).unwrap(), NIST_PLAIN);
    }

    #[test]
    fn cipher_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InverseCipher>();
        assert_send_sync::<KeySchedule>();
    }
}
