//! Key schedule for AES-128, AES-192 and AES-256.

use core::fmt;

use log::debug;
use zeroize::Zeroize;

use crate::block::{Block, BLOCK_LEN};
use crate::tables::{RCON, SBOX};
use crate::{Error, Result};

/// Words per block (`Nb`).
const NB: usize = 4;

type Word = [u8; 4];

fn rot_word(word: Word) -> Word {
    [word[1], word[2], word[3], word[0]]
}

fn sub_word(word: Word) -> Word {
    word.map(|b| SBOX[b as usize])
}

fn xor_word(lhs: Word, rhs: Word) -> Word {
    [lhs[0] ^ rhs[0], lhs[1] ^ rhs[1], lhs[2] ^ rhs[2], lhs[3] ^ rhs[3]]
}

/// Expanded round keys for any supported key length.
///
/// Holds `Nr + 1` round keys back to back. The first `key_len()` bytes are the
/// original key. The buffer is wiped when the schedule is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct KeySchedule {
    bytes: Vec<u8>,
    nk: usize,
    nr: usize,
}

impl KeySchedule {
    /// Expands `key` into `Nr + 1` round keys.
    ///
    /// `key` must be 16, 24 or 32 bytes long, giving 10, 12 or 14 rounds.
    pub fn expand(key: &[u8]) -> Result<Self> {
        let nk = match key.len() {
            16 | 24 | 32 => key.len() / 4,
            actual => return Err(Error::InvalidKeyLength { actual }),
        };
        let nr = nk + 6;
        let total_words = NB * (nr + 1);

        let mut bytes = vec![0u8; total_words * 4];
        bytes[..key.len()].copy_from_slice(key);

        for idx in nk..total_words {
            let mut temp = word_at(&bytes, idx - 1);
            if idx % nk == 0 {
                temp = sub_word(rot_word(temp));
                temp[0] ^= RCON[idx / nk];
            } else if nk > 6 && idx % nk == 4 {
                temp = sub_word(temp);
            }
            let word = xor_word(word_at(&bytes, idx - nk), temp);
            bytes[4 * idx..4 * idx + 4].copy_from_slice(&word);
        }

        debug!("expanded {}-bit AES key into {} rounds", key.len() * 8, nr);
        Ok(Self { bytes, nk, nr })
    }

    /// Number of rounds (`Nr`).
    #[inline]
    pub fn rounds(&self) -> usize {
        self.nr
    }

    /// Length in bytes of the key this schedule was expanded from.
    #[inline]
    pub fn key_len(&self) -> usize {
        self.nk * 4
    }

    /// Returns the round key at the requested index (`0..=rounds()`).
    ///
    /// # Panics
    ///
    /// Panics if `round > rounds()`.
    #[inline]
    pub fn round_key(&self, round: usize) -> &Block {
        let start = round * BLOCK_LEN;
        self.bytes[start..start + BLOCK_LEN]
            .try_into()
            .expect("round key slice is one block")
    }

    /// The whole schedule, `16 * (rounds() + 1)` bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for KeySchedule {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySchedule")
            .field("key_len", &self.key_len())
            .field("rounds", &self.nr)
            .finish_non_exhaustive()
    }
}

fn word_at(bytes: &[u8], idx: usize) -> Word {
    [
        bytes[4 * idx],
        bytes[4 * idx + 1],
        bytes[4 * idx + 2],
        bytes[4 * idx + 3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).expect("valid hex")
    }

    #[test]
    fn aes128_schedule_matches_fips197_appendix_a1() {
        let key = unhex("2b7e151628aed2a6abf7158809cf4f3c");
        let ks = KeySchedule::expand(&key).unwrap();
        assert_eq!(ks.rounds(), 10);
        assert_eq!(ks.as_bytes().len(), 176);
        assert_eq!(&ks.as_bytes()[..16], key.as_slice());
        assert_eq!(
            ks.round_key(1).as_slice(),
            unhex("a0fafe1788542cb123a339392a6c7605").as_slice()
        );
        assert_eq!(
            ks.round_key(10).as_slice(),
            unhex("d014f9a8c9ee2589e13f0cc8b6630ca6").as_slice()
        );
    }

    #[test]
    fn aes192_schedule_matches_fips197_appendix_a2() {
        let key = unhex("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b");
        let ks = KeySchedule::expand(&key).unwrap();
        assert_eq!(ks.rounds(), 12);
        assert_eq!(ks.key_len(), 24);
        assert_eq!(ks.as_bytes().len(), 208);
        // w[6..8] and the final word w[51].
        assert_eq!(&ks.as_bytes()[24..32], unhex("fe0c91f72402f5a5").as_slice());
        assert_eq!(&ks.as_bytes()[204..208], unhex("01002202").as_slice());
    }

    #[test]
    fn aes256_schedule_matches_fips197_appendix_a3() {
        let key = unhex("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
        let ks = KeySchedule::expand(&key).unwrap();
        assert_eq!(ks.rounds(), 14);
        assert_eq!(ks.as_bytes().len(), 240);
        // w[8], then w[12] which takes the extra SubWord step.
        assert_eq!(&ks.as_bytes()[32..36], unhex("9ba35411").as_slice());
        assert_eq!(&ks.as_bytes()[48..52], unhex("a8b09c1a").as_slice());
        assert_eq!(
            ks.round_key(14).as_slice(),
            unhex("fe4890d1e6188d0b046df344706c631e").as_slice()
        );
    }

    #[test]
    fn rejects_unsupported_key_lengths() {
        for len in [0usize, 15, 17, 20, 33] {
            let key = vec![0u8; len];
            assert_eq!(
                KeySchedule::expand(&key),
                Err(Error::InvalidKeyLength { actual: len })
            );
        }
    }

    #[test]
    fn expansion_is_deterministic() {
        let key = [0x5au8; 32];
        let a = KeySchedule::expand(&key).unwrap();
        let b = KeySchedule::expand(&key).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn clone_outlives_dropped_original() {
        let key = unhex("2b7e151628aed2a6abf7158809cf4f3c");
        let original = KeySchedule::expand(&key).unwrap();
        let copy = original.clone();
        drop(original);
        assert_eq!(copy.rounds(), 10);
        assert_eq!(copy.as_bytes().len(), 176);
        assert_eq!(
            copy.round_key(10).as_slice(),
            unhex("d014f9a8c9ee2589e13f0cc8b6630ca6").as_slice()
        );
    }

    #[test]
    fn debug_hides_key_material() {
        let ks = KeySchedule::expand(&[0xabu8; 16]).unwrap();
        let rendered = format!("{ks:?}");
        assert!(rendered.contains("rounds: 10"));
        assert!(!rendered.contains("171"));
    }
}
