//! Inverse round transformations.
//!
//! The state is column-major: byte `4 * c + r` sits at row `r`, column `c`.
//! Two of the helpers fuse several FIPS-197 steps into a single table pass.
//! InvShiftRows moves bytes between positions and InvSubBytes maps each byte
//! on its own, so the two commute and can share one pass.

use crate::block::{xor_in_place, Block};
use crate::tables::{INV_SBOX, MUL_9, MUL_B, MUL_D, MUL_E};

/// Source position for every destination byte under InvShiftRows.
///
/// Row `r` is rotated right by `r` columns, so destination `(r, c)` reads
/// from `(r, c - r mod 4)`.
const INV_SHIFT_SRC: [usize; 16] = [0, 13, 10, 7, 4, 1, 14, 11, 8, 5, 2, 15, 12, 9, 6, 3];

/// AddRoundKey: XORs a round key into the state.
#[inline]
pub(crate) fn add_round_key(state: &mut Block, round_key: &Block) {
    xor_in_place(state, round_key);
}

/// InvShiftRows followed by InvSubBytes, in one pass.
#[inline]
pub(crate) fn inv_shift_sub_bytes(state: &mut Block) {
    let src = *state;
    for (dst, &from) in state.iter_mut().zip(INV_SHIFT_SRC.iter()) {
        *dst = INV_SBOX[src[from] as usize];
    }
}

/// InvMixColumns, then InvSubBytes and InvShiftRows, in one pass.
///
/// Each column is mixed with the `{0e, 0b, 0d, 09}` circulant through the
/// multiplication tables. The mixed byte for row `r` of column `c` is passed
/// through the inverse S-box and written to column `c + r mod 4`, which is
/// where InvShiftRows would have moved it.
#[inline]
pub(crate) fn inv_mix_sub_shift(state: &mut Block) {
    let src = *state;
    for col in 0..4 {
        let base = col * 4;
        let a0 = src[base] as usize;
        let a1 = src[base + 1] as usize;
        let a2 = src[base + 2] as usize;
        let a3 = src[base + 3] as usize;

        let mixed = [
            MUL_E[a0] ^ MUL_B[a1] ^ MUL_D[a2] ^ MUL_9[a3],
            MUL_9[a0] ^ MUL_E[a1] ^ MUL_B[a2] ^ MUL_D[a3],
            MUL_D[a0] ^ MUL_9[a1] ^ MUL_E[a2] ^ MUL_B[a3],
            MUL_B[a0] ^ MUL_D[a1] ^ MUL_9[a2] ^ MUL_E[a3],
        ];

        for (row, value) in mixed.into_iter().enumerate() {
            state[((col + row) % 4) * 4 + row] = INV_SBOX[value as usize];
        }
    }
}
