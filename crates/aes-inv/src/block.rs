//! Block representation helpers.

/// Size of one AES block in bytes.
pub const BLOCK_LEN: usize = 16;

/// AES block of 16 bytes, column-major state order.
pub type Block = [u8; BLOCK_LEN];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub(crate) fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Copies a slice into a block, rejecting anything that is not exactly one block long.
pub(crate) fn block_from_slice(bytes: &[u8]) -> crate::Result<Block> {
    bytes
        .try_into()
        .map_err(|_| crate::Error::InvalidBlockLength {
            actual: bytes.len(),
        })
}
