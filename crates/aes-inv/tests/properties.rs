//! Property tests for the block-stream behaviour.

use aes_inv::InverseCipher;
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 16),
        prop::collection::vec(any::<u8>(), 24),
        prop::collection::vec(any::<u8>(), 32),
    ]
}

proptest! {
    #[test]
    fn blocks_decrypt_independently(
        key in key_strategy(),
        first in any::<[u8; 16]>(),
        second in any::<[u8; 16]>(),
    ) {
        let cipher = InverseCipher::new(&key).unwrap();

        let mut joined = first.to_vec();
        joined.extend_from_slice(&second);
        prop_assert_eq!(cipher.decrypt_buffer(&mut joined), 2);

        let mut expected = cipher.decrypt_block(&first).unwrap().to_vec();
        expected.extend_from_slice(&cipher.decrypt_block(&second).unwrap());
        prop_assert_eq!(joined, expected);
    }

    #[test]
    fn partial_tail_passes_through(
        key in key_strategy(),
        data in prop::collection::vec(any::<u8>(), 0..=200),
    ) {
        let cipher = InverseCipher::new(&key).unwrap();
        let whole = data.len() / 16 * 16;

        let mut buf = data.clone();
        prop_assert_eq!(cipher.decrypt_buffer(&mut buf), data.len() / 16);
        prop_assert_eq!(&buf[whole..], &data[whole..]);
    }

    #[test]
    fn schedule_is_deterministic(key in key_strategy()) {
        let a = InverseCipher::new(&key).unwrap();
        let b = InverseCipher::new(&key).unwrap();
        prop_assert_eq!(a.schedule(), b.schedule());
        prop_assert_eq!(&a.schedule().as_bytes()[..key.len()], key.as_slice());
    }
}
