#![cfg(test)]

use proptest::collection::vec;
use proptest::prelude::*;

use crate::csx::{Csx512, KeyParams, CSX_MAC_SIZE};

fn arb_key() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 64)
}

fn arb_nonce() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 16)
}

fn arb_aad() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 20)
}

fn seal(key: &[u8], nonce: &[u8], aad: &[u8], message: &[u8]) -> Vec<u8> {
    let mut cipher = Csx512::new(&KeyParams::new(key, nonce), true);
    cipher.set_associated(aad);
    let mut sealed = vec![0u8; message.len() + CSX_MAC_SIZE];
    assert!(cipher.transform(&mut sealed, message));
    sealed
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn round_trip(
        key in arb_key(),
        nonce in arb_nonce(),
        aad in arb_aad(),
        message in vec(any::<u8>(), 1..65536),
    ) {
        let sealed = seal(&key, &nonce, &aad, &message);

        let mut cipher = Csx512::new(&KeyParams::new(&key, &nonce), false);
        cipher.set_associated(&aad);
        let mut opened = vec![0u8; message.len()];
        prop_assert!(cipher.transform(&mut opened, &sealed));
        prop_assert_eq!(message, opened);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn scalar_decrypt_matches_wide_encrypt(
        key in arb_key(),
        nonce in arb_nonce(),
        length in 2048usize..16384,
    ) {
        let message = vec![0x42u8; length];
        let sealed = seal(&key, &nonce, &[], &message);

        let mut cipher = Csx512::new(&KeyParams::new(&key, &nonce), false);
        let mut opened = vec![0u8; message.len()];
        prop_assert!(cipher.transform_scalar(&mut opened, &sealed));
        prop_assert_eq!(message, opened);
    }

    #[test]
    fn tampered_tag_rejected(
        key in arb_key(),
        nonce in arb_nonce(),
        message in vec(any::<u8>(), 1..512),
        bit in 0usize..(CSX_MAC_SIZE * 8),
    ) {
        let mut sealed = seal(&key, &nonce, &[], &message);
        let tag_start = message.len();
        sealed[tag_start + bit / 8] ^= 1 << (bit % 8);

        let mut cipher = Csx512::new(&KeyParams::new(&key, &nonce), false);
        let mut opened = vec![0u8; message.len()];
        prop_assert!(!cipher.transform(&mut opened, &sealed));
    }

    #[test]
    fn mismatched_aad_rejected(
        key in arb_key(),
        nonce in arb_nonce(),
        aad in arb_aad(),
        message in vec(any::<u8>(), 1..512),
    ) {
        let sealed = seal(&key, &nonce, &aad, &message);

        let mut wrong = aad.clone();
        wrong[0] ^= 0x01;
        let mut cipher = Csx512::new(&KeyParams::new(&key, &nonce), false);
        cipher.set_associated(&wrong);
        let mut opened = vec![0u8; message.len()];
        prop_assert!(!cipher.transform(&mut opened, &sealed));
    }

    #[test]
    fn info_tweak_changes_every_block(
        key in arb_key(),
        nonce in arb_nonce(),
        length in 1usize..=4,
    ) {
        let message = vec![0u8; length * 128];
        let mut cipher = Csx512::new(&KeyParams::with_info(&key, &nonce, b"A"), true);
        let mut sealed_a = vec![0u8; message.len() + CSX_MAC_SIZE];
        prop_assert!(cipher.transform(&mut sealed_a, &message));

        let mut cipher = Csx512::new(&KeyParams::with_info(&key, &nonce, b"B"), true);
        let mut sealed_b = vec![0u8; message.len() + CSX_MAC_SIZE];
        prop_assert!(cipher.transform(&mut sealed_b, &message));

        for block in 0..length {
            prop_assert_ne!(
                &sealed_a[block * 128..(block + 1) * 128],
                &sealed_b[block * 128..(block + 1) * 128],
            );
        }
    }
}
