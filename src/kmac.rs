//! The KMAC keyed message authentication code.
//!
//! KMAC is the SP 800-185 keyed mode of the sponge: the `"KMAC"` name and
//! an optional customization string are absorbed as a bytepad header, the
//! key as a second bytepad block, and the requested tag length is
//! right-encoded into the final padded block.
//!
//! [`Kmac512`] is the variant CSX-512 authenticates with. Under the
//! `kmacr12` cargo feature it resolves to the reduced 12-round permutation
//! ([`Kmac512R12`]); the two differ only in the inner round count.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::sponge::{self, KeccakState, KMAC_DOMAIN, RATE_128, RATE_256, RATE_512};

/// KMAC-128, built on cSHAKE-128 framing.
pub type Kmac128 = Kmac<{ RATE_128 }, 24>;

/// KMAC-256, built on cSHAKE-256 framing.
pub type Kmac256 = Kmac<{ RATE_256 }, 24>;

/// KMAC-512 with the standard 24-round permutation.
#[cfg(not(feature = "kmacr12"))]
pub type Kmac512 = Kmac<{ RATE_512 }, 24>;

/// KMAC-512, reduced to the 12-round permutation by the `kmacr12` feature.
#[cfg(feature = "kmacr12")]
pub type Kmac512 = Kmac512R12;

/// The reduced-round KMAC-512 variant over Keccak-p[1600,12].
pub type Kmac512R12 = Kmac<{ RATE_512 }, 12>;

const KMAC_NAME: &[u8] = b"KMAC";

/// An incremental KMAC session at the given sponge rate and round count.
///
/// [`Self::finalize`] emits a tag without resetting the sponge lanes, so a
/// long-lived session chains: each tag binds all input absorbed since the
/// key was loaded, including prior finalizations.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Kmac<const RATE: usize, const ROUNDS: usize> {
    state: KeccakState<RATE, ROUNDS>,
}

impl<const RATE: usize, const ROUNDS: usize> Kmac<RATE, ROUNDS> {
    /// Key a new session with an optional customization string.
    pub fn new(key: &[u8], custom: &[u8]) -> Self {
        let mut state = KeccakState::new();
        sponge::absorb_bytepad(&mut state, &[KMAC_NAME, custom]);
        sponge::absorb_bytepad(&mut state, &[key]);
        Kmac { state }
    }

    /// Absorb more message bytes.
    pub fn update(&mut self, message: &[u8]) {
        self.state.update(message);
    }

    /// Append the right-encoded tag length, pad, and squeeze the tag into
    /// `output`.
    pub fn finalize(&mut self, output: &mut [u8]) {
        let mut encoding = [0u8; 9];
        let length = sponge::right_encode(&mut encoding, output.len() * 8);
        self.state.update(&encoding[..length]);
        self.state.pad_absorb(KMAC_DOMAIN);

        let aligned = output.len() - output.len() % RATE;
        self.state.squeeze_blocks(&mut output[..aligned]);
        if aligned != output.len() {
            let mut block = [0u8; RATE];
            self.state.squeeze_blocks(&mut block);
            let remaining = output.len() - aligned;
            output[aligned..].copy_from_slice(&block[..remaining]);
            block.zeroize();
        }
    }

    /// One-shot MAC of `message` under `key` and `custom`.
    pub fn compute(output: &mut [u8], message: &[u8], key: &[u8], custom: &[u8]) {
        let mut mac = Self::new(key, custom);
        mac.update(message);
        mac.finalize(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incremental_matches_oneshot() {
        let message: Vec<u8> = (0..200u8).collect();
        let key = [0x2au8; 64];

        let mut oneshot = [0u8; 64];
        Kmac256::compute(&mut oneshot, &message, &key, b"tagged");

        for split in [0usize, 1, 135, 136, 137, 199] {
            let mut mac = Kmac256::new(&key, b"tagged");
            mac.update(&message[..split]);
            mac.update(&message[split..]);
            let mut tag = [0u8; 64];
            mac.finalize(&mut tag);
            assert_eq!(oneshot, tag, "split at {split}");
        }
    }

    #[test]
    fn chained_tags_differ() {
        let mut mac = Kmac512R12::new(&[0x07u8; 64], &[]);
        mac.update(b"first message");
        let mut first = [0u8; 64];
        mac.finalize(&mut first);

        mac.update(b"first message");
        let mut second = [0u8; 64];
        mac.finalize(&mut second);

        assert_ne!(first, second);
    }

    #[test]
    fn custom_string_separates() {
        let mut plain = [0u8; 32];
        Kmac128::compute(&mut plain, b"payload", &[0x55u8; 32], b"");
        let mut tagged = [0u8; 32];
        Kmac128::compute(&mut tagged, b"payload", &[0x55u8; 32], b"My Tagged Application");
        assert_ne!(plain, tagged);
    }

    #[test]
    fn reduced_rounds_separate() {
        let mut standard = [0u8; 64];
        Kmac::<{ RATE_512 }, 24>::compute(&mut standard, b"payload", &[0x55u8; 64], b"");
        let mut reduced = [0u8; 64];
        Kmac512R12::compute(&mut reduced, b"payload", &[0x55u8; 64], b"");
        assert_ne!(standard, reduced);
    }
}
