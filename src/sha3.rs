//! The SHA3-256 and SHA3-512 message digests.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keccak::FULL_ROUNDS;
use crate::sponge::{KeccakState, RATE_256, RATE_512, SHA3_DOMAIN};

/// The SHA3-256 digest.
pub type Sha3_256 = Sha3<{ RATE_256 }, 32>;

/// The SHA3-512 digest.
pub type Sha3_512 = Sha3<{ RATE_512 }, 64>;

/// An incremental SHA-3 hash at the given sponge rate and digest length.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct Sha3<const RATE: usize, const DIGEST: usize> {
    state: KeccakState<RATE, { FULL_ROUNDS }>,
}

impl<const RATE: usize, const DIGEST: usize> Sha3<RATE, DIGEST> {
    /// Returns a fresh hash state.
    pub fn new() -> Self {
        Sha3 {
            state: KeccakState::new(),
        }
    }

    /// Absorb more message bytes.
    pub fn update(&mut self, message: &[u8]) {
        self.state.update(message);
    }

    /// Pad, permute, and return the digest, consuming the state.
    pub fn finalize(mut self) -> [u8; DIGEST] {
        self.state.pad_absorb(SHA3_DOMAIN);
        let mut block = [0u8; RATE];
        self.state.squeeze_blocks(&mut block);
        let mut digest = [0u8; DIGEST];
        digest.copy_from_slice(&block[..DIGEST]);
        block.zeroize();
        digest
    }

    /// One-shot digest of `message`.
    pub fn compute(message: &[u8]) -> [u8; DIGEST] {
        let mut hash = Self::new();
        hash.update(message);
        hash.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha3_256_empty_kat() {
        assert_eq!(
            Sha3_256::compute(&[]).to_vec(),
            hex::decode("a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b47848d94950d967b5a30")
                .unwrap(),
        );
    }

    #[test]
    fn sha3_256_abc_kat() {
        assert_eq!(
            Sha3_256::compute(b"abc").to_vec(),
            hex::decode("3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532")
                .unwrap(),
        );
    }

    #[test]
    fn sha3_512_empty_kat() {
        assert_eq!(
            Sha3_512::compute(&[]).to_vec(),
            hex::decode(
                "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6\
                 15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26"
            )
            .unwrap(),
        );
    }

    #[test]
    fn incremental_matches_oneshot() {
        let message: Vec<u8> = (0..=255u8).cycle().take(300).collect();
        let mut hash = Sha3_256::new();
        hash.update(&message[..137]);
        hash.update(&message[137..]);
        assert_eq!(hash.finalize(), Sha3_256::compute(&message));
    }
}
