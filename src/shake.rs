//! The SHAKE and cSHAKE extendable output functions.
//!
//! SHAKE-128 and SHAKE-256 are the FIPS-202 XOFs; SHAKE-512 is the
//! 512-bit-capacity extension (rate 72) that the CSX-512 key schedule is
//! built on. cSHAKE adds the SP 800-185 `name`/`custom` framing and falls
//! through to plain SHAKE when both strings are empty.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keccak::FULL_ROUNDS;
use crate::sponge::{
    self, KeccakState, CSHAKE_DOMAIN, RATE_128, RATE_256, RATE_512, SHAKE_DOMAIN,
};

/// The SHAKE-128 XOF.
pub type Shake128 = Shake<{ RATE_128 }>;

/// The SHAKE-256 XOF.
pub type Shake256 = Shake<{ RATE_256 }>;

/// The SHAKE-512 XOF.
pub type Shake512 = Shake<{ RATE_512 }>;

/// A SHAKE XOF at the given sponge rate.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Shake<const RATE: usize> {
    state: KeccakState<RATE, { FULL_ROUNDS }>,
}

impl<const RATE: usize> Shake<RATE> {
    /// Absorb `input` and return a squeezable XOF.
    pub fn new(input: &[u8]) -> Self {
        let mut state = KeccakState::new();
        state.absorb(input, SHAKE_DOMAIN);
        Shake { state }
    }

    /// Fill `output`, whose length must be a multiple of the rate, with
    /// consecutive squeeze blocks.
    pub fn squeeze_blocks(&mut self, output: &mut [u8]) {
        self.state.squeeze_blocks(output);
    }

    /// One-shot XOF: absorb `input` and squeeze `output.len()` bytes.
    pub fn compute(output: &mut [u8], input: &[u8]) {
        let mut xof = Self::new(input);
        squeeze_into(&mut xof.state, output);
    }
}

/// The cSHAKE-128 XOF.
pub type CShake128 = CShake<{ RATE_128 }>;

/// The cSHAKE-256 XOF.
pub type CShake256 = CShake<{ RATE_256 }>;

/// The cSHAKE-512 XOF.
pub type CShake512 = CShake<{ RATE_512 }>;

/// A cSHAKE XOF at the given sponge rate.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CShake<const RATE: usize> {
    state: KeccakState<RATE, { FULL_ROUNDS }>,
}

impl<const RATE: usize> CShake<RATE> {
    /// Absorb `input` under the `name` and `custom` framing strings and
    /// return a squeezable XOF. When both strings are empty this is plain
    /// SHAKE.
    pub fn new(input: &[u8], name: &[u8], custom: &[u8]) -> Self {
        let mut state = KeccakState::new();
        if name.is_empty() && custom.is_empty() {
            state.absorb(input, SHAKE_DOMAIN);
        } else {
            sponge::absorb_bytepad(&mut state, &[name, custom]);
            state.absorb(input, CSHAKE_DOMAIN);
        }
        CShake { state }
    }

    /// Fill `output`, whose length must be a multiple of the rate, with
    /// consecutive squeeze blocks.
    pub fn squeeze_blocks(&mut self, output: &mut [u8]) {
        self.state.squeeze_blocks(output);
    }

    /// One-shot XOF: absorb `input` under the framing strings and squeeze
    /// `output.len()` bytes.
    pub fn compute(output: &mut [u8], input: &[u8], name: &[u8], custom: &[u8]) {
        let mut xof = Self::new(input, name, custom);
        squeeze_into(&mut xof.state, output);
    }
}

/// Squeeze an arbitrary number of bytes: whole blocks directly into the
/// output, then one truncated block for the tail.
fn squeeze_into<const RATE: usize>(
    state: &mut KeccakState<RATE, { FULL_ROUNDS }>,
    output: &mut [u8],
) {
    let aligned = output.len() - output.len() % RATE;
    state.squeeze_blocks(&mut output[..aligned]);
    if aligned != output.len() {
        let mut block = [0u8; RATE];
        state.squeeze_blocks(&mut block);
        let remaining = output.len() - aligned;
        output[aligned..].copy_from_slice(&block[..remaining]);
        block.zeroize();
    }
}
