//! Rate-bounded sponge framing over the Keccak permutation.
//!
//! A [`KeccakState`] is a 25-lane Keccak state plus a rate-sized staging
//! buffer for incremental updates. The same state type backs SHA-3, SHAKE,
//! cSHAKE, and KMAC; the modes differ only in their domain-separation byte
//! and the framing absorbed ahead of the input.

use byteorder::{ByteOrder, LittleEndian};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keccak::{self, STATE_LANES};

/// Sponge rate in bytes at the 128-bit security level.
pub const RATE_128: usize = 168;

/// Sponge rate in bytes at the 256-bit security level.
pub const RATE_256: usize = 136;

/// Sponge rate in bytes at the 384-bit security level.
pub const RATE_384: usize = 104;

/// Sponge rate in bytes at the 512-bit security level.
pub const RATE_512: usize = 72;

pub(crate) const SHA3_DOMAIN: u8 = 0x06;
pub(crate) const SHAKE_DOMAIN: u8 = 0x1F;
pub(crate) const CSHAKE_DOMAIN: u8 = 0x04;
pub(crate) const KMAC_DOMAIN: u8 = 0x04;

/// A Keccak sponge state, parameterized by the rate in bytes and the round
/// count of the inner permutation.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeccakState<const RATE: usize, const ROUNDS: usize> {
    lanes: [u64; STATE_LANES],
    buffer: [u8; RATE],
    position: usize,
}

impl<const RATE: usize, const ROUNDS: usize> Default for KeccakState<RATE, ROUNDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RATE: usize, const ROUNDS: usize> KeccakState<RATE, ROUNDS> {
    /// Returns a zeroed sponge state.
    pub fn new() -> Self {
        KeccakState {
            lanes: [0u64; STATE_LANES],
            buffer: [0u8; RATE],
            position: 0,
        }
    }

    /// Apply the inner permutation to the lane state.
    pub(crate) fn permute(&mut self) {
        keccak::permute::<ROUNDS>(&mut self.lanes);
    }

    /// XOR a block of at most `RATE` bytes into the front of the lane state
    /// without permuting.
    pub(crate) fn xor_block(&mut self, block: &[u8]) {
        debug_assert!(block.len() <= RATE);
        for (lane, chunk) in self.lanes.iter_mut().zip(block.chunks_exact(8)) {
            *lane ^= LittleEndian::read_u64(chunk);
        }
    }

    /// Absorb a complete message: whole-rate blocks are XOR'd and permuted,
    /// and the tail is padded with the domain byte and the pad10*1 rule.
    ///
    /// The final padded block is XOR'd without a trailing permute;
    /// [`Self::squeeze_blocks`] permutes before each extraction.
    pub fn absorb(&mut self, mut input: &[u8], domain: u8) {
        while input.len() >= RATE {
            self.xor_block(&input[..RATE]);
            self.permute();
            input = &input[RATE..];
        }

        let mut block = [0u8; RATE];
        block[..input.len()].copy_from_slice(input);
        block[input.len()] = domain;
        block[RATE - 1] |= 0x80;
        self.xor_block(&block);
        block.zeroize();
    }

    /// Fill `output`, whose length must be a multiple of the rate, with
    /// squeezed blocks. Each block is produced by permuting and copying the
    /// first `RATE` bytes of the state.
    pub fn squeeze_blocks(&mut self, output: &mut [u8]) {
        debug_assert_eq!(output.len() % RATE, 0);
        for block in output.chunks_exact_mut(RATE) {
            self.permute();
            for (chunk, lane) in block.chunks_exact_mut(8).zip(self.lanes.iter()) {
                LittleEndian::write_u64(chunk, *lane);
            }
        }
    }

    /// Incrementally absorb `message`, staging partial blocks in the buffer
    /// and flushing whole blocks through the permutation.
    pub fn update(&mut self, mut message: &[u8]) {
        if message.is_empty() {
            return;
        }

        if self.position != 0 && self.position + message.len() >= RATE {
            let remainder = RATE - self.position;
            let staged = {
                let mut staged = [0u8; RATE];
                staged[..self.position].copy_from_slice(&self.buffer[..self.position]);
                staged[self.position..].copy_from_slice(&message[..remainder]);
                staged
            };
            self.xor_block(&staged);
            self.permute();
            self.position = 0;
            message = &message[remainder..];
        }

        while message.len() >= RATE {
            self.xor_block(&message[..RATE]);
            self.permute();
            message = &message[RATE..];
        }

        if !message.is_empty() {
            self.buffer[self.position..self.position + message.len()].copy_from_slice(message);
            self.position += message.len();
        }
    }

    /// Pad the staged tail with the domain byte and the pad10*1 rule and XOR
    /// it into the state. Clears the staging buffer; squeezing permutes.
    pub(crate) fn pad_absorb(&mut self, domain: u8) {
        let mut block = [0u8; RATE];
        block[..self.position].copy_from_slice(&self.buffer[..self.position]);
        block[self.position] = domain;
        block[RATE - 1] |= 0x80;
        self.xor_block(&block);
        block.zeroize();
        self.buffer.zeroize();
        self.position = 0;
    }
}

/// Write the SP 800-185 `left_encode` of `value` into `buffer`, returning the
/// encoded length. `left_encode(0)` is `[0x01, 0x00]`.
pub(crate) fn left_encode(buffer: &mut [u8; 9], value: usize) -> usize {
    let mut n = 0;
    let mut v = value;
    while v != 0 && n < 8 {
        n += 1;
        v >>= 8;
    }
    if n == 0 {
        n = 1;
    }
    for i in 1..=n {
        buffer[i] = (value >> (8 * (n - i))) as u8;
    }
    buffer[0] = n as u8;
    n + 1
}

/// Write the SP 800-185 `right_encode` of `value` into `buffer`, returning
/// the encoded length.
pub(crate) fn right_encode(buffer: &mut [u8; 9], value: usize) -> usize {
    let mut n = 0;
    let mut v = value;
    while v != 0 && n < 8 {
        n += 1;
        v >>= 8;
    }
    if n == 0 {
        n = 1;
    }
    for i in 1..=n {
        buffer[i - 1] = (value >> (8 * (n - i))) as u8;
    }
    buffer[n] = n as u8;
    n + 1
}

/// Absorb the `bytepad(left_encode(RATE) ‖ encode_string(s)*)` framing header
/// shared by cSHAKE and KMAC: each string is prefixed with the left-encoded
/// bit length, the whole header is zero-padded to a rate boundary, and every
/// filled block is permuted.
pub(crate) fn absorb_bytepad<const RATE: usize, const ROUNDS: usize>(
    state: &mut KeccakState<RATE, ROUNDS>,
    strings: &[&[u8]],
) {
    let mut block = [0u8; RATE];
    let mut offset = 0;
    let mut encoding = [0u8; 9];

    let length = left_encode(&mut encoding, RATE);
    append_framed(state, &mut block, &mut offset, &encoding[..length]);

    for string in strings {
        let length = left_encode(&mut encoding, string.len() * 8);
        append_framed(state, &mut block, &mut offset, &encoding[..length]);
        append_framed(state, &mut block, &mut offset, string);
    }

    state.xor_block(&block);
    state.permute();
    block.zeroize();
}

fn append_framed<const RATE: usize, const ROUNDS: usize>(
    state: &mut KeccakState<RATE, ROUNDS>,
    block: &mut [u8; RATE],
    offset: &mut usize,
    bytes: &[u8],
) {
    for &byte in bytes {
        if *offset == RATE {
            state.xor_block(block);
            state.permute();
            *block = [0u8; RATE];
            *offset = 0;
        }
        block[*offset] = byte;
        *offset += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_encode_zero() {
        let mut buffer = [0u8; 9];
        let length = left_encode(&mut buffer, 0);
        assert_eq!(&buffer[..length], &[0x01, 0x00]);
    }

    #[test]
    fn left_encode_single_byte() {
        let mut buffer = [0u8; 9];
        let length = left_encode(&mut buffer, RATE_512);
        assert_eq!(&buffer[..length], &[0x01, 0x48]);
    }

    #[test]
    fn left_encode_multi_byte() {
        let mut buffer = [0u8; 9];
        let length = left_encode(&mut buffer, 0x0100);
        assert_eq!(&buffer[..length], &[0x02, 0x01, 0x00]);
    }

    #[test]
    fn right_encode_tag_bits() {
        let mut buffer = [0u8; 9];
        let length = right_encode(&mut buffer, 512);
        assert_eq!(&buffer[..length], &[0x02, 0x00, 0x02]);
    }

    #[test]
    fn update_matches_absorb() {
        // incremental updates across every boundary shape must match a
        // one-shot absorb of the concatenated message
        let message: Vec<u8> = (0..=255u8).cycle().take(401).collect();
        for split in [0usize, 1, 71, 72, 73, 144, 145, 400] {
            let mut oneshot = KeccakState::<{ RATE_512 }, 24>::new();
            oneshot.absorb(&message, SHAKE_DOMAIN);
            let mut expected = [0u8; RATE_512];
            oneshot.squeeze_blocks(&mut expected);

            let mut incremental = KeccakState::<{ RATE_512 }, 24>::new();
            incremental.update(&message[..split]);
            incremental.update(&message[split..]);
            incremental.pad_absorb(SHAKE_DOMAIN);
            let mut actual = [0u8; RATE_512];
            incremental.squeeze_blocks(&mut actual);

            assert_eq!(expected, actual, "split at {split}");
        }
    }

    #[test]
    fn zeroize_clears_state() {
        let mut state = KeccakState::<{ RATE_512 }, 24>::new();
        state.update(b"some secret input");
        state.permute();
        state.zeroize();
        assert_eq!(state.lanes, [0u64; STATE_LANES]);
        assert_eq!(state.buffer, [0u8; RATE_512]);
        assert_eq!(state.position, 0);
    }
}
