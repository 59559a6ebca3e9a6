//! The CSX-512 authenticated stream cipher.
//!
//! CSX-512 (ChaCha eXtended) is an experimental, 64-bit, 40-round stream
//! cipher based on ChaCha, with a 1024-bit block and a 512-bit key. The
//! input key is expanded into independent cipher and MAC keys by cSHAKE-512,
//! and the ciphertext stream is authenticated with KMAC-512 in an
//! encrypt-then-MAC configuration.
//!
//! The cipher is tweakable: the optional `info` parameter customizes the
//! cSHAKE key expansion, and can serve as a domain key or a secondary secret
//! input.

use byteorder::{ByteOrder, LittleEndian};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::kmac::Kmac512;
use crate::shake::CShake512;
use crate::sponge::RATE_512;

/// The internal block size in bytes of the CSX-512 permutation.
pub const CSX_BLOCK_SIZE: usize = 128;

/// The maximum byte length of the info tweak.
pub const CSX_INFO_SIZE: usize = 48;

/// The byte length of the CSX-512 input cipher key.
pub const CSX_KEY_SIZE: usize = 64;

/// The byte length of the MAC tag appended to the ciphertext.
pub const CSX_MAC_SIZE: usize = 64;

/// The byte length of the nonce.
pub const CSX_NONCE_SIZE: usize = 16;

const CSX_STATE_SIZE: usize = 14;
const CSX_ROUND_COUNT: usize = 40;
const CSX_NAME_LENGTH: usize = 14;

/// The cSHAKE name used when no info tweak is supplied.
const CSX_NAME: [u8; CSX_NAME_LENGTH] = *b"CSX512-KMAC512";

/// The info-string constant loaded into lanes 8..14 of the permutation.
const CSX_INFO: [u8; CSX_INFO_SIZE] = *b"CSX512 KMAC authentication ver. 1c CEX++ library";

// The eight ARX quartets of a double-round: lane indices (a, b, c, d) and
// their rotation schedules. The first four mix along columns, the second
// four along diagonals.
const COLUMN_QUARTETS: [([usize; 4], [u32; 4]); 4] = [
    ([0, 4, 8, 12], [38, 19, 10, 55]),
    ([1, 5, 9, 13], [33, 4, 51, 13]),
    ([2, 6, 10, 14], [16, 34, 56, 51]),
    ([3, 7, 11, 15], [4, 53, 42, 41]),
];

const DIAGONAL_QUARTETS: [([usize; 4], [u32; 4]); 4] = [
    ([0, 5, 10, 15], [34, 41, 59, 17]),
    ([1, 6, 11, 12], [23, 31, 37, 20]),
    ([2, 7, 8, 13], [31, 44, 47, 46]),
    ([3, 4, 9, 14], [12, 47, 44, 30]),
];

#[inline(always)]
fn arx_quartet(x: &mut [u64; 16], lanes: [usize; 4], rotations: [u32; 4]) {
    let [a, b, c, d] = lanes;
    let [r0, r1, r2, r3] = rotations;
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(r0);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(r1);
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = (x[d] ^ x[a]).rotate_left(r2);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = (x[b] ^ x[c]).rotate_left(r3);
}

/// Map the 14 state lanes and 2 nonce lanes into the 16 permutation inputs.
#[inline(always)]
fn load_lanes(state: &[u64; CSX_STATE_SIZE], nonce: &[u64; 2]) -> [u64; 16] {
    [
        state[0], state[1], state[2], state[3], state[4], state[5], state[6], state[7], state[8],
        state[9], state[10], state[11], nonce[0], nonce[1], state[12], state[13],
    ]
}

/// The scalar CSX permutation: one 128-byte key-stream block for the current
/// counter, with the initial lanes fed forward into the output.
fn permute_p1024(state: &[u64; CSX_STATE_SIZE], nonce: &[u64; 2], output: &mut [u8]) {
    debug_assert_eq!(output.len(), CSX_BLOCK_SIZE);

    let init = load_lanes(state, nonce);
    let mut x = init;

    for _ in 0..CSX_ROUND_COUNT / 2 {
        for &(lanes, rotations) in &COLUMN_QUARTETS {
            arx_quartet(&mut x, lanes, rotations);
        }
        for &(lanes, rotations) in &DIAGONAL_QUARTETS {
            arx_quartet(&mut x, lanes, rotations);
        }
    }

    for (chunk, (word, feed)) in output.chunks_exact_mut(8).zip(x.iter().zip(init.iter())) {
        LittleEndian::write_u64(chunk, word.wrapping_add(*feed));
    }
}

/// A lane vector holding the same permutation lane for N interleaved blocks.
#[derive(Clone, Copy)]
struct WideLane<const N: usize>([u64; N]);

impl<const N: usize> WideLane<N> {
    #[inline(always)]
    fn splat(value: u64) -> Self {
        WideLane([value; N])
    }

    #[inline(always)]
    fn wrapping_add(self, other: Self) -> Self {
        let mut lane = self.0;
        for (slot, value) in lane.iter_mut().zip(other.0.iter()) {
            *slot = slot.wrapping_add(*value);
        }
        WideLane(lane)
    }

    #[inline(always)]
    fn xor_rotate_left(self, other: Self, shift: u32) -> Self {
        let mut lane = self.0;
        for (slot, value) in lane.iter_mut().zip(other.0.iter()) {
            *slot = (*slot ^ *value).rotate_left(shift);
        }
        WideLane(lane)
    }
}

#[inline(always)]
fn arx_quartet_wide<const N: usize>(
    x: &mut [WideLane<N>; 16],
    lanes: [usize; 4],
    rotations: [u32; 4],
) {
    let [a, b, c, d] = lanes;
    let [r0, r1, r2, r3] = rotations;
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = x[d].xor_rotate_left(x[a], r0);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = x[b].xor_rotate_left(x[c], r1);
    x[a] = x[a].wrapping_add(x[b]);
    x[d] = x[d].xor_rotate_left(x[a], r2);
    x[c] = x[c].wrapping_add(x[d]);
    x[b] = x[b].xor_rotate_left(x[c], r3);
}

/// The lane-interleaved CSX permutation: N independent counter blocks are
/// carried through the rounds as N-wide integer vectors and stored
/// block-interleaved, so lane `j` of block `k` lands at `k·128 + 8·j`.
fn permute_wide<const N: usize>(
    state: &[u64; CSX_STATE_SIZE],
    counters: &[[u64; N]; 2],
    output: &mut [u8],
) {
    debug_assert_eq!(output.len(), N * CSX_BLOCK_SIZE);

    let init: [WideLane<N>; 16] = [
        WideLane::splat(state[0]),
        WideLane::splat(state[1]),
        WideLane::splat(state[2]),
        WideLane::splat(state[3]),
        WideLane::splat(state[4]),
        WideLane::splat(state[5]),
        WideLane::splat(state[6]),
        WideLane::splat(state[7]),
        WideLane::splat(state[8]),
        WideLane::splat(state[9]),
        WideLane::splat(state[10]),
        WideLane::splat(state[11]),
        WideLane(counters[0]),
        WideLane(counters[1]),
        WideLane::splat(state[12]),
        WideLane::splat(state[13]),
    ];
    let mut x = init;

    for _ in 0..CSX_ROUND_COUNT / 2 {
        for &(lanes, rotations) in &COLUMN_QUARTETS {
            arx_quartet_wide(&mut x, lanes, rotations);
        }
        for &(lanes, rotations) in &DIAGONAL_QUARTETS {
            arx_quartet_wide(&mut x, lanes, rotations);
        }
    }

    for (j, (word, feed)) in x.iter().zip(init.iter()).enumerate() {
        let sum = word.wrapping_add(*feed);
        for (k, value) in sum.0.iter().enumerate() {
            let offset = k * CSX_BLOCK_SIZE + j * 8;
            LittleEndian::write_u64(&mut output[offset..offset + 8], *value);
        }
    }
}

#[inline(always)]
fn xor_bytes(output: &mut [u8], input: &[u8]) {
    for (out_byte, in_byte) in output.iter_mut().zip(input) {
        *out_byte ^= *in_byte;
    }
}

/// The key parameters for a CSX-512 session: a 64-byte key, a 16-byte
/// nonce, and an optional info tweak of up to 48 bytes.
///
/// The parameters are borrowed for the duration of [`Csx512::new`] only;
/// the session keeps its own copies.
#[derive(Clone, Copy)]
pub struct KeyParams<'a> {
    key: &'a [u8],
    nonce: &'a [u8],
    info: &'a [u8],
}

impl<'a> KeyParams<'a> {
    /// Returns key parameters with no info tweak.
    pub fn new(key: &'a [u8], nonce: &'a [u8]) -> Self {
        KeyParams { key, nonce, info: &[] }
    }

    /// Returns key parameters with an info tweak. Only the first 14 bytes
    /// of the tweak customize the key schedule.
    pub fn with_info(key: &'a [u8], nonce: &'a [u8], info: &'a [u8]) -> Self {
        KeyParams { key, nonce, info }
    }
}

/// A CSX-512 session.
///
/// A session is created for either encryption or decryption, carries its own
/// nonce counter and processed-byte counter across [`Self::transform`]
/// calls, and zeroizes all secret material when dropped.
///
/// Sessions are independent: there is no process-wide state, and separate
/// sessions may run on separate threads. Operations on a single session must
/// be serialized by the caller.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Csx512 {
    state: [u64; CSX_STATE_SIZE],
    nonce: [u64; 2],
    kmac: Kmac512,
    counter: u64,
    aad: Vec<u8>,
    encrypt: bool,
}

impl Csx512 {
    /// Creates a session from the input cipher key and optional info tweak.
    ///
    /// cSHAKE-512, customized by the info tweak (or the default cipher name),
    /// expands the input key into a cipher key and an independent MAC key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not 64 bytes, the nonce is not 16 bytes, or the
    /// info tweak exceeds 48 bytes.
    pub fn new(params: &KeyParams, encrypt: bool) -> Self {
        assert_eq!(params.key.len(), CSX_KEY_SIZE, "key must be {CSX_KEY_SIZE} bytes");
        assert_eq!(params.nonce.len(), CSX_NONCE_SIZE, "nonce must be {CSX_NONCE_SIZE} bytes");
        assert!(params.info.len() <= CSX_INFO_SIZE, "info must be at most {CSX_INFO_SIZE} bytes");

        let mut name = [0u8; CSX_NAME_LENGTH];
        if params.info.is_empty() {
            name.copy_from_slice(&CSX_NAME);
        } else {
            let length = params.info.len().min(CSX_NAME_LENGTH);
            name[..length].copy_from_slice(&params.info[..length]);
        }

        let mut xof = CShake512::new(params.key, &name, &[]);
        let mut block = Zeroizing::new([0u8; RATE_512]);

        // first squeeze block: the cipher key, loaded alongside the
        // info-string constant and the nonce
        xof.squeeze_blocks(&mut block[..]);
        let mut state = [0u64; CSX_STATE_SIZE];
        for (lane, chunk) in state[..8].iter_mut().zip(block[..CSX_KEY_SIZE].chunks_exact(8)) {
            *lane = LittleEndian::read_u64(chunk);
        }
        for (lane, chunk) in state[8..].iter_mut().zip(CSX_INFO.chunks_exact(8)) {
            *lane = LittleEndian::read_u64(chunk);
        }
        let nonce = [
            LittleEndian::read_u64(&params.nonce[..8]),
            LittleEndian::read_u64(&params.nonce[8..]),
        ];

        // second squeeze block: the MAC key
        xof.squeeze_blocks(&mut block[..]);
        let kmac = Kmac512::new(&block[..CSX_KEY_SIZE], &[]);

        Csx512 { state, nonce, kmac, counter: 0, aad: Vec::new(), encrypt }
    }

    /// Stages associated data to be bound into the next [`Self::transform`]
    /// call's MAC, such as packet-header data. The data is consumed by that
    /// call and then cleared.
    pub fn set_associated(&mut self, data: &[u8]) {
        self.aad.zeroize();
        self.aad.extend_from_slice(data);
    }

    /// Transform a message, returning `true` on success.
    ///
    /// In encryption mode `input` is the plaintext and `output` must be
    /// `input.len() + CSX_MAC_SIZE` bytes; the ciphertext is written
    /// followed by the MAC tag.
    ///
    /// In decryption mode `input` is the ciphertext followed by its tag and
    /// `output` must be `input.len() - CSX_MAC_SIZE` bytes. The tag is
    /// recomputed and compared in constant time before any decryption takes
    /// place; on a mismatch `output` is untouched and `false` is returned.
    #[must_use]
    pub fn transform(&mut self, output: &mut [u8], input: &[u8]) -> bool {
        self.transform_inner(output, input, true)
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn transform_scalar(&mut self, output: &mut [u8], input: &[u8]) -> bool {
        self.transform_inner(output, input, false)
    }

    /// Consume the session. Dropping a session zeroizes the cipher state,
    /// nonce, MAC state, and any staged associated data; this method only
    /// makes the end of the session's life explicit.
    pub fn dispose(self) {}

    fn transform_inner(&mut self, output: &mut [u8], input: &[u8], wide: bool) -> bool {
        if self.encrypt {
            assert_eq!(
                output.len(),
                input.len() + CSX_MAC_SIZE,
                "output must hold the ciphertext and MAC tag"
            );

            let nonce_copy = self.nonce_bytes();
            self.counter += input.len() as u64;

            let (body, tag) = output.split_at_mut(input.len());
            self.generate(body, wide);
            xor_bytes(body, input);

            self.mac_message(&nonce_copy, body, tag);
            true
        } else {
            assert_eq!(
                input.len(),
                output.len() + CSX_MAC_SIZE,
                "input must hold the ciphertext and MAC tag"
            );

            let nonce_copy = self.nonce_bytes();
            self.counter += output.len() as u64;

            let (body, tag) = input.split_at(output.len());
            let mut code = Zeroizing::new([0u8; CSX_MAC_SIZE]);
            self.mac_message(&nonce_copy, body, &mut code[..]);

            if bool::from(code[..].ct_eq(tag)) {
                self.generate(output, wide);
                xor_bytes(output, body);
                true
            } else {
                false
            }
        }
    }

    /// Authenticate one transform's framing,
    /// `aad ‖ nonce ‖ ciphertext ‖ le64(counter)`, consuming the staged
    /// associated data.
    fn mac_message(&mut self, nonce_copy: &[u8; CSX_NONCE_SIZE], body: &[u8], tag: &mut [u8]) {
        self.kmac.update(&self.aad);
        self.kmac.update(nonce_copy);
        self.kmac.update(body);
        self.kmac.update(&self.counter.to_le_bytes());
        self.kmac.finalize(tag);
        self.aad.zeroize();
    }

    /// Fill `output` with key-stream for the current counter.
    ///
    /// The aligned leading region is produced by the interleaved 8-way and
    /// 4-way permutations, remaining whole blocks by the scalar permutation,
    /// and a final partial block by a truncated scalar block. The counter
    /// advances once per 128-byte block, including the truncated one.
    fn generate(&mut self, output: &mut [u8], wide: bool) {
        let length = output.len();
        let mut offset = 0;

        if wide {
            while length - offset >= 8 * CSX_BLOCK_SIZE {
                let counters = self.next_counters::<8>();
                permute_wide(&self.state, &counters, &mut output[offset..offset + 8 * CSX_BLOCK_SIZE]);
                offset += 8 * CSX_BLOCK_SIZE;
            }

            while length - offset >= 4 * CSX_BLOCK_SIZE {
                let counters = self.next_counters::<4>();
                permute_wide(&self.state, &counters, &mut output[offset..offset + 4 * CSX_BLOCK_SIZE]);
                offset += 4 * CSX_BLOCK_SIZE;
            }
        }

        while length - offset >= CSX_BLOCK_SIZE {
            permute_p1024(&self.state, &self.nonce, &mut output[offset..offset + CSX_BLOCK_SIZE]);
            self.increment();
            offset += CSX_BLOCK_SIZE;
        }

        if offset != length {
            let mut block = [0u8; CSX_BLOCK_SIZE];
            permute_p1024(&self.state, &self.nonce, &mut block);
            self.increment();
            output[offset..].copy_from_slice(&block[..length - offset]);
            block.zeroize();
        }
    }

    /// Advance the 128-bit block counter by one.
    fn increment(&mut self) {
        self.nonce[0] = self.nonce[0].wrapping_add(1);
        if self.nonce[0] == 0 {
            self.nonce[1] = self.nonce[1].wrapping_add(1);
        }
    }

    /// Capture the next N counter values, advancing the counter N times.
    fn next_counters<const N: usize>(&mut self) -> [[u64; N]; 2] {
        let mut counters = [[0u64; N]; 2];
        for slot in 0..N {
            counters[0][slot] = self.nonce[0];
            counters[1][slot] = self.nonce[1];
            self.increment();
        }
        counters
    }

    fn nonce_bytes(&self) -> [u8; CSX_NONCE_SIZE] {
        let mut bytes = [0u8; CSX_NONCE_SIZE];
        LittleEndian::write_u64(&mut bytes[..8], self.nonce[0]);
        LittleEndian::write_u64(&mut bytes[8..], self.nonce[1]);
        bytes
    }
}
