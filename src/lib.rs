//! An implementation of the CSX-512 authenticated stream cipher.
//!
//! CSX-512 (authenticated Cipher Stream, ChaCha eXtended) is a hybrid of the
//! ChaCha stream cipher using 64-bit integers, a 1024-bit block, and a
//! 512-bit key. The input key is expanded into independent cipher and MAC
//! keys with the cSHAKE-512 XOF, and the ciphertext stream is authenticated
//! with KMAC-512 in an encrypt-then-MAC configuration. An optional `info`
//! tweak customizes the key schedule, acting as a domain key or a secondary
//! secret input.
//!
//! The Keccak substrate (the Keccak-f\[1600\] permutation, sponge framing,
//! SHA-3, SHAKE/cSHAKE, and KMAC) is exposed as well, in the
//! [`keccak`], [`sponge`], [`sha3`], [`shake`], and [`kmac`] modules.
//!
//! **N.B.:** CSX-512 is an experimental design with no published security
//! analysis. Do not use it to protect anything of value.
//!
//! ```
//! use csx512::{Csx512, KeyParams, CSX_KEY_SIZE, CSX_MAC_SIZE, CSX_NONCE_SIZE};
//!
//! let key = [0u8; CSX_KEY_SIZE];
//! let nonce = [0u8; CSX_NONCE_SIZE];
//! let message = b"attack at dawn";
//!
//! let mut cipher = Csx512::new(&KeyParams::new(&key, &nonce), true);
//! cipher.set_associated(b"packet header");
//! let mut sealed = vec![0u8; message.len() + CSX_MAC_SIZE];
//! assert!(cipher.transform(&mut sealed, message));
//!
//! let mut cipher = Csx512::new(&KeyParams::new(&key, &nonce), false);
//! cipher.set_associated(b"packet header");
//! let mut opened = vec![0u8; message.len()];
//! assert!(cipher.transform(&mut opened, &sealed));
//! assert_eq!(&message[..], &opened[..]);
//! ```

pub mod csx;
pub mod keccak;
pub mod kmac;
pub mod sha3;
pub mod shake;
pub mod sponge;

mod fuzzing;

pub use crate::csx::{
    Csx512, KeyParams, CSX_BLOCK_SIZE, CSX_INFO_SIZE, CSX_KEY_SIZE, CSX_MAC_SIZE, CSX_NONCE_SIZE,
};
