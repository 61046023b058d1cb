// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Cryptographic Primitives
//!
//! Thin wrappers over audited implementations: ed25519-dalek for keys and
//! signatures, the RustCrypto `sha2`/`sha3` crates for digests. The
//! crypto-condition layer in [`crate::condition`] is built on top of these.

pub mod hash;
pub mod keys;

pub use hash::{sha256, sha3_256, sha3_256_hex};
pub use keys::{
    decode_private_key, decode_public_key, encode_public_key, Ed25519Keypair, KeyError,
};
