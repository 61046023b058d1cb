// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Hashing Utilities
//!
//! Two hash functions, two jobs, no overlap:
//!
//! - **SHA3-256**: transaction ids and per-input signing payloads. The
//!   result travels as lowercase hex, and the signer feeds the raw digest
//!   bytes (not the hex text) to Ed25519.
//!
//! - **SHA-256**: crypto-condition fingerprints. The condition format fixes
//!   this one; it is never used for transaction ids.

use sha2::Sha256;
use sha3::{Digest, Sha3_256};

use crate::config::HASH_OUTPUT_LENGTH;

/// Compute the SHA3-256 digest of `data`.
///
/// # Example
///
/// ```
/// use ledger_driver::crypto::hash::sha3_256;
///
/// let digest = sha3_256(b"");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the SHA3-256 digest of `data` as a lowercase hex string.
///
/// This is the hash primitive behind transaction ids: `id =
/// sha3_256_hex(canonical_string)`.
pub fn sha3_256_hex(data: &[u8]) -> String {
    hex::encode(sha3_256(data))
}

/// Compute the SHA-256 digest of `data`.
///
/// Used for condition fingerprints (and as the hash a preimage condition
/// commits to).
pub fn sha256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
