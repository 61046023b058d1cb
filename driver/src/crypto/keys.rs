// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Key Management
//!
//! Ed25519 keypairs and the base58 text form keys take on the wire.
//!
//! The ledger never sees a keypair as such: only the base58 public key (in
//! `owners_before`, `public_keys` and condition details) and, on the client
//! side, the base58 private key handed to the signer. A private key here is
//! the 32-byte Ed25519 seed, not the 64-byte seed-plus-public-key form some
//! libraries export.
//!
//! ## Security considerations
//!
//! - Signing keys are zeroized on drop (ed25519-dalek's `zeroize` feature),
//!   and decoded private-key buffers are wrapped in [`Zeroizing`].
//! - Key generation uses `OsRng`.
//! - Private keys are never logged. Public keys are fair game.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};

/// Errors that can occur while decoding key material.
///
/// The messages never echo the offending text: for private keys that text
/// *is* the secret.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid base58 encoding: {0}")]
    InvalidBase58(#[from] bs58::decode::Error),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An Ed25519 keypair in the form the ledger expects: base58 text.
///
/// Mirrors the external key generator contract: `generate(seed?)` yields a
/// `{ public_key, private_key }` pair, deterministic when seeded.
///
/// # Examples
///
/// ```
/// use ledger_driver::crypto::keys::Ed25519Keypair;
///
/// let kp = Ed25519Keypair::from_seed(&[7u8; 32]);
/// let again = Ed25519Keypair::from_seed(&[7u8; 32]);
/// assert_eq!(kp.public_key(), again.public_key());
/// ```
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Derive a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Rebuild a keypair from a base58 private key.
    pub fn from_private_key(private_key: &str) -> Result<Self, KeyError> {
        Ok(Self {
            signing_key: signing_key_from_base58(private_key)?,
        })
    }

    /// Base58 public key, as it appears in `owners_before` and `public_keys`.
    pub fn public_key(&self) -> String {
        bs58::encode(self.signing_key.verifying_key().as_bytes()).into_string()
    }

    /// Base58 private key (the 32-byte seed).
    ///
    /// Returned in a [`Zeroizing`] wrapper so the text is wiped when the
    /// caller is done with it.
    pub fn private_key(&self) -> Zeroizing<String> {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        Zeroizing::new(bs58::encode(&seed[..]).into_string())
    }

    /// Raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The underlying signing key, for code that talks to ed25519-dalek.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl Clone for Ed25519Keypair {
    fn clone(&self) -> Self {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        Self::from_seed(&seed)
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Keypair(pub={})", self.public_key())
    }
}

// ---------------------------------------------------------------------------
// Base58 codecs
// ---------------------------------------------------------------------------

/// Decode base58 text into exactly `N` bytes.
fn decode_fixed<const N: usize>(text: &str) -> Result<[u8; N], KeyError> {
    let bytes = Zeroizing::new(bs58::decode(text).into_vec()?);
    if bytes.len() != N {
        return Err(KeyError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Decode a base58 public key into its 32 raw bytes.
///
/// Only the length is checked. Whether the bytes are a valid curve point
/// matters at verification time, see [`verifying_key_from_bytes`].
pub fn decode_public_key(public_key: &str) -> Result<[u8; PUBLIC_KEY_LENGTH], KeyError> {
    decode_fixed::<PUBLIC_KEY_LENGTH>(public_key)
}

/// Decode a base58 private key into a zeroizing 32-byte seed.
pub fn decode_private_key(
    private_key: &str,
) -> Result<Zeroizing<[u8; PRIVATE_KEY_LENGTH]>, KeyError> {
    decode_fixed::<PRIVATE_KEY_LENGTH>(private_key).map(Zeroizing::new)
}

/// Decode a base58 private key straight into an ed25519-dalek signing key.
pub fn signing_key_from_base58(private_key: &str) -> Result<SigningKey, KeyError> {
    let seed = decode_private_key(private_key)?;
    Ok(SigningKey::from_bytes(&seed))
}

/// Encode raw public key bytes as base58.
pub fn encode_public_key(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> String {
    bs58::encode(bytes).into_string()
}

/// Parse raw public key bytes into a verifying key, rejecting non-points.
pub fn verifying_key_from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<VerifyingKey, KeyError> {
    VerifyingKey::from_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_decode_to_32_bytes() {
        let kp = Ed25519Keypair::generate();
        assert_eq!(decode_public_key(&kp.public_key()).unwrap().len(), 32);
        assert_eq!(decode_private_key(&kp.private_key()).unwrap().len(), 32);
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let seed = [42u8; 32];
        let kp1 = Ed25519Keypair::from_seed(&seed);
        let kp2 = Ed25519Keypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
        assert_eq!(*kp1.private_key(), *kp2.private_key());
    }

    #[test]
    fn private_key_is_the_seed() {
        let seed = [9u8; 32];
        let kp = Ed25519Keypair::from_seed(&seed);
        assert_eq!(*decode_private_key(&kp.private_key()).unwrap(), seed);
    }

    #[test]
    fn private_key_roundtrip_restores_public_key() {
        let kp = Ed25519Keypair::generate();
        let restored = Ed25519Keypair::from_private_key(&kp.private_key()).unwrap();
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn two_generated_keypairs_differ() {
        let kp1 = Ed25519Keypair::generate();
        let kp2 = Ed25519Keypair::generate();
        assert_ne!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn malformed_base58_is_rejected() {
        // '0', 'O', 'I' and 'l' are not in the base58 alphabet.
        match decode_public_key("0OIl") {
            Err(KeyError::InvalidBase58(_)) => {}
            other => panic!("expected InvalidBase58, got {:?}", other),
        }
    }

    #[test]
    fn wrong_length_is_rejected() {
        let short = bs58::encode([1u8; 16]).into_string();
        match decode_private_key(&short) {
            Err(KeyError::InvalidLength {
                expected: 32,
                actual: 16,
            }) => {}
            other => panic!("expected InvalidLength, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn debug_does_not_leak_private_key() {
        let kp = Ed25519Keypair::from_seed(&[3u8; 32]);
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("Ed25519Keypair(pub="));
        assert!(!debug_str.contains(kp.private_key().as_str()));
    }

    #[test]
    fn base58_public_key_length_is_typical() {
        let kp = Ed25519Keypair::generate();
        let b58 = kp.public_key();
        assert!(b58.len() >= 42 && b58.len() <= 46);
    }

    #[test]
    fn encode_decode_public_key_roundtrip() {
        let kp = Ed25519Keypair::generate();
        let bytes = kp.public_key_bytes();
        assert_eq!(decode_public_key(&encode_public_key(&bytes)).unwrap(), bytes);
    }
}
