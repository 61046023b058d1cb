// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! Transaction signing with Ed25519 keys.
//!
//! Signing is a separate step from building because the keys may not be
//! available at construction time. Every input signs the same canonical
//! string of the unsigned transaction; TRANSFER inputs append the link
//! they spend so that no two inputs share a payload:
//!
//! ```text
//! payload_i = canonical(tx)                                   (no fulfills)
//! payload_i = canonical(tx) + transaction_id + output_index   (fulfills set)
//! signature = Ed25519(private_key_i, SHA3-256(payload_i))
//! id        = hex(SHA3-256(canonical(signed tx with id = null)))
//! ```

use tracing::{debug, trace};

use super::canonical::serialize_transaction_into_canonical_string;
use super::types::{Transaction, TransactionLink};
use super::verification::TransactionError;
use crate::condition::{fulfillment_uri, CryptoCondition, Ed25519Sha256};
use crate::crypto::hash::{sha3_256, sha3_256_hex};
use crate::crypto::keys::signing_key_from_base58;

/// Sign every input of `tx`, returning a new signed transaction.
///
/// `private_keys[i]` (base58 seed) signs input `i`; extra keys are ignored.
/// Any existing id and fulfillments are cleared before signing, so signing
/// again with other keys yields other fulfillments and a different id.
///
/// # Errors
///
/// Fails as a whole, leaving no partially-signed result, when:
/// - an input has no corresponding key ([`TransactionError::MissingPrivateKey`]),
/// - a key is not valid base58 or not 32 bytes ([`TransactionError::Key`]).
///
/// # Example
///
/// ```
/// use ledger_driver::crypto::keys::Ed25519Keypair;
/// use ledger_driver::transaction::builder::{
///     make_create_transaction, make_ed25519_condition, make_output,
/// };
/// use ledger_driver::transaction::signing::sign_transaction;
///
/// let alice = Ed25519Keypair::from_seed(&[1u8; 32]);
/// let output = make_output(make_ed25519_condition(&alice.public_key()).unwrap(), None).unwrap();
/// let tx = make_create_transaction(None, None, vec![output], &[alice.public_key()]);
///
/// let signed = sign_transaction(&tx, &[alice.private_key().as_str()]).unwrap();
/// assert!(signed.is_signed());
/// assert!(tx.id.is_none());
/// ```
pub fn sign_transaction<K: AsRef<str>>(
    tx: &Transaction,
    private_keys: &[K],
) -> Result<Transaction, TransactionError> {
    let mut signed = tx.without_signatures();
    let serialized = serialize_transaction_into_canonical_string(&signed)?;

    for (index, input) in signed.inputs.iter_mut().enumerate() {
        let private_key = private_keys
            .get(index)
            .ok_or(TransactionError::MissingPrivateKey { index })?;
        let signing_key = signing_key_from_base58(private_key.as_ref())?;

        let digest = sha3_256(input_payload(&serialized, input.fulfills.as_ref()).as_bytes());
        let fulfillment = CryptoCondition::from(Ed25519Sha256::signed(&digest, &signing_key));
        input.fulfillment = Some(fulfillment_uri(&fulfillment)?);

        trace!(index, spends = input.fulfills.is_some(), "input signed");
    }

    let id = compute_transaction_id(&signed)?;
    debug!(%id, inputs = signed.inputs.len(), "transaction signed");
    signed.id = Some(id);
    Ok(signed)
}

/// SHA3-256 hex of the canonical form of `tx` with `id` set to null.
pub fn compute_transaction_id(tx: &Transaction) -> Result<String, TransactionError> {
    let mut unidentified = tx.clone();
    unidentified.id = None;
    let serialized = serialize_transaction_into_canonical_string(&unidentified)?;
    Ok(sha3_256_hex(serialized.as_bytes()))
}

/// The text an input signs (before hashing).
pub(crate) fn input_payload(serialized: &str, fulfills: Option<&TransactionLink>) -> String {
    match fulfills {
        Some(link) => format!("{serialized}{}{}", link.transaction_id, link.output_index),
        None => serialized.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
