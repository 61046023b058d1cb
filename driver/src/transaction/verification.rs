// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! Transaction verification: structural checks and cryptographic validation.
//!
//! [`verify_transaction`] re-derives everything the signer produced and
//! checks it against what the transaction carries. The checks run from
//! cheapest to most expensive, so structurally broken transactions fail
//! before any signature is looked at.

use thiserror::Error;
use tracing::{debug, warn};

use super::builder::check_amount;
use super::canonical::serialize_transaction_into_canonical_string;
use super::signing::{compute_transaction_id, input_payload};
use super::types::Transaction;
use crate::condition::{parse_fulfillment_uri, ConditionError};
use crate::crypto::hash::sha3_256;
use crate::crypto::keys::{encode_public_key, KeyError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from building, signing or verifying transactions.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// An output amount is not a base-10 integer string.
    #[error("invalid amount {amount:?}: must be decimal digits")]
    InvalidAmount { amount: String },

    /// A TRANSFER needs at least one output to spend.
    #[error("no unspent outputs given")]
    NoUnspentOutputs,

    #[error("output index {output_index} out of range: transaction {transaction_id} has {outputs} outputs")]
    OutputIndexOutOfRange {
        transaction_id: String,
        output_index: usize,
        outputs: usize,
    },

    /// The transaction holding an unspent output has no id yet.
    #[error("cannot spend output {output_index} of an unsigned transaction")]
    UnsignedReference { output_index: usize },

    /// A TRANSFER being spent from does not carry an asset link.
    #[error("transaction {transaction_id} has no asset link")]
    MissingAssetLink { transaction_id: String },

    /// The unspent outputs belong to more than one asset.
    #[error("unspent outputs span multiple assets: {expected} and {found}")]
    MixedAssets { expected: String, found: String },

    #[error("missing private key for input {index}")]
    MissingPrivateKey { index: usize },

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("condition error: {0}")]
    Condition(#[from] ConditionError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("transaction is unsigned")]
    Unsigned,

    #[error("transaction has no inputs")]
    NoInputs,

    /// The stored id is not the hash of the transaction's canonical form.
    #[error("transaction ID mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: String, actual: String },

    #[error("input {index} has no fulfillment")]
    MissingFulfillment { index: usize },

    #[error("input {index} has a malformed fulfillment: {source}")]
    InvalidFulfillment {
        index: usize,
        source: ConditionError,
    },

    /// The fulfillment is not made of owner signatures alone.
    #[error("input {index} is not fulfilled by an owner's signature")]
    UnsignedFulfillment { index: usize },

    /// The fulfillment does not validate against the input's payload.
    #[error("invalid signature on input {index}")]
    InvalidSignature { index: usize },

    /// A key signed the input without being one of its `owners_before`.
    #[error("input {index} signed by {public_key}, which is not an owner")]
    UnknownSigner { index: usize, public_key: String },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a signed transaction.
///
/// The checks, in order:
///
/// 1. **Signed**: `id` is set.
/// 2. **Inputs**: at least one.
/// 3. **Amounts**: every output amount is decimal text.
/// 4. **Fulfillments present**: every input carries one.
/// 5. **Transaction ID**: equals the SHA3-256 of the canonical form with
///    `id` nulled.
/// 6. **Fulfillments valid**: each parses, carries at least one Ed25519
///    signature and no preimage, validates against its input's payload
///    digest, and was signed only by keys in `owners_before`.
///
/// Whether the spent outputs exist and are unspent is the ledger's
/// business, not this function's.
pub fn verify_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    // 1-4. Structure.
    let id = tx.id.as_deref().ok_or(TransactionError::Unsigned)?;
    if tx.inputs.is_empty() {
        return Err(TransactionError::NoInputs);
    }
    for output in &tx.outputs {
        check_amount(&output.amount)?;
    }
    if let Some(index) = tx.inputs.iter().position(|i| i.fulfillment.is_none()) {
        return Err(TransactionError::MissingFulfillment { index });
    }

    // 5. Content-derived id.
    let expected = compute_transaction_id(tx)?;
    if expected != id {
        warn!(%expected, actual = %id, "transaction id mismatch");
        return Err(TransactionError::IdMismatch {
            expected,
            actual: id.to_string(),
        });
    }

    // 6. Per-input fulfillments, over the payload the signer saw.
    let serialized = serialize_transaction_into_canonical_string(&tx.without_signatures())?;
    for (index, input) in tx.inputs.iter().enumerate() {
        let uri = input
            .fulfillment
            .as_deref()
            .ok_or(TransactionError::MissingFulfillment { index })?;
        let fulfillment = parse_fulfillment_uri(uri)
            .map_err(|source| TransactionError::InvalidFulfillment { index, source })?;

        let signers = fulfillment.ed25519_public_keys();
        if signers.is_empty() || fulfillment.reveals_preimage() {
            warn!(index, "input fulfillment carries no owner signature");
            return Err(TransactionError::UnsignedFulfillment { index });
        }

        let digest = sha3_256(input_payload(&serialized, input.fulfills.as_ref()).as_bytes());
        if !fulfillment.validate(&digest) {
            warn!(index, "input signature does not validate");
            return Err(TransactionError::InvalidSignature { index });
        }

        for key in &signers {
            let public_key = encode_public_key(key);
            if !input.owners_before.contains(&public_key) {
                warn!(index, %public_key, "input signed by a non-owner");
                return Err(TransactionError::UnknownSigner { index, public_key });
            }
        }
    }

    debug!(%id, inputs = tx.inputs.len(), "transaction verified");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{fulfillment_uri, CryptoCondition, PreimageSha256};
    use crate::crypto::keys::Ed25519Keypair;
    use crate::transaction::builder::{
        make_create_transaction, make_ed25519_condition, make_output, make_transfer_transaction,
    };
    use crate::transaction::signing::sign_transaction;
    use crate::transaction::types::UnspentOutput;
    use serde_json::json;

    fn keypair(seed: u8) -> Ed25519Keypair {
        Ed25519Keypair::from_seed(&[seed; 32])
    }

    fn signed_create(kp: &Ed25519Keypair) -> Transaction {
        let output = make_output(make_ed25519_condition(&kp.public_key()).unwrap(), None).unwrap();
        let tx = make_create_transaction(
            Some(json!({ "serial": 1 })),
            None,
            vec![output],
            &[kp.public_key()],
        );
        sign_transaction(&tx, &[kp.private_key().as_str()]).unwrap()
    }

    #[test]
    fn signed_create_verifies() {
        let kp = keypair(1);
        verify_transaction(&signed_create(&kp)).unwrap();
    }

    #[test]
    fn signed_transfer_verifies() {
        let alice = keypair(1);
        let bob = keypair(2);
        let create = signed_create(&alice);
        let output = make_output(make_ed25519_condition(&bob.public_key()).unwrap(), None).unwrap();
        let transfer = make_transfer_transaction(
            &[UnspentOutput::new(&create, 0)],
            vec![output],
            None,
        )
        .unwrap();
        let signed = sign_transaction(&transfer, &[alice.private_key().as_str()]).unwrap();
        verify_transaction(&signed).unwrap();
    }

    #[test]
    fn unsigned_transaction_is_rejected() {
        let kp = keypair(1);
        let output = make_output(make_ed25519_condition(&kp.public_key()).unwrap(), None).unwrap();
        let tx = make_create_transaction(None, None, vec![output], &[kp.public_key()]);
        assert!(matches!(
            verify_transaction(&tx),
            Err(TransactionError::Unsigned)
        ));
    }

    #[test]
    fn tampered_metadata_breaks_the_id() {
        let kp = keypair(1);
        let mut tx = signed_create(&kp);
        tx.metadata = Some(json!({ "note": "changed" }));
        assert!(matches!(
            verify_transaction(&tx),
            Err(TransactionError::IdMismatch { .. })
        ));
    }

    #[test]
    fn tampering_with_id_recomputed_still_breaks_signature() {
        let kp = keypair(1);
        let mut tx = signed_create(&kp);
        tx.metadata = Some(json!({ "note": "changed" }));
        tx.id = Some(compute_transaction_id(&tx).unwrap());
        assert!(matches!(
            verify_transaction(&tx),
            Err(TransactionError::InvalidSignature { index: 0 })
        ));
    }

    #[test]
    fn signer_must_be_an_owner() {
        let owner = keypair(1);
        let intruder = keypair(2);
        let output =
            make_output(make_ed25519_condition(&owner.public_key()).unwrap(), None).unwrap();
        let tx = make_create_transaction(None, None, vec![output], &[owner.public_key()]);
        let signed = sign_transaction(&tx, &[intruder.private_key().as_str()]).unwrap();
        assert!(matches!(
            verify_transaction(&signed),
            Err(TransactionError::UnknownSigner { index: 0, .. })
        ));
    }

    #[test]
    fn preimage_fulfillment_does_not_count_as_a_signature() {
        let kp = keypair(1);
        let output = make_output(make_ed25519_condition(&kp.public_key()).unwrap(), None).unwrap();
        let mut tx = make_create_transaction(None, None, vec![output], &[kp.public_key()]);
        let preimage = CryptoCondition::from(PreimageSha256::new(b"anything".to_vec()));
        tx.inputs[0].fulfillment = Some(fulfillment_uri(&preimage).unwrap());
        tx.id = Some(compute_transaction_id(&tx).unwrap());
        assert!(matches!(
            verify_transaction(&tx),
            Err(TransactionError::UnsignedFulfillment { index: 0 })
        ));
    }

    #[test]
    fn garbage_fulfillment_is_reported_per_input() {
        let kp = keypair(1);
        let mut tx = signed_create(&kp);
        tx.inputs[0].fulfillment = Some("not-a-fulfillment".into());
        tx.id = Some(compute_transaction_id(&tx).unwrap());
        assert!(matches!(
            verify_transaction(&tx),
            Err(TransactionError::InvalidFulfillment { index: 0, .. })
        ));
    }

    #[test]
    fn missing_fulfillment_is_rejected() {
        let kp = keypair(1);
        let mut tx = signed_create(&kp);
        tx.inputs[0].fulfillment = None;
        assert!(matches!(
            verify_transaction(&tx),
            Err(TransactionError::MissingFulfillment { index: 0 })
        ));
    }
}
