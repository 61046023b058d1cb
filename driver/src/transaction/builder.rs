// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! Transaction construction.
//!
//! Free functions that assemble unsigned transactions and their parts. None
//! of them touch key material; signing happens in [`super::signing`], which
//! keeps construction testable without private keys.
//!
//! Condition constructors come in pairs: a typed form returning a
//! [`CryptoCondition`] (for nesting into thresholds) and a `make_*` form
//! returning the `{ details, uri }` JSON an [`Output`] carries.

use serde_json::Value;
use tracing::debug;

use super::types::{
    Asset, AssetDefinition, AssetLink, Input, Operation, Output, Transaction, TransactionLink,
    UnspentOutput,
};
use super::verification::TransactionError;
use crate::condition::{
    cc_jsonify, ConditionDetails, ConditionError, ConditionJson, CryptoCondition, Ed25519Sha256,
    PreimageSha256, ThresholdSha256,
};
use crate::config::{
    DEFAULT_OUTPUT_AMOUNT, ED25519_SHA256_NAME, THRESHOLD_SHA256_NAME, TRANSACTION_VERSION,
};
use crate::crypto::keys::decode_public_key;

// ---------------------------------------------------------------------------
// Skeletons
// ---------------------------------------------------------------------------

/// An input owned by `public_keys`. Key format is not checked here.
pub fn make_input_template(
    public_keys: Vec<String>,
    fulfills: Option<TransactionLink>,
    fulfillment: Option<String>,
) -> Input {
    Input {
        fulfillment,
        fulfills,
        owners_before: public_keys,
    }
}

/// An unsigned transaction (`id` null, current format version).
pub fn make_transaction(
    operation: Operation,
    asset: Asset,
    metadata: Option<Value>,
    outputs: Vec<Output>,
    inputs: Vec<Input>,
) -> Transaction {
    debug!(
        %operation,
        inputs = inputs.len(),
        outputs = outputs.len(),
        "transaction built"
    );
    Transaction {
        id: None,
        operation,
        asset,
        metadata,
        inputs,
        outputs,
        version: TRANSACTION_VERSION.to_string(),
    }
}

/// An unsigned CREATE of `asset`.
///
/// One input per issuer, each owned by that issuer alone. Issuer order is
/// the order private keys must later be passed to the signer in.
pub fn make_create_transaction<S: AsRef<str>>(
    asset: Option<Value>,
    metadata: Option<Value>,
    outputs: Vec<Output>,
    issuers: &[S],
) -> Transaction {
    let inputs = issuers
        .iter()
        .map(|issuer| make_input_template(vec![issuer.as_ref().to_string()], None, None))
        .collect();
    make_transaction(
        Operation::Create,
        Asset::Definition(AssetDefinition { data: asset }),
        metadata,
        outputs,
        inputs,
    )
}

/// An unsigned TRANSFER spending `unspent_outputs`.
///
/// Each input is owned by the spent output's `public_keys`. The asset link
/// is the CREATE's id: the spent transaction's own id when it is a CREATE,
/// its asset link otherwise.
///
/// # Errors
///
/// - no unspent outputs,
/// - a referenced transaction without an id,
/// - an output index past the end of its transaction's outputs,
/// - outputs of more than one asset.
pub fn make_transfer_transaction(
    unspent_outputs: &[UnspentOutput<'_>],
    outputs: Vec<Output>,
    metadata: Option<Value>,
) -> Result<Transaction, TransactionError> {
    if unspent_outputs.is_empty() {
        return Err(TransactionError::NoUnspentOutputs);
    }

    let mut asset_id: Option<&str> = None;
    let mut inputs = Vec::with_capacity(unspent_outputs.len());
    for unspent in unspent_outputs {
        let tx = unspent.tx;
        let output_index = unspent.output_index;
        let transaction_id = tx
            .id
            .as_deref()
            .ok_or(TransactionError::UnsignedReference { output_index })?;
        let spent = tx
            .outputs
            .get(output_index)
            .ok_or_else(|| TransactionError::OutputIndexOutOfRange {
                transaction_id: transaction_id.to_string(),
                output_index,
                outputs: tx.outputs.len(),
            })?;

        let this_asset = tx
            .asset_id()
            .ok_or_else(|| TransactionError::MissingAssetLink {
                transaction_id: transaction_id.to_string(),
            })?;
        match asset_id {
            None => asset_id = Some(this_asset),
            Some(expected) if expected != this_asset => {
                return Err(TransactionError::MixedAssets {
                    expected: expected.to_string(),
                    found: this_asset.to_string(),
                });
            }
            Some(_) => {}
        }

        inputs.push(make_input_template(
            spent.public_keys.clone(),
            Some(TransactionLink {
                output_index,
                transaction_id: transaction_id.to_string(),
            }),
            None,
        ));
    }

    // Non-empty input list, so the first iteration set it.
    let id = asset_id.unwrap_or_default().to_string();
    Ok(make_transaction(
        Operation::Transfer,
        Asset::Link(AssetLink { id }),
        metadata,
        outputs,
        inputs,
    ))
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Reject amounts that are not plain decimal digits.
pub(crate) fn check_amount(amount: &str) -> Result<(), TransactionError> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TransactionError::InvalidAmount {
            amount: amount.to_string(),
        });
    }
    Ok(())
}

/// An output locking `amount` (default `"1"`) under `condition`.
///
/// `public_keys` lists the Ed25519 keys found by walking the condition
/// details, first-seen order, duplicates dropped.
pub fn make_output(
    condition: ConditionJson,
    amount: Option<&str>,
) -> Result<Output, TransactionError> {
    let amount = amount.unwrap_or(DEFAULT_OUTPUT_AMOUNT);
    check_amount(amount)?;

    let mut public_keys = Vec::new();
    collect_public_keys(&condition.details, &mut public_keys);
    Ok(Output {
        condition,
        amount: amount.to_string(),
        public_keys,
    })
}

fn collect_public_keys(details: &ConditionDetails, keys: &mut Vec<String>) {
    match details.kind.as_deref() {
        Some(ED25519_SHA256_NAME) => {
            if let Some(key) = &details.public_key {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        Some(THRESHOLD_SHA256_NAME) => {
            for sub in details.subconditions.iter().flatten() {
                collect_public_keys(sub, keys);
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// Unsigned Ed25519 condition for a base58 public key.
pub fn ed25519_condition(public_key: &str) -> Result<CryptoCondition, ConditionError> {
    Ok(Ed25519Sha256::new(decode_public_key(public_key)?).into())
}

/// JSON form of [`ed25519_condition`].
pub fn make_ed25519_condition(public_key: &str) -> Result<ConditionJson, ConditionError> {
    cc_jsonify(&ed25519_condition(public_key)?)
}

/// Preimage condition revealing `preimage`.
pub fn sha256_condition(preimage: impl Into<Vec<u8>>) -> CryptoCondition {
    PreimageSha256::new(preimage).into()
}

/// JSON form of [`sha256_condition`].
pub fn make_sha256_condition(preimage: impl Into<Vec<u8>>) -> Result<ConditionJson, ConditionError> {
    cc_jsonify(&sha256_condition(preimage))
}

/// `threshold`-of-n condition over `subconditions`.
pub fn threshold_condition(
    threshold: u32,
    subconditions: Vec<CryptoCondition>,
) -> Result<CryptoCondition, ConditionError> {
    Ok(ThresholdSha256::new(threshold, subconditions)?.into())
}

/// JSON form of [`threshold_condition`].
pub fn make_threshold_condition(
    threshold: u32,
    subconditions: Vec<CryptoCondition>,
) -> Result<ConditionJson, ConditionError> {
    cc_jsonify(&threshold_condition(threshold, subconditions)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
