// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! Wire types for ledger transactions.
//!
//! Field names and shapes match the JSON the ledger accepts byte for byte,
//! because the id and every signature are computed over that JSON. In
//! particular, `null` fields are written as `null` rather than omitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::condition::ConditionJson;
use crate::config::{OPERATION_CREATE, OPERATION_TRANSFER};

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// What a transaction does to its asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Registers a new asset and its initial outputs.
    #[serde(rename = "CREATE")]
    Create,
    /// Spends existing outputs of an asset into new ones.
    #[serde(rename = "TRANSFER")]
    Transfer,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str(OPERATION_CREATE),
            Self::Transfer => f.write_str(OPERATION_TRANSFER),
        }
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// `{ "data": ... }` carried by a CREATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetDefinition {
    pub data: Option<Value>,
}

/// `{ "id": ... }` carried by a TRANSFER: the id of the asset's CREATE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetLink {
    pub id: String,
}

/// The asset a transaction refers to.
///
/// Untagged on the wire; the two shapes are told apart by their single key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    Link(AssetLink),
    Definition(AssetDefinition),
}

impl Asset {
    /// The linked asset id, for TRANSFER assets.
    pub fn link_id(&self) -> Option<&str> {
        match self {
            Self::Link(link) => Some(&link.id),
            Self::Definition(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs & Outputs
// ---------------------------------------------------------------------------

/// Pointer to a specific output of a prior transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionLink {
    pub output_index: usize,
    pub transaction_id: String,
}

/// A claim on an output (TRANSFER) or an issuer slot (CREATE).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Fulfillment URI; `None` until signed.
    pub fulfillment: Option<String>,
    /// The spent output; `None` for CREATE inputs.
    pub fulfills: Option<TransactionLink>,
    /// Base58 public keys that must sign this input.
    pub owners_before: Vec<String>,
}

/// An amount of the asset locked under a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub condition: ConditionJson,
    /// Decimal integer text.
    pub amount: String,
    /// Ed25519 keys of the condition tree, first-seen order, no duplicates.
    pub public_keys: Vec<String>,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A ledger transaction.
///
/// `id` is `None` until [`super::signing::sign_transaction`] fills it in
/// with the SHA3-256 of the canonical form of the signed transaction
/// (taken while `id` is still null).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    pub operation: Operation,
    pub asset: Asset,
    pub metadata: Option<Value>,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub version: String,
}

impl Transaction {
    /// Whether the signer has run: an id is set and every input carries a
    /// fulfillment.
    pub fn is_signed(&self) -> bool {
        self.id.is_some() && self.inputs.iter().all(|i| i.fulfillment.is_some())
    }

    /// The asset id this transaction's outputs belong to: its own id for a
    /// CREATE, the linked id for a TRANSFER.
    pub fn asset_id(&self) -> Option<&str> {
        match self.operation {
            Operation::Create => self.id.as_deref(),
            Operation::Transfer => self.asset.link_id(),
        }
    }

    /// Copy with `id` and every fulfillment cleared: the form signing
    /// payloads are computed over.
    pub(crate) fn without_signatures(&self) -> Self {
        let mut tx = self.clone();
        tx.id = None;
        for input in &mut tx.inputs {
            input.fulfillment = None;
        }
        tx
    }
}

/// An output to spend, named by the transaction holding it and its index.
#[derive(Debug, Clone, Copy)]
pub struct UnspentOutput<'a> {
    pub tx: &'a Transaction,
    pub output_index: usize,
}

impl<'a> UnspentOutput<'a> {
    pub fn new(tx: &'a Transaction, output_index: usize) -> Self {
        Self { tx, output_index }
    }
}
