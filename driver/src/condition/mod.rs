// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Crypto-conditions
//!
//! Conditions lock transaction outputs; fulfillments unlock them. This
//! module holds the condition data model, its binary and URI encodings, and
//! the JSON "details" form that travels inside a transaction.
//!
//! ## Architecture
//!
//! ```text
//! types.rs  CryptoCondition and its variants: fingerprint, cost, subtypes,
//!           validate, and their DER forms (via yasna)
//! uri.rs    condition URIs (ni:///sha-256;...) and base64url fulfillment URIs
//! json.rs   cc_jsonify / cc_json_load between CryptoCondition and ConditionDetails
//! ```
//!
//! ## Encodings at a glance
//!
//! - A **condition URI** names the condition: fingerprint, type and cost.
//!   It is the `uri` of every output condition.
//! - A **fulfillment URI** is the base64url DER fulfillment. It is what a
//!   signed input carries in its `fulfillment` field.
//! - The **details** object is a JSON description of the condition tree
//!   that can be turned back into a [`CryptoCondition`].

pub mod json;
pub mod types;
pub mod uri;

use thiserror::Error;

use crate::crypto::keys::KeyError;

pub use json::{cc_json_load, cc_jsonify, ConditionDetails, ConditionJson, IntegerText};
pub use types::{
    Condition, ConditionType, CryptoCondition, Ed25519Sha256, PreimageSha256, ThresholdSha256,
};
pub use uri::{condition_uri, fulfillment_uri, parse_condition_uri, parse_fulfillment_uri};

/// Errors raised while building, encoding or decoding crypto-conditions.
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("invalid base58 encoding: {0}")]
    InvalidBase58(#[from] bs58::decode::Error),

    #[error("invalid base64url encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error(transparent)]
    Key(#[from] KeyError),

    /// A numeric field held text that is not a base-10 integer.
    #[error("invalid integer in `{field}`: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    /// The `type` of a details object is not one this driver can load.
    #[error("unsupported condition type: {0}")]
    UnsupportedType(String),

    #[error("unknown condition type id {0}")]
    UnknownTypeId(u8),

    /// A bare condition that never recorded its type id has no binary or
    /// URI form.
    #[error("condition has no type id")]
    MissingTypeId,

    #[error("missing field `{0}` in condition details")]
    MissingField(&'static str),

    #[error("invalid threshold {threshold} for {subconditions} subconditions")]
    InvalidThreshold { threshold: u32, subconditions: usize },

    #[error("threshold {threshold} not met: only {available} subfulfillments available")]
    ThresholdNotMet { threshold: u32, available: usize },

    #[error("a bare condition cannot be serialized as a fulfillment")]
    NotAFulfillment,

    #[error("ed25519 fulfillment is not signed")]
    MissingSignature,

    /// Preimage details are text; binary preimages have no JSON form.
    #[error("preimage is not valid UTF-8")]
    NonUtf8Preimage,

    /// A threshold's worst-case cost does not fit in 64 bits.
    #[error("condition cost overflows u64")]
    CostOverflow,

    #[error("malformed DER: {0}")]
    Der(String),

    #[error("malformed DER: {0}")]
    Asn1(#[from] yasna::ASN1Error),

    #[error("malformed condition URI: {0}")]
    InvalidUri(String),
}
