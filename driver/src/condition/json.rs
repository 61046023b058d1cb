// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! JSON form of crypto-conditions, as carried in `output.condition`.
//!
//! ```json
//! {
//!   "details": { "type": "ed25519-sha-256", "public_key": "<base58>" },
//!   "uri": "ni:///sha-256;...?fpt=ed25519-sha-256&cost=131072"
//! }
//! ```
//!
//! [`cc_jsonify`] and [`cc_json_load`] convert between [`CryptoCondition`]
//! and this shape. The details object only describes the condition tree;
//! it never carries signatures.
//!
//! Bare conditions follow a long-standing wire quirk: whatever their type,
//! their details end up with `type: "condition"` plus `hash` and
//! `max_fulfillment_length`, and only preimage conditions record a
//! `type_id`. Peers rely on this shape, so it is kept.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::types::{Condition, CryptoCondition, Ed25519Sha256, PreimageSha256, ThresholdSha256};
use super::uri::condition_uri;
use super::ConditionError;
use crate::config::{
    BARE_CONDITION_NAME, ED25519_SHA256_NAME, PREIMAGE_BITMASK, PREIMAGE_FULFILLMENT_NAME,
    PREIMAGE_SHA256_NAME, PREIMAGE_SHA256_TYPE_ID, THRESHOLD_SHA256_NAME,
};
use crate::crypto::keys::{decode_public_key, encode_public_key};

/// `{ details, uri }` as it appears in an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionJson {
    pub details: ConditionDetails,
    pub uri: String,
}

impl ConditionJson {
    /// Load the condition tree described by `details`.
    pub fn load(&self) -> Result<CryptoCondition, ConditionError> {
        cc_json_load(&self.details)
    }
}

/// The `details` object. Which fields are present depends on `type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitmask: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preimage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fulfillment_length: Option<IntegerText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subconditions: Option<Vec<ConditionDetails>>,
}

/// An integer that may arrive as a JSON number or as decimal text.
///
/// We always write numbers; we accept either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerText {
    Number(u64),
    Text(String),
}

impl IntegerText {
    /// Parse as a base-10 `u64`. Text must be plain ASCII digits.
    pub fn to_u64(&self, field: &'static str) -> Result<u64, ConditionError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(text) => {
                let invalid = || ConditionError::InvalidInteger {
                    field,
                    value: text.clone(),
                };
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                text.parse().map_err(|_| invalid())
            }
        }
    }
}

/// Describe `condition` as `{ details, uri }`.
///
/// The `uri` is always the condition URI, fulfillment or not.
pub fn cc_jsonify(condition: &CryptoCondition) -> Result<ConditionJson, ConditionError> {
    Ok(ConditionJson {
        details: details_of(condition)?,
        uri: condition_uri(condition)?,
    })
}

fn details_of(condition: &CryptoCondition) -> Result<ConditionDetails, ConditionError> {
    Ok(match condition {
        // The details carry the preimage as text, so only UTF-8 survives.
        CryptoCondition::Preimage(p) => ConditionDetails {
            kind: Some(PREIMAGE_FULFILLMENT_NAME.to_string()),
            type_id: Some(PREIMAGE_SHA256_TYPE_ID),
            bitmask: Some(PREIMAGE_BITMASK),
            preimage: Some(
                String::from_utf8(p.preimage.clone())
                    .map_err(|_| ConditionError::NonUtf8Preimage)?,
            ),
            ..Default::default()
        },
        CryptoCondition::Threshold(t) => ConditionDetails {
            kind: Some(THRESHOLD_SHA256_NAME.to_string()),
            threshold: Some(t.threshold),
            subconditions: Some(
                t.subconditions
                    .iter()
                    .map(details_of)
                    .collect::<Result<_, _>>()?,
            ),
            ..Default::default()
        },
        CryptoCondition::Ed25519(e) => ConditionDetails {
            kind: Some(ED25519_SHA256_NAME.to_string()),
            public_key: Some(encode_public_key(&e.public_key)),
            ..Default::default()
        },
        CryptoCondition::Condition(c) => {
            let mut details = ConditionDetails::default();
            if c.type_id == Some(PREIMAGE_SHA256_TYPE_ID) {
                details.type_id = Some(PREIMAGE_SHA256_TYPE_ID);
                details.bitmask = Some(PREIMAGE_BITMASK);
            }
            details.kind = Some(BARE_CONDITION_NAME.to_string());
            details.hash = Some(bs58::encode(&c.hash).into_string());
            details.max_fulfillment_length = Some(IntegerText::Number(c.max_fulfillment_length));
            details
        }
    })
}

/// Rebuild a condition tree from its details.
///
/// - `hash` present: a bare [`Condition`] (type id kept only if recorded).
/// - `threshold-sha-256`: a threshold over the recursively loaded children.
/// - `ed25519-sha-256`: an unsigned Ed25519 condition.
/// - `fulfillment` / `preimage-sha-256` with a `preimage`: a preimage.
///
/// Anything else is [`ConditionError::UnsupportedType`].
pub fn cc_json_load(details: &ConditionDetails) -> Result<CryptoCondition, ConditionError> {
    if let Some(hash) = &details.hash {
        let max_fulfillment_length = details
            .max_fulfillment_length
            .as_ref()
            .ok_or(ConditionError::MissingField("max_fulfillment_length"))?
            .to_u64("max_fulfillment_length")?;
        return Ok(Condition {
            type_id: details.type_id,
            hash: bs58::decode(hash).into_vec()?,
            max_fulfillment_length,
            subtypes: BTreeSet::new(),
        }
        .into());
    }

    match details.kind.as_deref() {
        Some(THRESHOLD_SHA256_NAME) => {
            let threshold = details
                .threshold
                .ok_or(ConditionError::MissingField("threshold"))?;
            let subconditions = details
                .subconditions
                .as_ref()
                .ok_or(ConditionError::MissingField("subconditions"))?
                .iter()
                .map(cc_json_load)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ThresholdSha256::new(threshold, subconditions)?.into())
        }
        Some(ED25519_SHA256_NAME) => {
            let public_key = details
                .public_key
                .as_deref()
                .ok_or(ConditionError::MissingField("public_key"))?;
            Ok(Ed25519Sha256::new(decode_public_key(public_key)?).into())
        }
        Some(PREIMAGE_FULFILLMENT_NAME | PREIMAGE_SHA256_NAME) => {
            let preimage = details
                .preimage
                .as_deref()
                .ok_or(ConditionError::MissingField("preimage"))?;
            Ok(PreimageSha256::new(preimage.as_bytes()).into())
        }
        Some(other) => Err(ConditionError::UnsupportedType(other.to_string())),
        None => Err(ConditionError::MissingField("type")),
    }
}
