// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! Text forms of conditions and fulfillments.
//!
//! ```text
//! ni:///sha-256;<b64url fingerprint>?fpt=<type>&cost=<n>[&subtypes=<a>,<b>]
//! <b64url DER fulfillment>
//! ```
//!
//! Both use unpadded base64url. Subtypes are listed by name in
//! alphabetical order, and only for compound types that have any.

use std::collections::BTreeSet;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::types::{Condition, ConditionType, CryptoCondition};
use super::ConditionError;
use crate::config::CONDITION_URI_PREFIX;

impl Condition {
    /// `ni:` URI of this condition.
    pub fn serialize_uri(&self) -> Result<String, ConditionError> {
        let condition_type = self.condition_type()?;
        let mut uri = format!(
            "{CONDITION_URI_PREFIX}{}?fpt={}&cost={}",
            URL_SAFE_NO_PAD.encode(&self.hash),
            condition_type.name(),
            self.max_fulfillment_length,
        );
        if condition_type.is_compound() && !self.subtypes.is_empty() {
            let mut names: Vec<&str> = self.subtypes.iter().map(|t| t.name()).collect();
            names.sort_unstable();
            uri.push_str("&subtypes=");
            uri.push_str(&names.join(","));
        }
        Ok(uri)
    }
}

/// Condition URI of any crypto-condition value.
pub fn condition_uri(condition: &CryptoCondition) -> Result<String, ConditionError> {
    condition.to_condition()?.serialize_uri()
}

/// Fulfillment URI of a complete fulfillment.
pub fn fulfillment_uri(fulfillment: &CryptoCondition) -> Result<String, ConditionError> {
    Ok(URL_SAFE_NO_PAD.encode(fulfillment.serialize_fulfillment()?))
}

/// Parse a fulfillment URI back into a fulfillment.
pub fn parse_fulfillment_uri(uri: &str) -> Result<CryptoCondition, ConditionError> {
    let bytes = URL_SAFE_NO_PAD.decode(uri.trim_end_matches('='))?;
    CryptoCondition::from_fulfillment_binary(&bytes)
}

/// Parse a condition URI.
///
/// `fpt` and `cost` are required; `subtypes` is read when present. Unknown
/// query parameters are ignored.
pub fn parse_condition_uri(uri: &str) -> Result<Condition, ConditionError> {
    let rest = uri
        .strip_prefix(CONDITION_URI_PREFIX)
        .ok_or_else(|| ConditionError::InvalidUri(format!("expected {CONDITION_URI_PREFIX} prefix")))?;
    let (fingerprint, query) = rest
        .split_once('?')
        .ok_or_else(|| ConditionError::InvalidUri("missing query string".into()))?;
    let hash = URL_SAFE_NO_PAD.decode(fingerprint)?;

    let mut condition_type = None;
    let mut cost = None;
    let mut subtypes = BTreeSet::new();
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "fpt" => {
                condition_type = Some(
                    ConditionType::from_name(value)
                        .ok_or_else(|| ConditionError::UnsupportedType(value.to_string()))?,
                );
            }
            "cost" => {
                cost = Some(value.parse::<u64>().map_err(|_| ConditionError::InvalidInteger {
                    field: "cost",
                    value: value.to_string(),
                })?);
            }
            "subtypes" => {
                for name in value.split(',').filter(|n| !n.is_empty()) {
                    subtypes.insert(
                        ConditionType::from_name(name)
                            .ok_or_else(|| ConditionError::UnsupportedType(name.to_string()))?,
                    );
                }
            }
            _ => {}
        }
    }

    let condition_type =
        condition_type.ok_or_else(|| ConditionError::InvalidUri("missing fpt".into()))?;
    let max_fulfillment_length =
        cost.ok_or_else(|| ConditionError::InvalidUri("missing cost".into()))?;
    Ok(Condition {
        type_id: Some(condition_type.type_id()),
        hash,
        max_fulfillment_length,
        subtypes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::types::{Ed25519Sha256, PreimageSha256, ThresholdSha256};
    use ed25519_dalek::SigningKey;

    fn ed(seed: u8) -> CryptoCondition {
        Ed25519Sha256::new(SigningKey::from_bytes(&[seed; 32]).verifying_key().to_bytes()).into()
    }

    #[test]
    fn ed25519_condition_uri_shape() {
        let uri = condition_uri(&ed(1)).unwrap();
        assert!(uri.starts_with("ni:///sha-256;"));
        assert!(uri.ends_with("?fpt=ed25519-sha-256&cost=131072"));
        // 32-byte fingerprint -> 43 unpadded base64url chars.
        let fingerprint = &uri["ni:///sha-256;".len()..uri.find('?').unwrap()];
        assert_eq!(fingerprint.len(), 43);
    }

    #[test]
    fn preimage_condition_uri_reports_length_as_cost() {
        let p: CryptoCondition = PreimageSha256::new(b"hello".to_vec()).into();
        assert!(condition_uri(&p)
            .unwrap()
            .ends_with("?fpt=preimage-sha-256&cost=5"));
    }

    #[test]
    fn threshold_uri_lists_subtypes() {
        let t: CryptoCondition = ThresholdSha256::new(
            1,
            vec![ed(1), PreimageSha256::new(b"x".to_vec()).into()],
        )
        .unwrap()
        .into();
        let uri = condition_uri(&t).unwrap();
        assert!(uri.contains("fpt=threshold-sha-256"));
        assert!(uri.ends_with("&subtypes=ed25519-sha-256,preimage-sha-256"));
    }

    #[test]
    fn condition_uri_roundtrip() {
        let t: CryptoCondition = ThresholdSha256::new(2, vec![ed(1), ed(2)]).unwrap().into();
        let condition = t.to_condition().unwrap();
        let parsed = parse_condition_uri(&condition.serialize_uri().unwrap()).unwrap();
        assert_eq!(parsed, condition);
    }

    #[test]
    fn signed_ed25519_fulfillment_uri_prefix() {
        let key = SigningKey::from_bytes(&[5u8; 32]);
        let f: CryptoCondition = Ed25519Sha256::signed(b"payload", &key).into();
        let uri = fulfillment_uri(&f).unwrap();
        assert!(uri.starts_with("pGSAI"));
        assert_eq!(parse_fulfillment_uri(&uri).unwrap(), f);
    }

    #[test]
    fn malformed_uris_are_rejected() {
        assert!(parse_condition_uri("http://example.com").is_err());
        assert!(parse_condition_uri("ni:///sha-256;AAAA").is_err());
        assert!(parse_condition_uri("ni:///sha-256;AAAA?fpt=ed25519-sha-256").is_err());
        assert!(parse_condition_uri("ni:///sha-256;AAAA?fpt=nope&cost=1").is_err());
        assert!(parse_fulfillment_uri("!!!").is_err());
    }
}
