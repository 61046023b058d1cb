// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! The crypto-condition data model.
//!
//! [`CryptoCondition`] is a closed sum over the four shapes the ledger deals
//! with. Three of them are fulfillments (they can produce their own
//! condition and, once complete, a fulfillment encoding); the fourth is a
//! bare [`Condition`] that only knows its type, fingerprint and cost.
//!
//! ```text
//! Preimage   preimage bytes                 -> fingerprint = SHA-256(preimage)
//! Ed25519    public key (+ signature)       -> fingerprint = SHA-256(DER{pk})
//! Threshold  m-of-n over nested conditions  -> fingerprint = SHA-256(DER{m, SET OF cond})
//! Condition  type id, fingerprint, cost, subtypes
//! ```

use std::collections::BTreeSet;
use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use yasna::{BERReader, DERWriter, Tag};

use super::ConditionError;
use crate::config::{
    ED25519_COST, ED25519_SHA256_NAME, ED25519_SHA256_TYPE_ID, MAX_FULFILLMENT_DEPTH, MAX_THRESHOLD,
    PREFIX_SHA256_NAME, PREFIX_SHA256_TYPE_ID, PREIMAGE_SHA256_NAME, PREIMAGE_SHA256_TYPE_ID,
    PUBLIC_KEY_LENGTH, RSA_SHA256_NAME, RSA_SHA256_TYPE_ID, SIGNATURE_LENGTH,
    THRESHOLD_SHA256_NAME, THRESHOLD_SHA256_TYPE_ID, THRESHOLD_SUBCONDITION_COST,
};
use crate::crypto::hash::sha256;
use crate::crypto::keys::verifying_key_from_bytes;

// ---------------------------------------------------------------------------
// ConditionType
// ---------------------------------------------------------------------------

/// The registered crypto-condition types.
///
/// Only preimage, threshold and Ed25519 can be built or fulfilled here;
/// prefix and RSA are recognised so that subtype sets and parsed conditions
/// referring to them survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionType {
    PreimageSha256,
    PrefixSha256,
    ThresholdSha256,
    RsaSha256,
    Ed25519Sha256,
}

impl ConditionType {
    /// Numeric type id (also the DER `CHOICE` tag number).
    pub fn type_id(self) -> u8 {
        match self {
            Self::PreimageSha256 => PREIMAGE_SHA256_TYPE_ID,
            Self::PrefixSha256 => PREFIX_SHA256_TYPE_ID,
            Self::ThresholdSha256 => THRESHOLD_SHA256_TYPE_ID,
            Self::RsaSha256 => RSA_SHA256_TYPE_ID,
            Self::Ed25519Sha256 => ED25519_SHA256_TYPE_ID,
        }
    }

    /// Look a type up by numeric id.
    pub fn from_type_id(type_id: u8) -> Result<Self, ConditionError> {
        match type_id {
            PREIMAGE_SHA256_TYPE_ID => Ok(Self::PreimageSha256),
            PREFIX_SHA256_TYPE_ID => Ok(Self::PrefixSha256),
            THRESHOLD_SHA256_TYPE_ID => Ok(Self::ThresholdSha256),
            RSA_SHA256_TYPE_ID => Ok(Self::RsaSha256),
            ED25519_SHA256_TYPE_ID => Ok(Self::Ed25519Sha256),
            other => Err(ConditionError::UnknownTypeId(other)),
        }
    }

    /// Registered type name, as used in `fpt=` and `subtypes=`.
    pub fn name(self) -> &'static str {
        match self {
            Self::PreimageSha256 => PREIMAGE_SHA256_NAME,
            Self::PrefixSha256 => PREFIX_SHA256_NAME,
            Self::ThresholdSha256 => THRESHOLD_SHA256_NAME,
            Self::RsaSha256 => RSA_SHA256_NAME,
            Self::Ed25519Sha256 => ED25519_SHA256_NAME,
        }
    }

    /// Look a type up by registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::PreimageSha256,
            Self::PrefixSha256,
            Self::ThresholdSha256,
            Self::RsaSha256,
            Self::Ed25519Sha256,
        ]
        .into_iter()
        .find(|t| t.name() == name)
    }

    /// Compound types carry a subtype set in their condition.
    pub fn is_compound(self) -> bool {
        matches!(self, Self::PrefixSha256 | Self::ThresholdSha256)
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Variant payloads
// ---------------------------------------------------------------------------

/// `preimage-sha-256`: satisfied by revealing a secret whose SHA-256 is the
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreimageSha256 {
    pub preimage: Vec<u8>,
}

/// `ed25519-sha-256`: satisfied by an Ed25519 signature under `public_key`.
///
/// `signature` is `None` until [`Ed25519Sha256::sign`] runs; an unsigned
/// value still yields a condition, just not a fulfillment encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519Sha256 {
    pub public_key: [u8; PUBLIC_KEY_LENGTH],
    pub signature: Option<[u8; SIGNATURE_LENGTH]>,
}

/// `threshold-sha-256`: satisfied when `threshold` of `subconditions` are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSha256 {
    pub threshold: u32,
    pub subconditions: Vec<CryptoCondition>,
}

/// A bare condition: type, fingerprint and cost with no fulfillment data.
///
/// `type_id` is optional because the JSON form of a bare condition only
/// records it for preimage conditions. A condition without one can still be
/// carried around and re-serialized as JSON, but it has no URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub type_id: Option<u8>,
    pub hash: Vec<u8>,
    pub max_fulfillment_length: u64,
    pub subtypes: BTreeSet<ConditionType>,
}

/// Any crypto-condition value: one of the three fulfillment types, or a bare
/// condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoCondition {
    Preimage(PreimageSha256),
    Threshold(ThresholdSha256),
    Ed25519(Ed25519Sha256),
    Condition(Condition),
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl PreimageSha256 {
    pub fn new(preimage: impl Into<Vec<u8>>) -> Self {
        Self {
            preimage: preimage.into(),
        }
    }
}

impl Ed25519Sha256 {
    /// An unsigned Ed25519 condition for `public_key`.
    pub fn new(public_key: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self {
            public_key,
            signature: None,
        }
    }

    /// Sign `message`, replacing both the public key (with the signer's) and
    /// any previous signature.
    pub fn sign(&mut self, message: &[u8], signing_key: &SigningKey) {
        self.public_key = signing_key.verifying_key().to_bytes();
        self.signature = Some(signing_key.sign(message).to_bytes());
    }

    /// Build a signed fulfillment in one step.
    pub fn signed(message: &[u8], signing_key: &SigningKey) -> Self {
        let mut fulfillment = Self::new(signing_key.verifying_key().to_bytes());
        fulfillment.sign(message, signing_key);
        fulfillment
    }

    /// Check the signature over `message`. Unsigned values never validate.
    pub fn validate(&self, message: &[u8]) -> bool {
        let Some(signature) = self.signature else {
            return false;
        };
        let Ok(verifying_key) = verifying_key_from_bytes(&self.public_key) else {
            return false;
        };
        verifying_key
            .verify(message, &Signature::from_bytes(&signature))
            .is_ok()
    }
}

impl ThresholdSha256 {
    /// A threshold over `subconditions`; requires `1 <= threshold <= n`.
    pub fn new(threshold: u32, subconditions: Vec<CryptoCondition>) -> Result<Self, ConditionError> {
        let threshold = Self {
            threshold,
            subconditions,
        };
        threshold.check()?;
        Ok(threshold)
    }

    fn check(&self) -> Result<(), ConditionError> {
        let n = self.subconditions.len();
        if self.threshold == 0 || self.threshold > MAX_THRESHOLD || self.threshold as usize > n {
            return Err(ConditionError::InvalidThreshold {
                threshold: self.threshold,
                subconditions: n,
            });
        }
        Ok(())
    }

    fn cost(&self) -> Result<u64, ConditionError> {
        let mut costs = self
            .subconditions
            .iter()
            .map(CryptoCondition::cost)
            .collect::<Result<Vec<_>, _>>()?;
        costs.sort_unstable_by(|a, b| b.cmp(a));
        let worst_case = costs
            .iter()
            .take(self.threshold as usize)
            .try_fold(0u64, |total, cost| total.checked_add(*cost))
            .ok_or(ConditionError::CostOverflow)?;
        THRESHOLD_SUBCONDITION_COST
            .checked_mul(self.subconditions.len() as u64)
            .and_then(|overhead| worst_case.checked_add(overhead))
            .ok_or(ConditionError::CostOverflow)
    }

    fn subtypes(&self) -> Result<BTreeSet<ConditionType>, ConditionError> {
        let mut subtypes = BTreeSet::new();
        for sub in &self.subconditions {
            subtypes.insert(sub.condition_type()?);
            subtypes.extend(sub.subtypes()?);
        }
        // The validating side already understands our own type.
        subtypes.remove(&ConditionType::ThresholdSha256);
        Ok(subtypes)
    }

    fn fingerprint_contents(&self) -> Result<Vec<u8>, ConditionError> {
        self.check()?;
        let conditions = self
            .subconditions
            .iter()
            .map(|sub| sub.to_condition()?.serialize_binary())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(yasna::construct_der(|writer| {
            writer.write_sequence(|seq| {
                seq.next()
                    .write_tagged_implicit(context_tag(0), |w| w.write_u32(self.threshold));
                seq.next()
                    .write_tagged_implicit(context_tag(1), |w| write_der_set(w, &conditions));
            })
        }))
    }

    fn validate(&self, message: &[u8]) -> bool {
        let satisfied = self
            .subconditions
            .iter()
            .filter(|sub| sub.validate(message))
            .count();
        satisfied >= self.threshold as usize
    }

    fn serialize_fulfillment(&self) -> Result<Vec<u8>, ConditionError> {
        self.check()?;

        // Prefer the smallest complete subfulfillments; everything else is
        // sent as a condition.
        let mut fulfilled: Vec<(usize, Vec<u8>)> = self
            .subconditions
            .iter()
            .enumerate()
            .filter_map(|(i, sub)| sub.serialize_fulfillment().ok().map(|bytes| (i, bytes)))
            .collect();
        if fulfilled.len() < self.threshold as usize {
            return Err(ConditionError::ThresholdNotMet {
                threshold: self.threshold,
                available: fulfilled.len(),
            });
        }
        fulfilled.sort_by_key(|(i, bytes)| (bytes.len(), *i));
        fulfilled.truncate(self.threshold as usize);

        let chosen: BTreeSet<usize> = fulfilled.iter().map(|(i, _)| *i).collect();
        let conditions = self
            .subconditions
            .iter()
            .enumerate()
            .filter(|(i, _)| !chosen.contains(i))
            .map(|(_, sub)| sub.to_condition()?.serialize_binary())
            .collect::<Result<Vec<_>, _>>()?;
        let fulfillments: Vec<Vec<u8>> = fulfilled.into_iter().map(|(_, bytes)| bytes).collect();

        Ok(yasna::construct_der(|writer| {
            writer.write_tagged_implicit(context_tag(THRESHOLD_SHA256_TYPE_ID), |w| {
                w.write_sequence(|seq| {
                    seq.next()
                        .write_tagged_implicit(context_tag(0), |w| write_der_set(w, &fulfillments));
                    seq.next()
                        .write_tagged_implicit(context_tag(1), |w| write_der_set(w, &conditions));
                })
            })
        }))
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

impl Condition {
    /// The condition's type, if it is known and registered.
    pub fn condition_type(&self) -> Result<ConditionType, ConditionError> {
        let type_id = self.type_id.ok_or(ConditionError::MissingTypeId)?;
        ConditionType::from_type_id(type_id)
    }

    /// DER encoding of the condition.
    pub fn serialize_binary(&self) -> Result<Vec<u8>, ConditionError> {
        let condition_type = self.condition_type()?;
        let subtypes = condition_type
            .is_compound()
            .then(|| subtype_bits(&self.subtypes));
        Ok(yasna::construct_der(|writer| {
            writer.write_tagged_implicit(context_tag(condition_type.type_id()), |w| {
                w.write_sequence(|seq| {
                    seq.next()
                        .write_tagged_implicit(context_tag(0), |w| w.write_bytes(&self.hash));
                    seq.next().write_tagged_implicit(context_tag(1), |w| {
                        w.write_u64(self.max_fulfillment_length)
                    });
                    if let Some((bits, len)) = &subtypes {
                        seq.next().write_tagged_implicit(context_tag(2), |w| {
                            w.write_bitvec_bytes(bits, *len)
                        });
                    }
                })
            })
        }))
    }

    /// Parse a DER-encoded condition.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, ConditionError> {
        let condition_type = choice_type(bytes)?;
        let (hash, max_fulfillment_length, bits) = yasna::parse_der(bytes, |reader| {
            reader.read_tagged_implicit(context_tag(condition_type.type_id()), |r| {
                r.read_sequence(|seq| {
                    let hash = seq
                        .next()
                        .read_tagged_implicit(context_tag(0), |r| r.read_bytes())?;
                    let cost = seq
                        .next()
                        .read_tagged_implicit(context_tag(1), |r| r.read_u64())?;
                    // Only compound types carry (and must carry) subtypes.
                    let bits = if condition_type.is_compound() {
                        Some(
                            seq.next()
                                .read_tagged_implicit(context_tag(2), |r| r.read_bitvec_bytes())?,
                        )
                    } else {
                        None
                    };
                    Ok((hash, cost, bits))
                })
            })
        })?;
        let subtypes = match bits {
            Some((bytes, len)) => subtypes_from_bits(&bytes, len)?,
            None => BTreeSet::new(),
        };

        Ok(Self {
            type_id: Some(condition_type.type_id()),
            hash,
            max_fulfillment_length,
            subtypes,
        })
    }
}

// ---------------------------------------------------------------------------
// DER helpers
// ---------------------------------------------------------------------------

/// Context-specific tag `[n]`; every field and `CHOICE` alternative in the
/// condition formats is implicitly tagged this way.
fn context_tag(n: u8) -> Tag {
    Tag::context(u64::from(n))
}

/// Write already-encoded elements as a DER `SET OF` (sorted by encoding).
fn write_der_set(writer: DERWriter<'_>, elements: &[Vec<u8>]) {
    writer.write_set_of(|set| {
        for element in elements {
            set.next().write_der(element);
        }
    })
}

/// Read a `SET OF`, keeping each element's raw encoding.
fn read_der_set(reader: BERReader<'_, '_>) -> yasna::ASN1Result<Vec<Vec<u8>>> {
    let mut elements = Vec::new();
    reader.read_set_of(|r| {
        elements.push(r.read_der()?);
        Ok(())
    })?;
    Ok(elements)
}

/// Type of a `CHOICE` alternative, taken from its outer tag.
fn choice_type(bytes: &[u8]) -> Result<ConditionType, ConditionError> {
    let tag = yasna::parse_der(bytes, |reader| {
        let tag = reader.lookahead_tag()?;
        reader.read_der()?;
        Ok(tag)
    })?;
    if tag != Tag::context(tag.tag_number) {
        return Err(ConditionError::Der(format!(
            "expected a context-specific tag, found {tag:?}"
        )));
    }
    let type_id = u8::try_from(tag.tag_number)
        .map_err(|_| ConditionError::Der(format!("tag number {} out of range", tag.tag_number)))?;
    ConditionType::from_type_id(type_id)
}

/// Named-bit BIT STRING for a subtype set: bit `n` is type id `n`, trailing
/// zero bits dropped.
fn subtype_bits(subtypes: &BTreeSet<ConditionType>) -> (Vec<u8>, usize) {
    let Some(highest) = subtypes.iter().map(|t| t.type_id() as usize).max() else {
        return (Vec::new(), 0);
    };
    let mut bytes = vec![0u8; highest / 8 + 1];
    for t in subtypes {
        let bit = t.type_id() as usize;
        bytes[bit / 8] |= 0x80 >> (bit % 8);
    }
    (bytes, highest + 1)
}

fn subtypes_from_bits(bytes: &[u8], len: usize) -> Result<BTreeSet<ConditionType>, ConditionError> {
    (0..len.min(bytes.len() * 8))
        .filter(|bit| bytes[bit / 8] & (0x80 >> (bit % 8)) != 0)
        .map(|bit| {
            let type_id = u8::try_from(bit)
                .map_err(|_| ConditionError::Der(format!("subtype bit {bit} out of range")))?;
            ConditionType::from_type_id(type_id)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CryptoCondition
// ---------------------------------------------------------------------------

impl CryptoCondition {
    /// Whether this value is a fulfillment object (as opposed to a bare
    /// condition). Fulfillments derive their own condition; bare conditions
    /// can only be passed along.
    pub fn is_fulfillment(&self) -> bool {
        !matches!(self, Self::Condition(_))
    }

    pub fn condition_type(&self) -> Result<ConditionType, ConditionError> {
        match self {
            Self::Preimage(_) => Ok(ConditionType::PreimageSha256),
            Self::Threshold(_) => Ok(ConditionType::ThresholdSha256),
            Self::Ed25519(_) => Ok(ConditionType::Ed25519Sha256),
            Self::Condition(c) => c.condition_type(),
        }
    }

    /// Worst-case fulfillment cost.
    pub fn cost(&self) -> Result<u64, ConditionError> {
        match self {
            Self::Preimage(p) => Ok(p.preimage.len() as u64),
            Self::Threshold(t) => t.cost(),
            Self::Ed25519(_) => Ok(ED25519_COST),
            Self::Condition(c) => Ok(c.max_fulfillment_length),
        }
    }

    /// Types nested below this one.
    pub fn subtypes(&self) -> Result<BTreeSet<ConditionType>, ConditionError> {
        match self {
            Self::Threshold(t) => t.subtypes(),
            Self::Condition(c) => Ok(c.subtypes.clone()),
            Self::Preimage(_) | Self::Ed25519(_) => Ok(BTreeSet::new()),
        }
    }

    /// The 32-byte fingerprint the condition commits to.
    pub fn fingerprint(&self) -> Result<Vec<u8>, ConditionError> {
        match self {
            Self::Preimage(p) => Ok(sha256(&p.preimage).to_vec()),
            Self::Threshold(t) => Ok(sha256(&t.fingerprint_contents()?).to_vec()),
            Self::Ed25519(e) => {
                let contents = yasna::construct_der(|writer| {
                    writer.write_sequence(|seq| {
                        seq.next()
                            .write_tagged_implicit(context_tag(0), |w| w.write_bytes(&e.public_key))
                    })
                });
                Ok(sha256(&contents).to_vec())
            }
            Self::Condition(c) => Ok(c.hash.clone()),
        }
    }

    /// The bare condition this value corresponds to.
    pub fn to_condition(&self) -> Result<Condition, ConditionError> {
        if let Self::Condition(c) = self {
            c.condition_type()?;
            return Ok(c.clone());
        }
        Ok(Condition {
            type_id: Some(self.condition_type()?.type_id()),
            hash: self.fingerprint()?,
            max_fulfillment_length: self.cost()?,
            subtypes: self.subtypes()?,
        })
    }

    /// DER encoding of the fulfillment.
    ///
    /// Fails for bare conditions, unsigned Ed25519 values and thresholds
    /// with too few complete subfulfillments.
    pub fn serialize_fulfillment(&self) -> Result<Vec<u8>, ConditionError> {
        match self {
            Self::Preimage(p) => Ok(yasna::construct_der(|writer| {
                writer.write_tagged_implicit(context_tag(PREIMAGE_SHA256_TYPE_ID), |w| {
                    w.write_sequence(|seq| {
                        seq.next()
                            .write_tagged_implicit(context_tag(0), |w| w.write_bytes(&p.preimage))
                    })
                })
            })),
            Self::Ed25519(e) => {
                let signature = e.signature.ok_or(ConditionError::MissingSignature)?;
                Ok(yasna::construct_der(|writer| {
                    writer.write_tagged_implicit(context_tag(ED25519_SHA256_TYPE_ID), |w| {
                        w.write_sequence(|seq| {
                            seq.next()
                                .write_tagged_implicit(context_tag(0), |w| w.write_bytes(&e.public_key));
                            seq.next()
                                .write_tagged_implicit(context_tag(1), |w| w.write_bytes(&signature));
                        })
                    })
                }))
            }
            Self::Threshold(t) => t.serialize_fulfillment(),
            Self::Condition(_) => Err(ConditionError::NotAFulfillment),
        }
    }

    /// Parse a DER-encoded fulfillment.
    ///
    /// Thresholds may nest at most [`MAX_FULFILLMENT_DEPTH`] levels deep.
    pub fn from_fulfillment_binary(bytes: &[u8]) -> Result<Self, ConditionError> {
        Self::read_fulfillment(bytes, 0)
    }

    fn read_fulfillment(bytes: &[u8], depth: usize) -> Result<Self, ConditionError> {
        if depth > MAX_FULFILLMENT_DEPTH {
            return Err(ConditionError::Der(format!(
                "fulfillment nested deeper than {MAX_FULFILLMENT_DEPTH} levels"
            )));
        }
        let condition_type = choice_type(bytes)?;
        let tag = context_tag(condition_type.type_id());

        match condition_type {
            ConditionType::PreimageSha256 => {
                let preimage = yasna::parse_der(bytes, |reader| {
                    reader.read_tagged_implicit(tag, |r| {
                        r.read_sequence(|seq| {
                            seq.next()
                                .read_tagged_implicit(context_tag(0), |r| r.read_bytes())
                        })
                    })
                })?;
                Ok(Self::Preimage(PreimageSha256::new(preimage)))
            }
            ConditionType::Ed25519Sha256 => {
                let (public_key, signature) = yasna::parse_der(bytes, |reader| {
                    reader.read_tagged_implicit(tag, |r| {
                        r.read_sequence(|seq| {
                            let public_key = seq
                                .next()
                                .read_tagged_implicit(context_tag(0), |r| r.read_bytes())?;
                            let signature = seq
                                .next()
                                .read_tagged_implicit(context_tag(1), |r| r.read_bytes())?;
                            Ok((public_key, signature))
                        })
                    })
                })?;
                Ok(Self::Ed25519(Ed25519Sha256 {
                    public_key: fixed::<PUBLIC_KEY_LENGTH>(&public_key)?,
                    signature: Some(fixed::<SIGNATURE_LENGTH>(&signature)?),
                }))
            }
            ConditionType::ThresholdSha256 => {
                let (fulfillments, conditions) = yasna::parse_der(bytes, |reader| {
                    reader.read_tagged_implicit(tag, |r| {
                        r.read_sequence(|seq| {
                            let fulfillments =
                                seq.next().read_tagged_implicit(context_tag(0), read_der_set)?;
                            let conditions =
                                seq.next().read_tagged_implicit(context_tag(1), read_der_set)?;
                            Ok((fulfillments, conditions))
                        })
                    })
                })?;

                let mut subconditions = fulfillments
                    .iter()
                    .map(|f| Self::read_fulfillment(f, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                // Only the sent subfulfillments count towards the threshold.
                let threshold = u32::try_from(subconditions.len()).unwrap_or(u32::MAX);
                for condition in &conditions {
                    subconditions.push(Self::Condition(Condition::from_binary(condition)?));
                }
                Ok(Self::Threshold(ThresholdSha256::new(threshold, subconditions)?))
            }
            other => Err(ConditionError::UnsupportedType(other.name().to_string())),
        }
    }

    /// Check the fulfillment against `message`.
    ///
    /// Preimage fulfillments ignore the message; bare conditions never
    /// validate.
    pub fn validate(&self, message: &[u8]) -> bool {
        match self {
            Self::Preimage(_) => true,
            Self::Threshold(t) => t.validate(message),
            Self::Ed25519(e) => e.validate(message),
            Self::Condition(_) => false,
        }
    }

    /// Whether the tree reveals a preimage anywhere. Such a fulfillment
    /// proves knowledge of a secret, not a signature by any key.
    pub fn reveals_preimage(&self) -> bool {
        match self {
            Self::Preimage(_) => true,
            Self::Threshold(t) => t.subconditions.iter().any(Self::reveals_preimage),
            Self::Ed25519(_) | Self::Condition(_) => false,
        }
    }

    /// Every Ed25519 public key in the tree, in
    /// first-seen order without duplicates.
    pub fn ed25519_public_keys(&self) -> Vec<[u8; PUBLIC_KEY_LENGTH]> {
        let mut keys = Vec::new();
        self.collect_public_keys(&mut keys);
        keys
    }

    fn collect_public_keys(&self, keys: &mut Vec<[u8; PUBLIC_KEY_LENGTH]>) {
        match self {
            Self::Ed25519(e) => {
                if !keys.contains(&e.public_key) {
                    keys.push(e.public_key);
                }
            }
            Self::Threshold(t) => t
                .subconditions
                .iter()
                .for_each(|sub| sub.collect_public_keys(keys)),
            Self::Preimage(_) | Self::Condition(_) => {}
        }
    }
}

impl From<PreimageSha256> for CryptoCondition {
    fn from(value: PreimageSha256) -> Self {
        Self::Preimage(value)
    }
}

impl From<Ed25519Sha256> for CryptoCondition {
    fn from(value: Ed25519Sha256) -> Self {
        Self::Ed25519(value)
    }
}

impl From<ThresholdSha256> for CryptoCondition {
    fn from(value: ThresholdSha256) -> Self {
        Self::Threshold(value)
    }
}

impl From<Condition> for CryptoCondition {
    fn from(value: Condition) -> Self {
        Self::Condition(value)
    }
}

fn fixed<const N: usize>(content: &[u8]) -> Result<[u8; N], ConditionError> {
    content.try_into().map_err(|_| {
        ConditionError::Der(format!("expected {N} bytes, found {}", content.len()))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn ed(seed: u8) -> CryptoCondition {
        Ed25519Sha256::new(key(seed).verifying_key().to_bytes()).into()
    }

    #[test]
    fn type_ids_and_names_roundtrip() {
        for id in 0..=4u8 {
            let t = ConditionType::from_type_id(id).unwrap();
            assert_eq!(t.type_id(), id);
            assert_eq!(ConditionType::from_name(t.name()), Some(t));
        }
        assert!(ConditionType::from_type_id(5).is_err());
        assert_eq!(ConditionType::from_name("sha-512"), None);
    }

    #[test]
    fn ed25519_fingerprint_hashes_der_public_key() {
        let pk = key(1).verifying_key().to_bytes();
        let mut contents = vec![0x30, 0x22, 0x80, 0x20];
        contents.extend_from_slice(&pk);
        assert_eq!(ed(1).fingerprint().unwrap(), sha256(&contents).to_vec());
        assert_eq!(ed(1).cost().unwrap(), 131_072);
    }

    #[test]
    fn preimage_fingerprint_and_cost() {
        let p: CryptoCondition = PreimageSha256::new(b"secret".to_vec()).into();
        assert_eq!(p.fingerprint().unwrap(), sha256(b"secret").to_vec());
        assert_eq!(p.cost().unwrap(), 6);
    }

    #[test]
    fn threshold_cost_takes_largest_subcosts() {
        let preimage: CryptoCondition = PreimageSha256::new(vec![0u8; 10]).into();
        let t = ThresholdSha256::new(1, vec![ed(1), preimage]).unwrap();
        // max(131072, 10) + 2 * 1024
        assert_eq!(CryptoCondition::from(t).cost().unwrap(), 131_072 + 2_048);
    }

    #[test]
    fn threshold_subtypes_exclude_own_type() {
        let inner = ThresholdSha256::new(1, vec![ed(1)]).unwrap();
        let outer = ThresholdSha256::new(1, vec![inner.into(), PreimageSha256::new(b"x".to_vec()).into()])
            .unwrap();
        let subtypes = CryptoCondition::from(outer).subtypes().unwrap();
        assert_eq!(
            subtypes,
            BTreeSet::from([ConditionType::PreimageSha256, ConditionType::Ed25519Sha256])
        );
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        assert!(ThresholdSha256::new(0, vec![ed(1)]).is_err());
        assert!(ThresholdSha256::new(2, vec![ed(1)]).is_err());
        assert!(ThresholdSha256::new(1, vec![]).is_err());
    }

    #[test]
    fn condition_binary_roundtrip() {
        let t: CryptoCondition = ThresholdSha256::new(1, vec![ed(1), ed(2)]).unwrap().into();
        let condition = t.to_condition().unwrap();
        let bytes = condition.serialize_binary().unwrap();
        assert_eq!(bytes[0], 0xA2);
        assert_eq!(Condition::from_binary(&bytes).unwrap(), condition);
    }

    #[test]
    fn ed25519_fulfillment_layout() {
        let fulfillment: CryptoCondition = Ed25519Sha256::signed(b"msg", &key(1)).into();
        let bytes = fulfillment.serialize_fulfillment().unwrap();
        assert_eq!(&bytes[..4], &[0xA4, 0x64, 0x80, 0x20]);
        assert_eq!(bytes.len(), 102);
        assert_eq!(
            CryptoCondition::from_fulfillment_binary(&bytes).unwrap(),
            fulfillment
        );
    }

    #[test]
    fn unsigned_ed25519_has_no_fulfillment() {
        assert!(matches!(
            ed(1).serialize_fulfillment(),
            Err(ConditionError::MissingSignature)
        ));
    }

    #[test]
    fn ed25519_validates_only_its_message() {
        let fulfillment = Ed25519Sha256::signed(b"msg", &key(1));
        assert!(fulfillment.validate(b"msg"));
        assert!(!fulfillment.validate(b"other"));
        assert!(!Ed25519Sha256::new(fulfillment.public_key).validate(b"msg"));
    }

    #[test]
    fn threshold_fulfillment_sends_threshold_subfulfillments() {
        let a = Ed25519Sha256::signed(b"msg", &key(1));
        let b = Ed25519Sha256::signed(b"msg", &key(2));
        let c = ed(3);
        let t: CryptoCondition =
            ThresholdSha256::new(2, vec![a.into(), b.into(), c]).unwrap().into();

        let bytes = t.serialize_fulfillment().unwrap();
        let parsed = CryptoCondition::from_fulfillment_binary(&bytes).unwrap();
        let CryptoCondition::Threshold(parsed_t) = &parsed else {
            panic!("expected threshold, got {:?}", parsed);
        };
        assert_eq!(parsed_t.threshold, 2);
        assert_eq!(parsed_t.subconditions.len(), 3);
        assert_eq!(
            parsed_t.subconditions.iter().filter(|s| s.is_fulfillment()).count(),
            2
        );
        // Same condition either way.
        assert_eq!(parsed.to_condition().unwrap(), t.to_condition().unwrap());
        assert!(parsed.validate(b"msg"));
        assert!(!parsed.validate(b"other"));
    }

    #[test]
    fn threshold_without_enough_signatures_fails() {
        let a = Ed25519Sha256::signed(b"msg", &key(1));
        let t: CryptoCondition = ThresholdSha256::new(2, vec![a.into(), ed(2)]).unwrap().into();
        assert!(matches!(
            t.serialize_fulfillment(),
            Err(ConditionError::ThresholdNotMet {
                threshold: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn bare_condition_never_validates() {
        let c = ed(1).to_condition().unwrap();
        let bare = CryptoCondition::from(c);
        assert!(!bare.is_fulfillment());
        assert!(!bare.validate(b"anything"));
        assert!(matches!(
            bare.serialize_fulfillment(),
            Err(ConditionError::NotAFulfillment)
        ));
    }

    #[test]
    fn preimages_are_found_at_any_depth() {
        let preimage: CryptoCondition = PreimageSha256::new(b"x".to_vec()).into();
        let inner = ThresholdSha256::new(1, vec![ed(1), preimage.clone()]).unwrap();
        let outer: CryptoCondition = ThresholdSha256::new(1, vec![ed(2), inner.into()])
            .unwrap()
            .into();
        assert!(preimage.reveals_preimage());
        assert!(outer.reveals_preimage());
        assert!(!ed(1).reveals_preimage());
    }

    #[test]
    fn public_keys_are_first_seen_and_unique() {
        let inner = ThresholdSha256::new(1, vec![ed(2), ed(1)]).unwrap();
        let t: CryptoCondition =
            ThresholdSha256::new(2, vec![ed(1), inner.into(), ed(2)]).unwrap().into();
        let keys = t.ed25519_public_keys();
        assert_eq!(
            keys,
            vec![
                key(1).verifying_key().to_bytes(),
                key(2).verifying_key().to_bytes()
            ]
        );
    }

    #[test]
    fn threshold_cost_overflow_is_an_error() {
        let huge: CryptoCondition = Condition {
            type_id: Some(PREIMAGE_SHA256_TYPE_ID),
            hash: vec![0u8; 32],
            max_fulfillment_length: u64::MAX,
            subtypes: BTreeSet::new(),
        }
        .into();
        let small: CryptoCondition = PreimageSha256::new(vec![0u8; 5]).into();
        let t: CryptoCondition = ThresholdSha256::new(2, vec![huge, small]).unwrap().into();
        assert!(matches!(t.cost(), Err(ConditionError::CostOverflow)));
        assert!(matches!(t.to_condition(), Err(ConditionError::CostOverflow)));
    }

    #[test]
    fn compound_condition_encodes_subtypes_as_named_bits() {
        let t: CryptoCondition =
            ThresholdSha256::new(1, vec![ed(1), PreimageSha256::new(b"x".to_vec()).into()])
                .unwrap()
                .into();
        let bytes = t.to_condition().unwrap().serialize_binary().unwrap();
        // [2] BIT STRING, 3 unused bits: preimage (bit 0) and ed25519 (bit 4).
        assert!(bytes.ends_with(&[0x82, 0x02, 0x03, 0x88]));
    }

    fn nested(levels: usize) -> CryptoCondition {
        (0..levels).fold(
            CryptoCondition::from(Ed25519Sha256::signed(b"msg", &key(1))),
            |inner, _| ThresholdSha256::new(1, vec![inner]).unwrap().into(),
        )
    }

    #[test]
    fn fulfillment_nesting_is_bounded() {
        let deepest_allowed = nested(MAX_FULFILLMENT_DEPTH).serialize_fulfillment().unwrap();
        let parsed = CryptoCondition::from_fulfillment_binary(&deepest_allowed).unwrap();
        assert!(parsed.validate(b"msg"));

        let too_deep = nested(MAX_FULFILLMENT_DEPTH + 1).serialize_fulfillment().unwrap();
        assert!(matches!(
            CryptoCondition::from_fulfillment_binary(&too_deep),
            Err(ConditionError::Der(_))
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let fulfillment: CryptoCondition = Ed25519Sha256::signed(b"msg", &key(1)).into();
        let mut bytes = fulfillment.serialize_fulfillment().unwrap();
        bytes.push(0);
        assert!(CryptoCondition::from_fulfillment_binary(&bytes).is_err());
        assert!(CryptoCondition::from_fulfillment_binary(&[]).is_err());
    }

    #[test]
    fn condition_without_type_id_has_no_binary_form() {
        let c = Condition {
            type_id: None,
            hash: vec![0u8; 32],
            max_fulfillment_length: 1,
            subtypes: BTreeSet::new(),
        };
        assert!(matches!(
            c.serialize_binary(),
            Err(ConditionError::MissingTypeId)
        ));
    }
}
