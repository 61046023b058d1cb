// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Protocol Configuration & Constants
//!
//! Every magic number the driver depends on lives here. The values below are
//! part of the wire contract shared with the ledger servers and every other
//! client: change one and your transactions stop validating anywhere else.

// ---------------------------------------------------------------------------
// Transaction Format
// ---------------------------------------------------------------------------

/// Transaction format version stamped on every transaction we build.
pub const TRANSACTION_VERSION: &str = "2.0";

/// Operation name for transactions that originate a new asset.
pub const OPERATION_CREATE: &str = "CREATE";

/// Operation name for transactions that move an existing asset.
pub const OPERATION_TRANSFER: &str = "TRANSFER";

/// Amount used by [`crate::transaction::builder::make_output`] when the
/// caller does not pass one. Amounts travel as decimal text so that large
/// values never go anywhere near a float.
pub const DEFAULT_OUTPUT_AMOUNT: &str = "1";

// ---------------------------------------------------------------------------
// Key Material
// ---------------------------------------------------------------------------

/// Ed25519 private key (seed) length in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Digest length of both SHA-256 (fingerprints) and SHA3-256 (ids, payloads).
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Crypto-conditions
// ---------------------------------------------------------------------------

/// Type id of `preimage-sha-256`.
pub const PREIMAGE_SHA256_TYPE_ID: u8 = 0;

/// Type id of `prefix-sha-256`. Recognised in subtype sets only.
pub const PREFIX_SHA256_TYPE_ID: u8 = 1;

/// Type id of `threshold-sha-256`.
pub const THRESHOLD_SHA256_TYPE_ID: u8 = 2;

/// Type id of `rsa-sha-256`. Recognised in subtype sets only.
pub const RSA_SHA256_TYPE_ID: u8 = 3;

/// Type id of `ed25519-sha-256`.
pub const ED25519_SHA256_TYPE_ID: u8 = 4;

pub const PREIMAGE_SHA256_NAME: &str = "preimage-sha-256";
pub const PREFIX_SHA256_NAME: &str = "prefix-sha-256";
pub const THRESHOLD_SHA256_NAME: &str = "threshold-sha-256";
pub const RSA_SHA256_NAME: &str = "rsa-sha-256";
pub const ED25519_SHA256_NAME: &str = "ed25519-sha-256";

/// `details.type` written for bare conditions (no fulfillment data).
pub const BARE_CONDITION_NAME: &str = "condition";

/// `details.type` written for preimage conditions that carry their preimage.
pub const PREIMAGE_FULFILLMENT_NAME: &str = "fulfillment";

/// Legacy feature bitmask written next to `type_id` for preimage details.
pub const PREIMAGE_BITMASK: u32 = 3;

/// Fixed cost of an Ed25519 fulfillment.
pub const ED25519_COST: u64 = 131_072;

/// Per-subcondition overhead added to a threshold's cost.
pub const THRESHOLD_SUBCONDITION_COST: u64 = 1_024;

/// Largest threshold the DER encoding allows (`INTEGER (1..65535)`).
pub const MAX_THRESHOLD: u32 = 65_535;

/// Deepest threshold nesting accepted when parsing a fulfillment.
pub const MAX_FULFILLMENT_DEPTH: usize = 32;

/// Scheme and hash prefix of every condition URI.
pub const CONDITION_URI_PREFIX: &str = "ni:///sha-256;";

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Path (relative to the API root) transactions are posted to.
pub const TRANSACTIONS_PATH: &str = "transactions";
