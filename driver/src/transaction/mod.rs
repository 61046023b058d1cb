// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Transaction Module
//!
//! Construction, canonical serialization, signing and verification of
//! ledger transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        Transaction, Input, Output, Asset and friends (wire shapes)
//! canonical.rs    key-sorted compact JSON, the bytes ids and signatures cover
//! builder.rs      free functions assembling unsigned CREATE/TRANSFER transactions
//! signing.rs      per-input Ed25519 fulfillments and the content-derived id
//! verification.rs re-deriving and checking what the signer produced
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`make_create_transaction`] or [`make_transfer_transaction`],
//!    with outputs from [`make_output`].
//! 2. **Sign**: [`sign_transaction`] returns a signed copy; the unsigned
//!    value is left as it was.
//! 3. **Verify**: [`verify_transaction`] before handing it to a transport.
//!
//! ## Design Decisions
//!
//! - Transaction ids are the SHA3-256 of the canonical JSON of the signed
//!   transaction, taken with `id` null.
//! - Amounts are decimal strings; no float ever touches them.
//! - A TRANSFER's asset link always names the original CREATE, however
//!   many transfers sit in between.

pub mod builder;
pub mod canonical;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{
    ed25519_condition, make_create_transaction, make_ed25519_condition, make_input_template,
    make_output, make_sha256_condition, make_threshold_condition, make_transaction,
    make_transfer_transaction, sha256_condition, threshold_condition,
};
pub use canonical::{canonical_json, serialize_transaction_into_canonical_string};
pub use signing::{compute_transaction_id, sign_transaction};
pub use types::{
    Asset, AssetDefinition, AssetLink, Input, Operation, Output, Transaction, TransactionLink,
    UnspentOutput,
};
pub use verification::{verify_transaction, TransactionError};
