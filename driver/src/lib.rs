// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Driver: Core Library
//!
//! Builds, signs and verifies transactions for a BigchainDB-style asset
//! ledger. Assets are created by a CREATE transaction and moved by
//! TRANSFERs; every output is locked by a crypto-condition and every input
//! unlocks one with a fulfillment.
//!
//! ## Architecture
//!
//! - **crypto**: SHA3-256 / SHA-256 digests and base58 Ed25519 keys.
//! - **condition**: crypto-conditions (Ed25519, preimage, threshold), their
//!   DER and URI encodings, and the JSON details codec.
//! - **transaction**: wire types, canonical JSON, builders, the signer and
//!   the verifier.
//! - **transport**: the seam a network client plugs into to submit
//!   verified transactions.
//! - **config**: wire constants.
//!
//! ## Quick tour
//!
//! ```
//! use ledger_driver::crypto::Ed25519Keypair;
//! use ledger_driver::transaction::{
//!     make_create_transaction, make_ed25519_condition, make_output, sign_transaction,
//!     verify_transaction,
//! };
//! use serde_json::json;
//!
//! let alice = Ed25519Keypair::generate();
//! let output = make_output(make_ed25519_condition(&alice.public_key())?, None)?;
//! let tx = make_create_transaction(
//!     Some(json!({ "bicycle": { "serial": "abc" } })),
//!     None,
//!     vec![output],
//!     &[alice.public_key()],
//! );
//! let signed = sign_transaction(&tx, &[alice.private_key().as_str()])?;
//! verify_transaction(&signed)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Everything that feeds a hash is deterministic: sorted keys, text
//!    amounts, no clocks.
//! 2. Signing never mutates its input and never returns half a result.
//! 3. Private keys are zeroized and never logged.

pub mod condition;
pub mod config;
pub mod crypto;
pub mod transaction;
pub mod transport;
