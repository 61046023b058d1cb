// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # CLI Interface
//!
//! Command-line structure for `ledger-tx`, via `clap` derive. Every command
//! prints JSON (or, for `canonical`, the canonical string) on stdout.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Build, sign and verify asset-ledger transactions.
#[derive(Parser, Debug)]
#[command(
    name = "ledger-tx",
    about = "Build, sign and verify asset-ledger transactions",
    version,
    propagate_version = true
)]
pub struct LedgerCli {
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "LEDGER_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format (logs go to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an Ed25519 keypair (base58 public and private key).
    Keygen(KeygenArgs),
    /// Build an unsigned CREATE transaction.
    Create(CreateArgs),
    /// Build an unsigned TRANSFER spending outputs of a signed transaction.
    Transfer(TransferArgs),
    /// Sign a transaction, one private key per input in input order.
    Sign(SignArgs),
    /// Verify a signed transaction's id and fulfillments.
    Verify(TxArgs),
    /// Print a transaction's canonical serialization.
    Canonical(TxArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// 32-byte hex seed for a deterministic keypair.
    #[arg(long)]
    pub seed: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Base58 public key of an issuer. Repeat for several issuers; signing
    /// keys must later be given in the same order.
    #[arg(long = "issuer", required = true)]
    pub issuers: Vec<String>,

    /// Base58 public key receiving an output. Defaults to the first issuer.
    #[arg(long = "to")]
    pub recipients: Vec<String>,

    /// Amount of each output, as decimal text.
    #[arg(long, default_value = "1")]
    pub amount: String,

    /// Asset data as JSON.
    #[arg(long)]
    pub asset: Option<String>,

    /// Transaction metadata as JSON.
    #[arg(long)]
    pub metadata: Option<String>,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Signed transaction holding the outputs to spend (`-` for stdin).
    #[arg(long)]
    pub tx: PathBuf,

    /// Index of an output to spend. Repeatable.
    #[arg(long = "output-index", required = true)]
    pub output_indices: Vec<usize>,

    /// Base58 public key receiving an output. Repeatable.
    #[arg(long = "to", required = true)]
    pub recipients: Vec<String>,

    /// Amount of each output, as decimal text.
    #[arg(long, default_value = "1")]
    pub amount: String,

    /// Transaction metadata as JSON.
    #[arg(long)]
    pub metadata: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Transaction to sign (`-` for stdin).
    #[arg(long)]
    pub tx: PathBuf,

    /// Base58 private key, one per input. Comma-separated in the
    /// environment variable.
    ///
    /// Prefer the environment variable over the flag so keys stay out of
    /// shell history. Keys are moved into `Zeroizing` buffers before use.
    #[arg(
        long = "private-key",
        env = "LEDGER_PRIVATE_KEY",
        value_delimiter = ',',
        required = true,
        hide_env_values = true
    )]
    pub private_keys: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TxArgs {
    /// Transaction file (`-` for stdin).
    #[arg(long)]
    pub tx: PathBuf,
}
