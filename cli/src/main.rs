// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ledger-tx
//!
//! Entry point for the `ledger-tx` binary. Parses CLI arguments, initializes
//! logging, and runs one driver operation per invocation:
//!
//! - `keygen`    generate a base58 Ed25519 keypair
//! - `create`    build an unsigned CREATE
//! - `transfer`  build an unsigned TRANSFER
//! - `sign`      sign a transaction
//! - `verify`    verify a signed transaction
//! - `canonical` print the canonical serialization
//! - `version`   print build version information
//!
//! Transactions are read from files (or stdin with `-`) and written to
//! stdout as JSON, so commands compose with pipes:
//!
//! ```text
//! ledger-tx create --issuer $PK | ledger-tx sign --tx - | ledger-tx verify --tx -
//! ```

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use zeroize::Zeroizing;

use ledger_driver::crypto::keys::Ed25519Keypair;
use ledger_driver::transaction::{
    make_create_transaction, make_ed25519_condition, make_output, make_transfer_transaction,
    serialize_transaction_into_canonical_string, sign_transaction, verify_transaction, Output,
    Transaction, UnspentOutput,
};

use cli::{Commands, LedgerCli};

fn main() -> Result<()> {
    let cli = LedgerCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Create(args) => create(args),
        Commands::Transfer(args) => transfer(args),
        Commands::Sign(args) => sign(args),
        Commands::Verify(args) => verify(args),
        Commands::Canonical(args) => canonical(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let keypair = match args.seed {
        Some(seed) => {
            let bytes = hex::decode(seed.trim()).context("seed is not valid hex")?;
            let seed: [u8; 32] = bytes
                .as_slice()
                .try_into()
                .with_context(|| format!("seed must be 32 bytes, got {}", bytes.len()))?;
            Ed25519Keypair::from_seed(&seed)
        }
        None => Ed25519Keypair::generate(),
    };
    tracing::info!(public_key = %keypair.public_key(), "keypair generated");

    print_json(&json!({
        "public_key": keypair.public_key(),
        "private_key": keypair.private_key().as_str(),
    }))
}

fn create(args: cli::CreateArgs) -> Result<()> {
    let recipients = if args.recipients.is_empty() {
        args.issuers[..1].to_vec()
    } else {
        args.recipients
    };
    let outputs = make_outputs(&recipients, &args.amount)?;
    let asset = parse_optional_json("asset", args.asset.as_deref())?;
    let metadata = parse_optional_json("metadata", args.metadata.as_deref())?;

    let tx = make_create_transaction(asset, metadata, outputs, &args.issuers);
    print_json(&tx)
}

fn transfer(args: cli::TransferArgs) -> Result<()> {
    let spent = read_transaction(&args.tx)?;
    let unspent: Vec<UnspentOutput<'_>> = args
        .output_indices
        .iter()
        .map(|&index| UnspentOutput::new(&spent, index))
        .collect();
    let outputs = make_outputs(&args.recipients, &args.amount)?;
    let metadata = parse_optional_json("metadata", args.metadata.as_deref())?;

    let tx = make_transfer_transaction(&unspent, outputs, metadata)?;
    print_json(&tx)
}

fn sign(args: cli::SignArgs) -> Result<()> {
    let private_keys = zeroizing_keys(args.private_keys);
    let tx = read_transaction(&args.tx)?;
    if private_keys.len() != tx.inputs.len() {
        tracing::warn!(
            keys = private_keys.len(),
            inputs = tx.inputs.len(),
            "key count does not match input count"
        );
    }
    let keys: Vec<&str> = private_keys.iter().map(|key| key.as_str()).collect();
    let signed = sign_transaction(&tx, &keys)?;
    print_json(&signed)
}

fn verify(args: cli::TxArgs) -> Result<()> {
    let tx = read_transaction(&args.tx)?;
    verify_transaction(&tx).context("transaction does not verify")?;
    print_json(&json!({ "valid": true, "id": tx.id }))
}

fn canonical(args: cli::TxArgs) -> Result<()> {
    let tx = read_transaction(&args.tx)?;
    println!("{}", serialize_transaction_into_canonical_string(&tx)?);
    Ok(())
}

/// Prints version and wire-format information.
fn print_version() {
    println!("ledger-tx {}", env!("CARGO_PKG_VERSION"));
    println!(
        "transaction version: {}",
        ledger_driver::config::TRANSACTION_VERSION
    );
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_outputs(recipients: &[String], amount: &str) -> Result<Vec<Output>> {
    recipients
        .iter()
        .map(|recipient| {
            let condition = make_ed25519_condition(recipient)
                .with_context(|| format!("invalid recipient key {recipient}"))?;
            Ok(make_output(condition, Some(amount))?)
        })
        .collect()
}

/// Move key text into buffers that are wiped on drop.
fn zeroizing_keys(keys: Vec<String>) -> Vec<Zeroizing<String>> {
    keys.into_iter().map(Zeroizing::new).collect()
}

fn parse_optional_json(field: &str, text: Option<&str>) -> Result<Option<Value>> {
    text.map(|t| serde_json::from_str(t).with_context(|| format!("--{field} is not valid JSON")))
        .transpose()
}

fn read_transaction(path: &Path) -> Result<Transaction> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read transaction from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    if text.trim().is_empty() {
        bail!("no transaction given");
    }
    serde_json::from_str(&text).context("input is not a transaction")
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
