// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Transport seam
//!
//! The driver does not speak HTTP itself. Whatever carries transactions to
//! a ledger node implements [`Transport`]; [`submit_transaction`] is the
//! one place signed transactions leave the crate, and it refuses anything
//! that does not pass [`verify_transaction`] first.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::TRANSACTIONS_PATH;
use crate::transaction::{verify_transaction, Transaction, TransactionError};

/// How long the node should hold the request before answering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    /// Answer once the transaction is accepted for processing.
    #[default]
    Async,
    /// Answer once the transaction has been checked.
    Sync,
    /// Answer once the transaction is committed to a block.
    Commit,
}

impl CommitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Async => "async",
            Self::Sync => "sync",
            Self::Commit => "commit",
        }
    }

    /// Request path for posting a transaction in this mode.
    pub fn path(self) -> String {
        format!("{TRANSACTIONS_PATH}?mode={}", self.as_str())
    }
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// The transaction did not verify and was never sent.
    #[error("refusing to submit: {0}")]
    Refused(#[from] TransactionError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The collaborator could not deliver the transaction or the node said no.
    #[error("transport failed{}: {message}", status_suffix(.status))]
    Failed { status: Option<u16>, message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

/// Something that can post a transaction body to a ledger node.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `body` to `path` (relative to the API root) and return the
    /// node's JSON response.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

/// What the node said about a submitted transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    pub transaction_id: String,
    pub mode: CommitMode,
    pub response: Value,
}

/// Verify `tx` and post it through `transport`.
pub async fn submit_transaction<T: Transport + ?Sized>(
    transport: &T,
    tx: &Transaction,
    mode: CommitMode,
) -> Result<SubmitResult, TransportError> {
    if let Err(err) = verify_transaction(tx) {
        warn!(error = %err, "transaction failed verification, not submitting");
        return Err(err.into());
    }
    // verify_transaction rejects a missing id, so this is always set.
    let transaction_id = tx.id.clone().unwrap_or_default();

    let body = serde_json::to_value(tx)?;
    let response = transport.post(&mode.path(), &body).await?;
    info!(id = %transaction_id, %mode, "transaction submitted");

    Ok(SubmitResult {
        transaction_id,
        mode,
        response,
    })
}
