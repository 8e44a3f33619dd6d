use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::{TransactionReceipt, TransactionRequest, TxHash, U64};
use log::{debug, info};
use std::sync::Arc;

use crate::model::BotError;

/// Submits a transaction through the connected signer and blocks until the
/// network reports it mined.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit_and_confirm(&self, tx: TransactionRequest) -> Result<TxHash>;
}

pub struct EthereumSubmitter<M> {
    client: Arc<M>,
}

impl<M: Middleware + 'static> EthereumSubmitter<M> {
    pub fn new(client: Arc<M>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<M: Middleware + 'static> TransactionSubmitter for EthereumSubmitter<M> {
    async fn submit_and_confirm(&self, tx: TransactionRequest) -> Result<TxHash> {
        debug!("Submitting transaction: {:?}", tx);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| anyhow!("Failed to send transaction: {}", e))?;

        let tx_hash = *pending;
        info!("Transaction {:#x} submitted, waiting for inclusion", tx_hash);

        let receipt = pending
            .await
            .map_err(|e| anyhow!("Failed while waiting for transaction {:#x}: {}", tx_hash, e))?;

        confirm_receipt(receipt, tx_hash)
    }
}

/// A missing receipt means the transaction fell out of the mempool; a receipt
/// without status 1 means it reverted.
pub(crate) fn confirm_receipt(
    receipt: Option<TransactionReceipt>,
    tx_hash: TxHash,
) -> Result<TxHash> {
    let receipt = receipt.ok_or(BotError::TransactionDropped(tx_hash))?;

    if receipt.status != Some(U64::from(1u64)) {
        return Err(BotError::TransactionReverted(receipt.transaction_hash).into());
    }

    info!(
        "Transaction {:#x} was mined successfully",
        receipt.transaction_hash
    );

    Ok(receipt.transaction_hash)
}
