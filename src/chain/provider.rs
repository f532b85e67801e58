//! `ChainClient` over an alloy provider.

use crate::chain::ChainClient;
use crate::error::{classify_node_error, PredictionError, Result};

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay between receipt lookups. BSC produces a block every ~3s.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Chain connection backed by an alloy provider (HTTP or WebSocket).
#[derive(Clone)]
pub struct AlloyChain {
    provider: DynProvider,
    poll_interval: Duration,
}

impl AlloyChain {
    /// Wrap an already-built provider.
    pub fn new(provider: DynProvider) -> Self {
        Self {
            provider,
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }

    /// Connect to an RPC endpoint. Accepts `http(s)://` and `ws(s)://` URLs.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(map_transport_error)?;

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(map_transport_error)?;
        info!(url = %rpc_url, chain_id = chain_id, "connected to RPC");

        Ok(Self::new(provider.erased()))
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

#[async_trait]
impl ChainClient for AlloyChain {
    type Receipt = TransactionReceipt;

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        self.provider.call(tx).await.map_err(map_transport_error)
    }

    async fn send_transaction(
        &self,
        signer: &PrivateKeySigner,
        tx: TransactionRequest,
    ) -> Result<TxHash> {
        let from = signer.address();
        let tx = tx.with_from(from);

        // Nodes accept reverting transactions and only fail them on-chain,
        // so run the call first to surface the revert reason here.
        self.provider
            .call(tx.clone())
            .await
            .map_err(map_transport_error)?;

        let nonce = self
            .provider
            .get_transaction_count(from)
            .await
            .map_err(map_transport_error)?;
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(map_transport_error)?;

        let tx = tx.with_nonce(nonce).with_chain_id(chain_id);

        let wallet = EthereumWallet::from(signer.clone());
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| PredictionError::Rpc(format!("failed to sign transaction: {e}")))?;

        let pending = self
            .provider
            .send_tx_envelope(envelope)
            .await
            .map_err(map_transport_error)?;

        let hash = *pending.tx_hash();
        debug!(tx = %hash, nonce = nonce, from = %from, "transaction broadcast");
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(map_transport_error)?;

            if let Some(receipt) = receipt {
                if !receipt.status() {
                    warn!(tx = %hash, block = ?receipt.block_number, "transaction reverted on-chain");
                }
                debug!(
                    tx = %hash,
                    block = ?receipt.block_number,
                    status = receipt.status(),
                    "transaction confirmed"
                );
                return Ok(receipt);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Turn an alloy transport error into a classified error. JSON-RPC error
/// responses carry the node's message (reverts, balance failures); anything
/// else is a transport failure.
fn map_transport_error(err: TransportError) -> PredictionError {
    match err.as_error_resp() {
        Some(payload) => classify_node_error(&payload.message),
        None => PredictionError::Rpc(err.to_string()),
    }
}
