//! Chain connection seam.
//!
//! Adapters never talk to a node directly. Everything they need from the
//! chain (read calls, signed submission, receipt waiting) goes through
//! [`ChainClient`], which keeps transport and signing in one place:
//! - `AlloyChain`: production implementation over an alloy provider
//! - `mock::MockChain`: in-memory contract simulator used by the tests
//!
//! A single client may be shared by several adapters through `Arc`. No
//! locking or nonce coordination is done here; callers sharing one signer
//! across adapters must serialise their own submissions.

pub mod provider;

#[cfg(test)]
pub mod mock;

pub use provider::AlloyChain;

use crate::error::Result;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Receipt returned once a submitted transaction is mined.
    type Receipt: std::fmt::Debug + Send + Sync;

    /// Execute a read-only `eth_call` against `to` and return the raw
    /// return data.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;

    /// Fill nonce and chain id, sign `tx` with `signer` and broadcast it.
    ///
    /// Returns as soon as the node accepts the transaction; inclusion is
    /// not awaited.
    async fn send_transaction(
        &self,
        signer: &PrivateKeySigner,
        tx: TransactionRequest,
    ) -> Result<TxHash>;

    /// Block until `hash` is mined and return its receipt.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Self::Receipt>;
}
