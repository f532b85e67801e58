//! PancakeSwap Prediction adapter.

use super::abi::IPancakePrediction;
use super::{
    epochs_to_u256, to_u64, ClaimOutcome, ContractBinding, Epoch, Platform, PredictionClient,
    TxSettings,
};
use crate::chain::ChainClient;
use crate::error::Result;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Adapter for PancakeSwap Prediction.
///
/// Bets take only the epoch; the referral address is not used. Claims are
/// batched into one `claim` call and the adapter waits for the receipt.
pub struct PancakeSwap<C> {
    binding: ContractBinding<C>,
}

impl<C: ChainClient> PancakeSwap<C> {
    pub fn new(
        chain: Arc<C>,
        contract: Address,
        private_key: &str,
        settings: TxSettings,
    ) -> Result<Self> {
        let binding = ContractBinding::new(chain, contract, private_key, settings)?;
        info!(
            contract = %contract,
            address = %binding.address(),
            "PancakeSwap adapter ready"
        );
        Ok(Self { binding })
    }

    /// Adapter bound to the mainnet BNB/USD prediction contract.
    pub fn mainnet(chain: Arc<C>, private_key: &str, settings: TxSettings) -> Result<Self> {
        Self::new(chain, super::abi::PANCAKESWAP_ADDRESS, private_key, settings)
    }

    pub fn contract(&self) -> Address {
        self.binding.contract()
    }
}

impl<C> fmt::Debug for PancakeSwap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PancakeSwap").field("binding", &self.binding).finish()
    }
}

#[async_trait]
impl<C: ChainClient> PredictionClient for PancakeSwap<C> {
    type Receipt = C::Receipt;

    fn platform(&self) -> Platform {
        Platform::PancakeSwap
    }

    fn address(&self) -> Address {
        self.binding.address()
    }

    fn claim_window(&self) -> u64 {
        self.binding.settings().claim_window
    }

    async fn is_paused(&self) -> Result<bool> {
        self.binding.read(IPancakePrediction::pausedCall {}).await
    }

    async fn current_epoch(&self) -> Result<Epoch> {
        let epoch = self
            .binding
            .read(IPancakePrediction::currentEpochCall {})
            .await?;
        to_u64(epoch, "epoch")
    }

    async fn user_rounds_count(&self, user: Address) -> Result<u64> {
        let count = self
            .binding
            .read(IPancakePrediction::getUserRoundsLengthCall { user })
            .await?;
        to_u64(count, "rounds count")
    }

    async fn bet_bull(&self, epoch: Epoch, amount: U256) -> Result<TxHash> {
        let call = IPancakePrediction::betBullCall {
            epoch: U256::from(epoch),
        };
        let hash = self.binding.submit(call, amount).await?;
        info!(platform = "pancakeswap", epoch = epoch, amount = %amount, tx = %hash, "bull bet submitted");
        Ok(hash)
    }

    async fn bet_bear(&self, epoch: Epoch, amount: U256) -> Result<TxHash> {
        let call = IPancakePrediction::betBearCall {
            epoch: U256::from(epoch),
        };
        let hash = self.binding.submit(call, amount).await?;
        info!(platform = "pancakeswap", epoch = epoch, amount = %amount, tx = %hash, "bear bet submitted");
        Ok(hash)
    }

    async fn claimable(&self, epoch: Epoch, user: Address) -> Result<bool> {
        self.binding
            .read(IPancakePrediction::claimableCall {
                epoch: U256::from(epoch),
                user,
            })
            .await
    }

    async fn user_claim(&self) -> Result<Option<ClaimOutcome<C::Receipt>>> {
        let epochs = self.fetch_claimable(self.claim_window()).await?;
        if epochs.is_empty() {
            return Ok(None);
        }

        let call = IPancakePrediction::claimCall {
            epochs: epochs_to_u256(&epochs),
        };
        let hash = self.binding.submit(call, U256::ZERO).await?;
        info!(platform = "pancakeswap", epochs = ?epochs, tx = %hash, "claim submitted, awaiting receipt");

        let receipt = self.binding.chain().wait_for_receipt(hash).await?;
        Ok(Some(ClaimOutcome::Confirmed(receipt)))
    }
}
