//! DogeBets adapter.
//!
//! Bets carry the referral address as a second argument. Claims are
//! batched into one `user_Claim` call and the adapter waits for the
//! receipt before returning.

use super::abi::IDogeBets;
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

pub struct DogeBets<C> {
    binding: ContractBinding<C>,
}

impl<C: ChainClient> DogeBets<C> {
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
            "DogeBets adapter ready"
        );
        Ok(Self { binding })
    }
}

impl<C> fmt::Debug for DogeBets<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DogeBets").field("binding", &self.binding).finish()
    }
}

#[async_trait]
impl<C: ChainClient> PredictionClient for DogeBets<C> {
    type Receipt = C::Receipt;

    fn platform(&self) -> Platform {
        Platform::DogeBets
    }

    fn address(&self) -> Address {
        self.binding.address()
    }

    fn claim_window(&self) -> u64 {
        self.binding.settings().claim_window
    }

    async fn is_paused(&self) -> Result<bool> {
        self.binding.read(IDogeBets::IsPausedCall {}).await
    }

    async fn current_epoch(&self) -> Result<Epoch> {
        let epoch = self.binding.read(IDogeBets::currentEpochCall {}).await?;
        to_u64(epoch, "epoch")
    }

    async fn user_rounds_count(&self, user: Address) -> Result<u64> {
        let count = self
            .binding
            .read(IDogeBets::GetUserRoundsLengthCall { user })
            .await?;
        to_u64(count, "rounds count")
    }

    async fn bet_bull(&self, epoch: Epoch, amount: U256) -> Result<TxHash> {
        let call = IDogeBets::user_BetBullCall {
            epoch: U256::from(epoch),
            referrer: self.binding.settings().referral,
        };
        let hash = self.binding.submit(call, amount).await?;
        info!(platform = "dogebets", epoch = epoch, amount = %amount, tx = %hash, "bull bet submitted");
        Ok(hash)
    }

    async fn bet_bear(&self, epoch: Epoch, amount: U256) -> Result<TxHash> {
        let call = IDogeBets::user_BetBearCall {
            epoch: U256::from(epoch),
            referrer: self.binding.settings().referral,
        };
        let hash = self.binding.submit(call, amount).await?;
        info!(platform = "dogebets", epoch = epoch, amount = %amount, tx = %hash, "bear bet submitted");
        Ok(hash)
    }

    async fn claimable(&self, epoch: Epoch, user: Address) -> Result<bool> {
        self.binding
            .read(IDogeBets::ClaimableCall {
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

        let call = IDogeBets::user_ClaimCall {
            epochs: epochs_to_u256(&epochs),
        };
        let hash = self.binding.submit(call, U256::ZERO).await?;
        info!(platform = "dogebets", epochs = ?epochs, tx = %hash, "claim submitted, awaiting receipt");

        let receipt = self.binding.chain().wait_for_receipt(hash).await?;
        Ok(Some(ClaimOutcome::Confirmed(receipt)))
    }
}
