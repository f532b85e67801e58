//! CandleGenie adapter.
//!
//! Bets take only the epoch. Claims go through `ClaimReferred`, which takes
//! the epoch batch plus the referral address.
//!
//! Unlike the other adapters, `user_claim` returns the transaction hash as
//! soon as the claim is broadcast and never waits for inclusion. Callers
//! that need confirmation should wait on the returned hash through their
//! chain client.

use super::abi::ICandleGenie;
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

pub struct CandleGenie<C> {
    binding: ContractBinding<C>,
}

impl<C: ChainClient> CandleGenie<C> {
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
            "CandleGenie adapter ready"
        );
        Ok(Self { binding })
    }
}

impl<C> fmt::Debug for CandleGenie<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandleGenie").field("binding", &self.binding).finish()
    }
}

#[async_trait]
impl<C: ChainClient> PredictionClient for CandleGenie<C> {
    type Receipt = C::Receipt;

    fn platform(&self) -> Platform {
        Platform::CandleGenie
    }

    fn address(&self) -> Address {
        self.binding.address()
    }

    fn claim_window(&self) -> u64 {
        self.binding.settings().claim_window
    }

    async fn is_paused(&self) -> Result<bool> {
        self.binding.read(ICandleGenie::pausedCall {}).await
    }

    async fn current_epoch(&self) -> Result<Epoch> {
        let epoch = self.binding.read(ICandleGenie::currentEpochCall {}).await?;
        to_u64(epoch, "epoch")
    }

    async fn user_rounds_count(&self, user: Address) -> Result<u64> {
        let count = self
            .binding
            .read(ICandleGenie::getUserRoundsLengthCall { user })
            .await?;
        to_u64(count, "rounds count")
    }

    async fn bet_bull(&self, epoch: Epoch, amount: U256) -> Result<TxHash> {
        let call = ICandleGenie::BetBullCall {
            epoch: U256::from(epoch),
        };
        let hash = self.binding.submit(call, amount).await?;
        info!(platform = "candlegenie", epoch = epoch, amount = %amount, tx = %hash, "bull bet submitted");
        Ok(hash)
    }

    async fn bet_bear(&self, epoch: Epoch, amount: U256) -> Result<TxHash> {
        let call = ICandleGenie::BetBearCall {
            epoch: U256::from(epoch),
        };
        let hash = self.binding.submit(call, amount).await?;
        info!(platform = "candlegenie", epoch = epoch, amount = %amount, tx = %hash, "bear bet submitted");
        Ok(hash)
    }

    async fn claimable(&self, epoch: Epoch, user: Address) -> Result<bool> {
        self.binding
            .read(ICandleGenie::claimableCall {
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

        let call = ICandleGenie::ClaimReferredCall {
            epochs: epochs_to_u256(&epochs),
            referrer: self.binding.settings().referral,
        };
        let hash = self.binding.submit(call, U256::ZERO).await?;
        info!(platform = "candlegenie", epochs = ?epochs, tx = %hash, "claim submitted");

        Ok(Some(ClaimOutcome::Submitted(hash)))
    }
}
