//! Bull/bear prediction platforms behind one trait.
//!
//! Every supported contract runs the same round-based game (bet on the
//! price closing above or below the lock price, claim winnings after the
//! round resolves) but exposes it under different names and calling
//! conventions. [`PredictionClient`] is the uniform surface; each platform
//! has one adapter that translates it into contract calls:
//! - [`DogeBets`]: referral address on bets, waits for claim receipts
//! - [`PancakeSwap`]: plain bets, waits for claim receipts
//! - [`CandleGenie`]: referral address on claims, returns claim hash
//!   without waiting for inclusion
//!
//! All adapters are built on a [`ChainClient`], so they do no transport,
//! signing or encoding work of their own beyond building calldata.

pub mod abi;
pub mod candlegenie;
pub mod dogebets;
pub mod pancakeswap;
pub mod types;

pub use candlegenie::CandleGenie;
pub use dogebets::DogeBets;
pub use pancakeswap::PancakeSwap;
pub use types::{ClaimOutcome, Epoch, RoundRecord, RoundState};

use crate::chain::ChainClient;
use crate::error::{PredictionError, Result};

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Gas limit applied to every state-changing call.
pub const DEFAULT_GAS_LIMIT: u64 = 400_000;
/// Gas price (wei) applied to every state-changing call: 5 gwei.
pub const DEFAULT_GAS_PRICE: u128 = 5_000_000_000;
/// Number of resolved rounds scanned for unclaimed winnings.
pub const DEFAULT_CLAIM_WINDOW: u64 = 20;

/// Per-adapter transaction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSettings {
    pub gas_limit: u64,
    pub gas_price: u128,
    pub referral: Address,
    pub claim_window: u64,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE,
            referral: abi::DEFAULT_REFERRAL_ADDRESS,
            claim_window: DEFAULT_CLAIM_WINDOW,
        }
    }
}

/// Epochs to scan for claimable winnings given the current epoch.
///
/// Covers the `window` rounds before `current - 1`, i.e. `[current - 1 -
/// window, current - 1)`. The live round and the one just before it are
/// never included. Saturates at zero, so early epochs yield a short or
/// empty range.
pub fn claim_scan_range(current: Epoch, window: u64) -> Range<Epoch> {
    let end = current.saturating_sub(1);
    let start = end.saturating_sub(window);
    start..end
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    DogeBets,
    PancakeSwap,
    CandleGenie,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::DogeBets => "dogebets",
            Platform::PancakeSwap => "pancakeswap",
            Platform::CandleGenie => "candlegenie",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dogebets" | "dogebet" => Ok(Platform::DogeBets),
            "pancakeswap" | "pancake" => Ok(Platform::PancakeSwap),
            "candlegenie" | "candle" => Ok(Platform::CandleGenie),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Uniform operation set over a prediction contract.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Receipt type of the underlying chain client.
    type Receipt: fmt::Debug + Send + Sync;

    fn platform(&self) -> Platform;

    /// Address derived from the adapter's signing key.
    fn address(&self) -> Address;

    /// Scan window used by [`user_claim`](Self::user_claim).
    fn claim_window(&self) -> u64;

    /// Whether the contract is emergency-paused. Bets revert while paused.
    async fn is_paused(&self) -> Result<bool>;

    /// The live round, possibly still open for bets.
    async fn current_epoch(&self) -> Result<Epoch>;

    /// Number of rounds `user` has ever entered.
    async fn user_rounds_count(&self, user: Address) -> Result<u64>;

    /// Wager `amount` wei that the price closes above the lock price.
    ///
    /// Returns once the transaction is broadcast; inclusion is not awaited.
    async fn bet_bull(&self, epoch: Epoch, amount: U256) -> Result<TxHash>;

    /// Wager `amount` wei that the price closes below the lock price.
    ///
    /// Returns once the transaction is broadcast; inclusion is not awaited.
    async fn bet_bear(&self, epoch: Epoch, amount: U256) -> Result<TxHash>;

    /// Whether `user` won `epoch` and has not withdrawn yet.
    async fn claimable(&self, epoch: Epoch, user: Address) -> Result<bool>;

    /// Claimable epochs for this adapter's address within the last
    /// `window` resolved rounds, ascending.
    async fn fetch_claimable(&self, window: u64) -> Result<Vec<Epoch>> {
        let current = self.current_epoch().await?;
        let range = claim_scan_range(current, window);
        let user = self.address();

        let mut epochs = Vec::new();
        for epoch in range.clone() {
            if self.claimable(epoch, user).await? {
                epochs.push(epoch);
            }
        }

        debug!(
            platform = %self.platform(),
            current_epoch = current,
            from = range.start,
            to = range.end,
            found = epochs.len(),
            "claimable scan complete"
        );
        Ok(epochs)
    }

    /// Claim every winning round in the scan window in one transaction.
    ///
    /// Returns `None` without submitting anything when nothing is claimable.
    async fn user_claim(&self) -> Result<Option<ClaimOutcome<Self::Receipt>>>;
}

/// Boxed adapter over a shared chain client, platform chosen at runtime.
pub type DynPredictionClient<C> = Box<dyn PredictionClient<Receipt = <C as ChainClient>::Receipt>>;

/// Build the adapter for `platform` bound to `contract`.
pub fn connect_platform<C>(
    platform: Platform,
    chain: Arc<C>,
    contract: Address,
    private_key: &str,
    settings: TxSettings,
) -> Result<DynPredictionClient<C>>
where
    C: ChainClient + 'static,
{
    let client: DynPredictionClient<C> = match platform {
        Platform::DogeBets => Box::new(DogeBets::new(chain, contract, private_key, settings)?),
        Platform::PancakeSwap => {
            Box::new(PancakeSwap::new(chain, contract, private_key, settings)?)
        }
        Platform::CandleGenie => {
            Box::new(CandleGenie::new(chain, contract, private_key, settings)?)
        }
    };
    Ok(client)
}

/// State every adapter carries: the chain handle, the bound contract, the
/// signing key and the transaction parameters.
pub(crate) struct ContractBinding<C> {
    chain: Arc<C>,
    contract: Address,
    signer: PrivateKeySigner,
    settings: TxSettings,
}

impl<C: ChainClient> ContractBinding<C> {
    pub(crate) fn new(
        chain: Arc<C>,
        contract: Address,
        private_key: &str,
        settings: TxSettings,
    ) -> Result<Self> {
        let signer = parse_private_key(private_key)?;
        Ok(Self {
            chain,
            contract,
            signer,
            settings,
        })
    }

    pub(crate) fn address(&self) -> Address {
        self.signer.address()
    }

    pub(crate) fn contract(&self) -> Address {
        self.contract
    }

    pub(crate) fn settings(&self) -> &TxSettings {
        &self.settings
    }

    pub(crate) fn chain(&self) -> &C {
        &self.chain
    }

    /// Read-only call, decoded with the call's return ABI.
    pub(crate) async fn read<T: SolCall + Send>(&self, call: T) -> Result<T::Return> {
        let data = self
            .chain
            .call(self.contract, Bytes::from(call.abi_encode()))
            .await?;
        Ok(T::abi_decode_returns(&data)?)
    }

    /// Sign and broadcast `call` with the configured gas parameters.
    pub(crate) async fn submit<T: SolCall + Send>(&self, call: T, value: U256) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .with_from(self.signer.address())
            .with_to(self.contract)
            .with_input(call.abi_encode())
            .with_value(value)
            .with_gas_limit(self.settings.gas_limit)
            .with_gas_price(self.settings.gas_price);

        self.chain.send_transaction(&self.signer, tx).await
    }
}

impl<C> fmt::Debug for ContractBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("contract", &self.contract)
            .field("address", &self.signer.address())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn parse_private_key(private_key: &str) -> Result<PrivateKeySigner> {
    private_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| PredictionError::InvalidCredential(e.to_string()))
}

/// Convert an on-chain `uint256` count or epoch to `u64`.
pub(crate) fn to_u64(value: U256, what: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        PredictionError::Decode(alloy::sol_types::Error::custom(format!(
            "{what} does not fit in u64: {value}"
        )))
    })
}

pub(crate) fn epochs_to_u256(epochs: &[Epoch]) -> Vec<U256> {
    epochs.iter().map(|e| U256::from(*e)).collect()
}
