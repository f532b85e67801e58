//! In-memory chain client simulating the three prediction contracts.
//!
//! Calldata is decoded with the same `sol!` bindings the adapters encode
//! with, so a test exercises the real selectors and argument layout.
//! Reverts and balance failures are reported as node messages and pass
//! through `classify_node_error`, the same as on a live node.

use crate::chain::ChainClient;
use crate::error::{classify_node_error, PredictionError, Result};
use crate::prediction::abi::{ICandleGenie, IDogeBets, IPancakePrediction};

use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::time::Duration;

/// anvil account #0
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// anvil account #1
pub const OTHER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub fn test_address() -> Address {
    TEST_KEY.parse::<PrivateKeySigner>().unwrap().address()
}

pub fn other_address() -> Address {
    OTHER_KEY.parse::<PrivateKeySigner>().unwrap().address()
}

/// One broadcast transaction as seen by the mock.
#[derive(Debug, Clone)]
pub struct SentTx {
    pub hash: TxHash,
    pub from: Address,
    pub to: Option<Address>,
    pub input: Bytes,
    pub value: U256,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockReceipt {
    pub transaction_hash: TxHash,
    pub status: bool,
}

#[derive(Debug)]
pub struct MockState {
    pub current_epoch: u64,
    /// Added to `current_epoch` after every `currentEpoch()` read.
    pub epoch_step: u64,
    pub paused: bool,
    pub claimable: HashMap<Address, BTreeSet<u64>>,
    pub entered: HashMap<Address, BTreeSet<u64>>,
    pub balances: HashMap<Address, U256>,
    pub sent: Vec<SentTx>,
    pub receipts_awaited: Vec<TxHash>,
    pub claimable_queries: Vec<u64>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            current_epoch: 1,
            epoch_step: 0,
            paused: false,
            claimable: HashMap::new(),
            entered: HashMap::new(),
            balances: HashMap::new(),
            sent: Vec::new(),
            receipts_awaited: Vec::new(),
            claimable_queries: Vec::new(),
        }
    }
}

/// 100 BNB
fn default_balance() -> U256 {
    U256::from(100u128 * 10u128.pow(18))
}

pub struct MockChain {
    state: Mutex<MockState>,
    receipt_latency: Duration,
}

impl MockChain {
    pub fn new(current_epoch: u64) -> Self {
        Self::with_latency(current_epoch, Duration::ZERO)
    }

    /// Mock whose `wait_for_receipt` sleeps for `latency` before returning.
    pub fn with_latency(current_epoch: u64, latency: Duration) -> Self {
        Self {
            state: Mutex::new(MockState {
                current_epoch,
                ..MockState::default()
            }),
            receipt_latency: latency,
        }
    }

    /// Run `f` against the simulated contract state.
    pub fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn set_paused(&self, paused: bool) {
        self.with_state(|s| s.paused = paused);
    }

    pub fn set_balance(&self, user: Address, balance: U256) {
        self.with_state(|s| {
            s.balances.insert(user, balance);
        });
    }

    pub fn mark_claimable(&self, user: Address, epochs: &[u64]) {
        self.with_state(|s| s.claimable.entry(user).or_default().extend(epochs));
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.with_state(|s| s.sent.clone())
    }

    pub fn receipts_awaited(&self) -> usize {
        self.with_state(|s| s.receipts_awaited.len())
    }

    fn read(&self, input: &[u8]) -> Result<Bytes> {
        let selector = input.get(..4).unwrap_or_default();
        let mut state = self.state.lock().unwrap();

        let encoded = if is::<IDogeBets::IsPausedCall>(selector)
            || is::<IPancakePrediction::pausedCall>(selector)
        {
            state.paused.abi_encode()
        } else if is::<IPancakePrediction::currentEpochCall>(selector) {
            let epoch = state.current_epoch;
            state.current_epoch += state.epoch_step;
            U256::from(epoch).abi_encode()
        } else if is::<IDogeBets::GetUserRoundsLengthCall>(selector) {
            let call = IDogeBets::GetUserRoundsLengthCall::abi_decode(input)?;
            rounds_entered(&state, call.user).abi_encode()
        } else if is::<IPancakePrediction::getUserRoundsLengthCall>(selector) {
            let call = IPancakePrediction::getUserRoundsLengthCall::abi_decode(input)?;
            rounds_entered(&state, call.user).abi_encode()
        } else if is::<IDogeBets::ClaimableCall>(selector) {
            let call = IDogeBets::ClaimableCall::abi_decode(input)?;
            is_claimable(&mut state, call.epoch, call.user).abi_encode()
        } else if is::<IPancakePrediction::claimableCall>(selector) {
            let call = IPancakePrediction::claimableCall::abi_decode(input)?;
            is_claimable(&mut state, call.epoch, call.user).abi_encode()
        } else {
            return Err(PredictionError::Rpc(format!(
                "mock: unknown read selector {selector:02x?}"
            )));
        };

        Ok(Bytes::from(encoded))
    }

    fn execute(&self, from: Address, input: &[u8], value: U256, fee: U256) -> Result<()> {
        let selector = input.get(..4).unwrap_or_default();
        let mut state = self.state.lock().unwrap();

        let balance = state.balances.get(&from).copied().unwrap_or_else(default_balance);
        let cost = value.saturating_add(fee);
        if balance < cost {
            return Err(classify_node_error(
                "insufficient funds for gas * price + value",
            ));
        }

        let bet_epoch = if is::<IDogeBets::user_BetBullCall>(selector) {
            Some(IDogeBets::user_BetBullCall::abi_decode(input)?.epoch)
        } else if is::<IDogeBets::user_BetBearCall>(selector) {
            Some(IDogeBets::user_BetBearCall::abi_decode(input)?.epoch)
        } else if is::<IPancakePrediction::betBullCall>(selector) {
            Some(IPancakePrediction::betBullCall::abi_decode(input)?.epoch)
        } else if is::<IPancakePrediction::betBearCall>(selector) {
            Some(IPancakePrediction::betBearCall::abi_decode(input)?.epoch)
        } else if is::<ICandleGenie::BetBullCall>(selector) {
            Some(ICandleGenie::BetBullCall::abi_decode(input)?.epoch)
        } else if is::<ICandleGenie::BetBearCall>(selector) {
            Some(ICandleGenie::BetBearCall::abi_decode(input)?.epoch)
        } else {
            None
        };

        if let Some(epoch) = bet_epoch {
            if state.paused {
                return Err(classify_node_error("execution reverted: Pausable: paused"));
            }
            if epoch != U256::from(state.current_epoch) {
                return Err(classify_node_error(
                    "execution reverted: Bet is too early/late",
                ));
            }
            if value.is_zero() {
                return Err(classify_node_error(
                    "execution reverted: Bet amount must be greater than minBetAmount",
                ));
            }
            let epoch = state.current_epoch;
            if !state.entered.entry(from).or_default().insert(epoch) {
                return Err(classify_node_error(
                    "execution reverted: Can only bet once per round",
                ));
            }
        } else {
            let epochs = if is::<IDogeBets::user_ClaimCall>(selector) {
                IDogeBets::user_ClaimCall::abi_decode(input)?.epochs
            } else if is::<IPancakePrediction::claimCall>(selector) {
                IPancakePrediction::claimCall::abi_decode(input)?.epochs
            } else if is::<ICandleGenie::ClaimReferredCall>(selector) {
                ICandleGenie::ClaimReferredCall::abi_decode(input)?.epochs
            } else {
                return Err(PredictionError::Rpc(format!(
                    "mock: unknown transaction selector {selector:02x?}"
                )));
            };

            let epochs: Vec<u64> = epochs
                .iter()
                .map(|e| u64::try_from(*e).unwrap_or(u64::MAX))
                .collect();
            let owned = state.claimable.entry(from).or_default();
            if epochs.is_empty() || !epochs.iter().all(|e| owned.contains(e)) {
                return Err(classify_node_error(
                    "execution reverted: Not eligible for claim",
                ));
            }
            for epoch in &epochs {
                owned.remove(epoch);
            }
        }

        state.balances.insert(from, balance - cost);
        Ok(())
    }
}

fn is<T: SolCall>(selector: &[u8]) -> bool {
    selector == T::SELECTOR
}

fn rounds_entered(state: &MockState, user: Address) -> U256 {
    U256::from(state.entered.get(&user).map_or(0, |e| e.len()))
}

fn is_claimable(state: &mut MockState, epoch: U256, user: Address) -> bool {
    let epoch = u64::try_from(epoch).unwrap_or(u64::MAX);
    state.claimable_queries.push(epoch);
    state
        .claimable
        .get(&user)
        .is_some_and(|epochs| epochs.contains(&epoch))
}

#[async_trait]
impl ChainClient for MockChain {
    type Receipt = MockReceipt;

    async fn call(&self, _to: Address, input: Bytes) -> Result<Bytes> {
        self.read(&input)
    }

    async fn send_transaction(
        &self,
        signer: &PrivateKeySigner,
        tx: TransactionRequest,
    ) -> Result<TxHash> {
        let from = signer.address();
        let input = tx.input.input().cloned().unwrap_or_default();
        let value = tx.value.unwrap_or_default();
        let fee = U256::from(tx.gas.unwrap_or_default()) * U256::from(tx.gas_price.unwrap_or_default());

        self.execute(from, &input, value, fee)?;

        let mut state = self.state.lock().unwrap();
        let mut preimage = from.to_vec();
        preimage.extend_from_slice(&(state.sent.len() as u64).to_be_bytes());
        let hash = keccak256(&preimage);

        state.sent.push(SentTx {
            hash,
            from,
            to: tx.to.and_then(|kind| kind.to().copied()),
            input,
            value,
            gas_limit: tx.gas,
            gas_price: tx.gas_price,
        });
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<MockReceipt> {
        tokio::time::sleep(self.receipt_latency).await;
        self.with_state(|s| s.receipts_awaited.push(hash));
        Ok(MockReceipt {
            transaction_hash: hash,
            status: true,
        })
    }
}
