//! Unified client for BNB Smart Chain bull/bear prediction contracts.
//!
//! Re-exports the adapters and chain client used by the `predictionbets`
//! binary so other tools can drive the same contracts.

pub mod chain;
pub mod config;
pub mod error;
pub mod prediction;

pub use chain::{AlloyChain, ChainClient};
pub use error::{PredictionError, Result};
pub use prediction::{
    connect_platform, CandleGenie, ClaimOutcome, DogeBets, Epoch, PancakeSwap, Platform,
    PredictionClient, RoundRecord, TxSettings,
};
