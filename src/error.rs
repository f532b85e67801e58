//! Error type shared by the chain client and the platform adapters.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictionError>;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("invalid private key: {0}")]
    InvalidCredential(String),
    #[error("rpc failure: {0}")]
    Rpc(String),
    #[error("contract rejected transaction: {0}")]
    ContractRejected(String),
    #[error("round is not bettable: {0}")]
    InvalidEpoch(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("failed to decode contract return data: {0}")]
    Decode(#[from] alloy::sol_types::Error),
}

/// Revert reasons that mean the epoch argument is outside the bettable window.
const UNBETTABLE_MARKERS: &[&str] = &[
    "not bettable",
    "too early",
    "too late",
    "round locked",
    "round closed",
    "invalid epoch",
];

/// Map a node error message onto an error kind.
///
/// Nodes report failures as free text, so this matches on the phrases
/// geth-compatible clients use for balance failures and reverts.
pub fn classify_node_error(message: &str) -> PredictionError {
    let lower = message.to_ascii_lowercase();

    if lower.contains("insufficient funds") {
        return PredictionError::InsufficientFunds(message.to_string());
    }

    if lower.contains("revert") {
        if UNBETTABLE_MARKERS.iter().any(|m| lower.contains(m)) {
            return PredictionError::InvalidEpoch(message.to_string());
        }
        return PredictionError::ContractRejected(message.to_string());
    }

    PredictionError::Rpc(message.to_string())
}
