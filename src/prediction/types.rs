//! Data types shared by every platform adapter.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sequential round identifier on a prediction contract.
pub type Epoch = u64;

/// Result of a claim submission.
///
/// Which variant an adapter produces is part of its contract: DogeBets and
/// PancakeSwap wait for inclusion, CandleGenie returns straight after
/// broadcast.
#[derive(Debug, Clone)]
pub enum ClaimOutcome<R> {
    /// The claim was mined; full receipt attached.
    Confirmed(R),
    /// The claim was broadcast; inclusion was not awaited.
    Submitted(TxHash),
}

impl<R> ClaimOutcome<R> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ClaimOutcome::Confirmed(_))
    }
}

/// One round as read from a prediction contract.
///
/// Every field is required and must be an integer; `closed` and `canceled`
/// are boolean flags encoded as 0/1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub epoch: Epoch,
    pub start_timestamp: u64,
    pub lock_timestamp: u64,
    pub close_timestamp: u64,
    /// Fixed-point oracle price at lock.
    pub lock_price: i128,
    /// Fixed-point oracle price at close. Meaningless until the round closes.
    pub close_price: i128,
    /// Total wei wagered on bull.
    pub bull_amount: u128,
    /// Total wei wagered on bear.
    pub bear_amount: u128,
    pub closed: u8,
    pub canceled: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Open,
    Resolved,
    Canceled,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RoundError {
    #[error("round {epoch}: timestamps out of order (start {start}, lock {lock}, close {close})")]
    TimestampOrder {
        epoch: Epoch,
        start: u64,
        lock: u64,
        close: u64,
    },
    #[error("round {epoch}: flag `{field}` must be 0 or 1, got {value}")]
    FlagValue {
        epoch: Epoch,
        field: &'static str,
        value: u8,
    },
    #[error("round {epoch}: canceled but not closed")]
    CanceledNotClosed { epoch: Epoch },
}

impl RoundRecord {
    /// Parse a round from its JSON form.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Check the invariants the contract guarantees for a well-formed round.
    pub fn validate(&self) -> Result<(), RoundError> {
        if self.start_timestamp > self.lock_timestamp || self.lock_timestamp > self.close_timestamp {
            return Err(RoundError::TimestampOrder {
                epoch: self.epoch,
                start: self.start_timestamp,
                lock: self.lock_timestamp,
                close: self.close_timestamp,
            });
        }
        for (field, value) in [("closed", self.closed), ("canceled", self.canceled)] {
            if value > 1 {
                return Err(RoundError::FlagValue {
                    epoch: self.epoch,
                    field,
                    value,
                });
            }
        }
        if self.canceled == 1 && self.closed == 0 {
            return Err(RoundError::CanceledNotClosed { epoch: self.epoch });
        }
        Ok(())
    }

    pub fn state(&self) -> RoundState {
        match (self.closed, self.canceled) {
            (0, _) => RoundState::Open,
            (_, 0) => RoundState::Resolved,
            _ => RoundState::Canceled,
        }
    }

    pub fn total_amount(&self) -> u128 {
        self.bull_amount.saturating_add(self.bear_amount)
    }
}
