//! Contract bindings for the supported prediction platforms.
//!
//! Minimal interfaces covering only the functions the adapters call. The
//! three contracts implement the same game but disagree on naming and on
//! where the referral address goes, so each gets its own interface.

use alloy::primitives::{address, Address};
use alloy::sol;

/// PancakeSwap Prediction V2 (BNB/USD) on BNB Smart Chain.
pub const PANCAKESWAP_ADDRESS: Address = address!("18b2a687610328590bc8f2e5fedde3b582a49cda");

/// Referral address credited by DogeBets bets and CandleGenie claims.
pub const DEFAULT_REFERRAL_ADDRESS: Address =
    address!("45b2e613aed338bfead42351ed213e9761162dad");

sol! {
    interface IDogeBets {
        function IsPaused() external view returns (bool);
        function currentEpoch() external view returns (uint256);
        function GetUserRoundsLength(address user) external view returns (uint256);
        function user_BetBull(uint256 epoch, address referrer) external payable;
        function user_BetBear(uint256 epoch, address referrer) external payable;
        function Claimable(uint256 epoch, address user) external view returns (bool);
        function user_Claim(uint256[] calldata epochs) external;
    }
}

sol! {
    interface IPancakePrediction {
        function paused() external view returns (bool);
        function currentEpoch() external view returns (uint256);
        function getUserRoundsLength(address user) external view returns (uint256);
        function betBull(uint256 epoch) external payable;
        function betBear(uint256 epoch) external payable;
        function claimable(uint256 epoch, address user) external view returns (bool);
        function claim(uint256[] calldata epochs) external;
    }
}

sol! {
    interface ICandleGenie {
        function paused() external view returns (bool);
        function currentEpoch() external view returns (uint256);
        function getUserRoundsLength(address user) external view returns (uint256);
        function BetBull(uint256 epoch) external payable;
        function BetBear(uint256 epoch) external payable;
        function claimable(uint256 epoch, address user) external view returns (bool);
        function ClaimReferred(uint256[] calldata epochs, address referrer) external;
    }
}
