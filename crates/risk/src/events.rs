//! Protocol events
//!
//! Every state transition the engine makes is mirrored into an event
//! for external indexers. Soft failures carry their (error, info) pair
//! through `Failure`.

use lendcore_core::{Address, ErrorCode, FailureInfo};
use serde::{Deserialize, Serialize};

/// Hook families that can be paused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
pub enum PauseAction {
    Mint,
    Borrow,
    Transfer,
    Seize,
}

/// Events emitted by the risk engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    MarketListed {
        market: Address,
    },
    MarketEntered {
        market: Address,
        account: Address,
    },
    MarketExited {
        market: Address,
        account: Address,
    },
    NewCollateralFactor {
        market: Address,
        old_mantissa: u128,
        new_mantissa: u128,
    },
    NewCloseFactor {
        old_mantissa: u128,
        new_mantissa: u128,
    },
    NewLiquidationIncentive {
        old_mantissa: u128,
        new_mantissa: u128,
    },
    NewPriceOracle {
        old_oracle: Address,
        new_oracle: Address,
    },
    NewPauseGuardian {
        old_guardian: Address,
        new_guardian: Address,
    },
    ActionPaused {
        /// None for the global transfer/seize switches.
        market: Option<Address>,
        action: PauseAction,
        state: bool,
    },
    NewBorrowCap {
        market: Address,
        new_cap: u128,
    },
    Failure {
        error: ErrorCode,
        info: FailureInfo,
    },
}
