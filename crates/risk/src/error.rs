//! Engine errors - hard aborts
//!
//! Policy rejections that the protocol expects callers to handle come
//! back as `ErrorCode` values; the variants here abort the call
//! entirely, the way a revert would.

use lendcore_core::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{market} does not identify as a market token")]
    NotMarketToken { market: Address },

    #[error("mint is paused")]
    MintPaused,

    #[error("borrow is paused")]
    BorrowPaused,

    #[error("transfer is paused")]
    TransferPaused,

    #[error("seize is paused")]
    SeizePaused,

    #[error("cannot pause a market that is not listed")]
    CannotPauseUnlistedMarket,

    #[error("only pause guardian and admin can pause")]
    NotPauseGuardian,

    #[error("only admin can unpause")]
    OnlyAdminCanUnpause,

    #[error("only admin can set borrow caps")]
    OnlyAdminCanSetBorrowCaps,

    #[error("invalid input")]
    InvalidInput,

    #[error("sender must be market")]
    SenderMustBeMarket,

    #[error("market borrow cap reached")]
    BorrowCapReached,

    #[error("redeemTokens zero")]
    RedeemTokensZero,

    #[error("account snapshot from {market} unavailable")]
    SnapshotFailed { market: Address },

    #[error("exchange rate from {market} unavailable")]
    ExchangeRateReadFailed { market: Address },

    #[error("{market} is not registered with this engine")]
    UnknownMarket { market: Address },
}
