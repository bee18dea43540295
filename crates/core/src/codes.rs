//! Soft-failure taxonomy
//!
//! Policy-level negative outcomes are returned as data, never as aborts.
//! Each soft failure is a pair: an `ErrorCode` describing what went wrong
//! and a `FailureInfo` describing where. External consumers branch on the
//! numeric values, so discriminants are part of the wire contract and
//! must never be reordered.

use serde::{Deserialize, Serialize};

/// Top-level soft error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum ErrorCode {
    NoError = 0,
    Unauthorized,
    ControllerMismatch,
    InsufficientShortfall,
    InsufficientLiquidity,
    InvalidCloseFactor,
    InvalidCollateralFactor,
    InvalidLiquidationIncentive,
    MarketNotEntered,
    MarketNotListed,
    MarketAlreadyListed,
    MathError,
    NonzeroBorrowBalance,
    PriceError,
    Rejection,
    SnapshotError,
    TooManyAssets,
    TooMuchRepay,
}

impl ErrorCode {
    /// The numeric code external consumers branch on.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Whether this is the success code.
    pub fn is_no_error(self) -> bool {
        self == ErrorCode::NoError
    }
}

/// Detail codes identifying which check produced a soft failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum FailureInfo {
    AcceptAdminPendingAdminCheck = 0,
    AcceptPendingImplementationAddressCheck,
    ExitMarketBalanceOwed,
    ExitMarketRejection,
    SetCloseFactorOwnerCheck,
    SetCloseFactorValidation,
    SetCollateralFactorOwnerCheck,
    SetCollateralFactorNoExists,
    SetCollateralFactorValidation,
    SetCollateralFactorWithoutPrice,
    SetImplementationOwnerCheck,
    SetLiquidationIncentiveOwnerCheck,
    SetLiquidationIncentiveValidation,
    SetMaxAssetsOwnerCheck,
    SetPendingAdminOwnerCheck,
    SetPendingImplementationOwnerCheck,
    SetPriceOracleOwnerCheck,
    SupportMarketExists,
    SupportMarketOwnerCheck,
    SetPauseGuardianOwnerCheck,
}

impl FailureInfo {
    /// The numeric detail code.
    pub fn code(self) -> u32 {
        self as u32
    }
}
