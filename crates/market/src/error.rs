//! Market collaborator errors

use thiserror::Error;

/// Errors a market contract can report to the risk engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("account snapshot unavailable")]
    SnapshotFailed,

    #[error("exchange rate calculation failed")]
    ExchangeRateFailed,
}
