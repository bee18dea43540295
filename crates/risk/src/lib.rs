//! Lendcore Risk - the protocol's central risk controller
//!
//! The risk engine decides what every market may do: which markets are
//! collateral, how far an account can borrow against it, when a
//! position is liquidatable and how much collateral changes hands. It
//! holds no funds and moves none; markets consult it through the
//! admission hooks before mutating any position.
//!
//! Two failure channels run through the crate. Policy rejections are
//! data: an [`lendcore_core::ErrorCode`] paired with a `Failure` event.
//! Calls that may not proceed at all (paused operations, malformed
//! input, unreadable market state) abort with [`EngineError`].

mod engine;
mod error;
mod events;
mod hooks;
mod liquidation;
mod liquidity;
mod proxied;
mod state;

pub use engine::RiskEngine;
pub use error::EngineError;
pub use events::{PauseAction, ProtocolEvent};
pub use proxied::ProxiedCore;
pub use state::{
    CoreState, Market, CLOSE_FACTOR_MAX_MANTISSA, CLOSE_FACTOR_MIN_MANTISSA,
    COLLATERAL_FACTOR_MAX_MANTISSA, CORE_STORAGE_LAYOUT, DEFAULT_CLOSE_FACTOR_MANTISSA,
    DEFAULT_LIQUIDATION_INCENTIVE_MANTISSA, LIQUIDATION_INCENTIVE_MAX_MANTISSA,
    LIQUIDATION_INCENTIVE_MIN_MANTISSA,
};
