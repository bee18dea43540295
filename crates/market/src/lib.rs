//! Lendcore Market - lending pool collaborator interface
//!
//! The risk engine never holds balances itself; it reads them live from
//! the market contracts it admits. This crate defines that boundary and
//! a configurable test double.

mod error;
mod mock;
mod types;

pub use error::MarketError;
pub use mock::MockMarket;
pub use types::{AccountSnapshot, MarketContract};
