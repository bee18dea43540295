//! Lendcore Price Oracle
//!
//! Provides underlying asset prices for solvency accounting.
//! Currently implements MockOracle for testing; can be extended for external feeds.

mod mock;
mod types;

pub use mock::MockOracle;
pub use types::PriceOracle;
