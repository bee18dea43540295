//! Mock Oracle for testing
//!
//! Provides configurable fixed prices for testing solvency calculations.

use lendcore_core::Address;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::PriceOracle;

/// Mock Price Oracle for testing
///
/// Stores fixed prices that can be updated programmatically.
/// Useful for unit tests and integration tests.
pub struct MockOracle {
    address: Address,
    /// Stored price mantissas (market -> price)
    prices: RwLock<HashMap<Address, u128>>,
}

impl MockOracle {
    /// Create a new empty mock oracle.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            prices: RwLock::new(HashMap::new()),
        }
    }

    /// Set the price mantissa for a market's underlying asset.
    pub fn set_underlying_price(&self, market: Address, price_mantissa: u128) {
        let mut prices = self.prices.write().unwrap();
        prices.insert(market, price_mantissa);
    }

    /// Remove a price (for testing the "no price set" path).
    pub fn remove_price(&self, market: &Address) {
        let mut prices = self.prices.write().unwrap();
        prices.remove(market);
    }

    /// Number of markets with a posted price.
    pub fn price_count(&self) -> usize {
        self.prices.read().unwrap().len()
    }
}

impl PriceOracle for MockOracle {
    fn address(&self) -> Address {
        self.address
    }

    fn underlying_price(&self, market: &Address) -> u128 {
        let prices = self.prices.read().unwrap();
        prices.get(market).copied().unwrap_or(0)
    }
}
