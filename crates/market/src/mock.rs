//! Mock Market for testing
//!
//! A configurable lending-pool double: balances, borrow balances, and the
//! exchange rate are all settable, and snapshot / exchange-rate reads can
//! be made to fail to exercise the engine's abort paths.

use lendcore_core::{Address, EXP_SCALE};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::MarketError;
use crate::types::{AccountSnapshot, MarketContract};

#[derive(Debug, Default)]
struct MockMarketState {
    token_balances: HashMap<Address, u128>,
    borrow_balances: HashMap<Address, u128>,
    exchange_rate_mantissa: u128,
    total_borrows: u128,
    fail_snapshot: bool,
    fail_exchange_rate: bool,
}

/// Mock lending pool for testing
pub struct MockMarket {
    address: Address,
    controller: Address,
    is_market_token: bool,
    state: RwLock<MockMarketState>,
}

impl MockMarket {
    /// Create a mock market with exchange rate 1.0 and empty balances.
    pub fn new(address: Address, controller: Address) -> Self {
        Self {
            address,
            controller,
            is_market_token: true,
            state: RwLock::new(MockMarketState {
                exchange_rate_mantissa: EXP_SCALE,
                ..Default::default()
            }),
        }
    }

    /// Create a contract that answers false to the capability probe.
    pub fn not_a_market(address: Address, controller: Address) -> Self {
        let mut market = Self::new(address, controller);
        market.is_market_token = false;
        market
    }

    /// Set an account's pool-token balance.
    pub fn set_token_balance(&self, account: Address, balance: u128) {
        self.state.write().unwrap().token_balances.insert(account, balance);
    }

    /// Set an account's borrow balance.
    pub fn set_borrow_balance(&self, account: Address, balance: u128) {
        self.state.write().unwrap().borrow_balances.insert(account, balance);
    }

    /// Set the exchange rate mantissa.
    pub fn set_exchange_rate(&self, mantissa: u128) {
        self.state.write().unwrap().exchange_rate_mantissa = mantissa;
    }

    /// Set the pool-wide total borrows.
    pub fn set_total_borrows(&self, total: u128) {
        self.state.write().unwrap().total_borrows = total;
    }

    /// Make subsequent snapshot reads fail.
    pub fn fail_snapshots(&self, fail: bool) {
        self.state.write().unwrap().fail_snapshot = fail;
    }

    /// Make subsequent exchange-rate reads fail.
    pub fn fail_exchange_rate(&self, fail: bool) {
        self.state.write().unwrap().fail_exchange_rate = fail;
    }
}

impl MarketContract for MockMarket {
    fn address(&self) -> Address {
        self.address
    }

    fn controller(&self) -> Address {
        self.controller
    }

    fn is_market_token(&self) -> bool {
        self.is_market_token
    }

    fn account_snapshot(&self, account: &Address) -> Result<AccountSnapshot, MarketError> {
        let state = self.state.read().unwrap();
        if state.fail_snapshot {
            return Err(MarketError::SnapshotFailed);
        }
        Ok(AccountSnapshot {
            token_balance: state.token_balances.get(account).copied().unwrap_or(0),
            borrow_balance: state.borrow_balances.get(account).copied().unwrap_or(0),
            exchange_rate_mantissa: state.exchange_rate_mantissa,
        })
    }

    fn borrow_balance_current(&self, account: &Address) -> Result<u128, MarketError> {
        let state = self.state.read().unwrap();
        if state.fail_snapshot {
            return Err(MarketError::SnapshotFailed);
        }
        Ok(state.borrow_balances.get(account).copied().unwrap_or(0))
    }

    fn exchange_rate_current(&self) -> Result<u128, MarketError> {
        let state = self.state.read().unwrap();
        if state.fail_exchange_rate {
            return Err(MarketError::ExchangeRateFailed);
        }
        Ok(state.exchange_rate_mantissa)
    }

    fn total_borrows(&self) -> u128 {
        self.state.read().unwrap().total_borrows
    }
}
