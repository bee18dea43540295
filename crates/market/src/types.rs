//! Core market types

use lendcore_core::Address;

use crate::error::MarketError;

/// A point-in-time view of one account's position in a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountSnapshot {
    /// Pool tokens held by the account.
    pub token_balance: u128,
    /// Underlying units the account currently owes.
    pub borrow_balance: u128,
    /// Current pool-token to underlying exchange rate, 10^18-scaled.
    pub exchange_rate_mantissa: u128,
}

/// Market contract trait - the lending pool surface the risk engine consumes
///
/// Implementations are queried live during admission checks and liquidity
/// computation; the engine holds no cached balances.
pub trait MarketContract {
    /// Pool identity, used as the registry key.
    fn address(&self) -> Address;

    /// The risk-core instance this market reports to. Cross-market
    /// operations require both markets to agree on this.
    fn controller(&self) -> Address;

    /// Capability marker probed at listing time. A contract that is not
    /// a real market token answers false and is rejected hard.
    fn is_market_token(&self) -> bool;

    /// Balance, borrow balance, and exchange rate in one consistent read.
    fn account_snapshot(&self, account: &Address) -> Result<AccountSnapshot, MarketError>;

    /// Current borrow balance for one account, interest accrued.
    fn borrow_balance_current(&self, account: &Address) -> Result<u128, MarketError>;

    /// Current exchange rate mantissa; a live read that may fail.
    fn exchange_rate_current(&self) -> Result<u128, MarketError>;

    /// Total underlying units borrowed from this pool, for cap checks.
    fn total_borrows(&self) -> u128;
}
