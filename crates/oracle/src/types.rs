//! Core oracle types

use lendcore_core::Address;

/// Price Oracle trait - interface for underlying price feeds
///
/// Prices are 10^18-scaled mantissas denominated in the protocol's
/// unit of account. A price of zero means "no price set"; callers
/// treat that as a failed lookup, never as a free asset.
pub trait PriceOracle {
    /// Identity of this oracle instance, used in change events.
    fn address(&self) -> Address;

    /// Current price mantissa of one unit of the market's underlying
    /// asset, or 0 when no price has been posted.
    fn underlying_price(&self, market: &Address) -> u128;
}
