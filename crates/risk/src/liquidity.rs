//! Account liquidity
//!
//! An account's position is valued across every market it has entered:
//! collateral is discounted into the borrow denomination through
//! `collateral_factor * exchange_rate * price`, borrows are valued at
//! price. The hypothetical variant layers a prospective withdrawal or
//! borrow on top before comparing the sides. Failures here are soft
//! codes so callers can surface them without unwinding.

use lendcore_core::{Address, ErrorCode, Exp};

use crate::engine::RiskEngine;

impl RiskEngine {
    /// Current (liquidity, shortfall) for `account`. At most one of the
    /// two is nonzero.
    pub fn get_account_liquidity(&self, account: &Address) -> (ErrorCode, u128, u128) {
        self.hypothetical_liquidity_internal(account, None, 0, 0)
    }

    /// Liquidity as it would stand after `account` withdrew
    /// `redeem_tokens` from and borrowed `borrow_amount` of `market`.
    pub fn get_hypothetical_account_liquidity(
        &self,
        account: &Address,
        market: Address,
        redeem_tokens: u128,
        borrow_amount: u128,
    ) -> (ErrorCode, u128, u128) {
        self.hypothetical_liquidity_internal(account, Some(market), redeem_tokens, borrow_amount)
    }

    pub(crate) fn hypothetical_liquidity_internal(
        &self,
        account: &Address,
        modify_market: Option<Address>,
        redeem_tokens: u128,
        borrow_amount: u128,
    ) -> (ErrorCode, u128, u128) {
        let mut sum_collateral: u128 = 0;
        let mut sum_borrow_plus_effects: u128 = 0;

        for asset in self.assets_in(account) {
            let Ok(contract) = self.market_contract(asset) else {
                return (ErrorCode::SnapshotError, 0, 0);
            };
            let Ok(snapshot) = contract.account_snapshot(account) else {
                return (ErrorCode::SnapshotError, 0, 0);
            };

            let price_mantissa = self.oracle().underlying_price(asset);
            if price_mantissa == 0 {
                return (ErrorCode::PriceError, 0, 0);
            }
            let price = Exp::new(price_mantissa);

            let collateral_factor = Exp::new(
                self.market(asset)
                    .map(|m| m.collateral_factor_mantissa)
                    .unwrap_or(0),
            );
            let exchange_rate = Exp::new(snapshot.exchange_rate_mantissa);

            // pool tokens -> units of the borrow denomination
            let tokens_to_denom = match collateral_factor
                .try_mul(exchange_rate)
                .and_then(|factor| factor.try_mul(price))
            {
                Ok(value) => value,
                Err(_) => return (ErrorCode::MathError, 0, 0),
            };

            sum_collateral = match tokens_to_denom
                .mul_scalar_truncate_add(snapshot.token_balance, sum_collateral)
            {
                Ok(value) => value,
                Err(_) => return (ErrorCode::MathError, 0, 0),
            };

            sum_borrow_plus_effects = match price
                .mul_scalar_truncate_add(snapshot.borrow_balance, sum_borrow_plus_effects)
            {
                Ok(value) => value,
                Err(_) => return (ErrorCode::MathError, 0, 0),
            };

            if modify_market == Some(*asset) {
                // a withdrawal removes discounted collateral; count it
                // against the borrow side rather than resizing both
                sum_borrow_plus_effects = match tokens_to_denom
                    .mul_scalar_truncate_add(redeem_tokens, sum_borrow_plus_effects)
                {
                    Ok(value) => value,
                    Err(_) => return (ErrorCode::MathError, 0, 0),
                };

                sum_borrow_plus_effects = match price
                    .mul_scalar_truncate_add(borrow_amount, sum_borrow_plus_effects)
                {
                    Ok(value) => value,
                    Err(_) => return (ErrorCode::MathError, 0, 0),
                };
            }
        }

        if sum_collateral > sum_borrow_plus_effects {
            (
                ErrorCode::NoError,
                sum_collateral - sum_borrow_plus_effects,
                0,
            )
        } else {
            (
                ErrorCode::NoError,
                0,
                sum_borrow_plus_effects - sum_collateral,
            )
        }
    }
}
