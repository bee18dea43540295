//! Liquidation seize math
//!
//! Converts an amount of repaid underlying into the number of
//! collateral pool tokens the liquidator receives, incentive included:
//!
//!   seize = repay * incentive * price_borrowed
//!               / (price_collateral * exchange_rate)

use lendcore_core::{Address, ErrorCode, Exp, MathError};

use crate::engine::RiskEngine;
use crate::error::EngineError;

impl RiskEngine {
    /// Number of `market_collateral` tokens to seize for repaying
    /// `repay_amount` of `market_borrowed`'s underlying. Missing prices
    /// and arithmetic overflow are soft; an unreadable exchange rate
    /// aborts.
    pub fn liquidate_calculate_seize_tokens(
        &self,
        market_borrowed: Address,
        market_collateral: Address,
        repay_amount: u128,
    ) -> Result<(ErrorCode, u128), EngineError> {
        let price_borrowed = self.oracle().underlying_price(&market_borrowed);
        let price_collateral = self.oracle().underlying_price(&market_collateral);
        if price_borrowed == 0 || price_collateral == 0 {
            return Ok((ErrorCode::PriceError, 0));
        }

        let contract = self.market_contract(&market_collateral)?;
        let exchange_rate = contract.exchange_rate_current().map_err(|_| {
            EngineError::ExchangeRateReadFailed {
                market: market_collateral,
            }
        })?;

        let seize = |engine: &Self| -> Result<u128, MathError> {
            let numerator = Exp::new(engine.liquidation_incentive_mantissa())
                .try_mul(Exp::new(price_borrowed))?;
            let denominator = Exp::new(price_collateral).try_mul(Exp::new(exchange_rate))?;
            numerator.try_div(denominator)?.mul_scalar_truncate(repay_amount)
        };

        match seize(self) {
            Ok(tokens) => Ok((ErrorCode::NoError, tokens)),
            Err(_) => Ok((ErrorCode::MathError, 0)),
        }
    }
}
