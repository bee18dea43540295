//! Admission hooks
//!
//! Markets call these before mutating a position; a hook answers with a
//! soft `ErrorCode` the market turns into its own failure, except where
//! an operation is paused or the call itself is malformed, which aborts
//! hard. Hooks never emit `Failure` events; the code is the answer.

use lendcore_core::{Address, ErrorCode};

use crate::engine::RiskEngine;
use crate::error::EngineError;

impl RiskEngine {
    /// Whether `minter` may mint in `market`.
    pub fn mint_allowed(
        &self,
        market: Address,
        _minter: Address,
        _mint_amount: u128,
    ) -> Result<ErrorCode, EngineError> {
        if self.market(&market).map(|m| m.mint_paused).unwrap_or(false) {
            return Err(EngineError::MintPaused);
        }
        if !self.is_listed(&market) {
            return Ok(ErrorCode::MarketNotListed);
        }
        Ok(ErrorCode::NoError)
    }

    /// Whether `redeemer` may withdraw `redeem_tokens` from `market`.
    pub fn redeem_allowed(
        &self,
        market: Address,
        redeemer: Address,
        redeem_tokens: u128,
    ) -> ErrorCode {
        self.redeem_allowed_internal(&market, &redeemer, redeem_tokens)
    }

    pub(crate) fn redeem_allowed_internal(
        &self,
        market: &Address,
        redeemer: &Address,
        redeem_tokens: u128,
    ) -> ErrorCode {
        if !self.is_listed(market) {
            return ErrorCode::MarketNotListed;
        }

        // a non-member's tokens back no borrow, so any withdrawal is fine
        if !self.check_membership(redeemer, market) {
            return ErrorCode::NoError;
        }

        let (code, _, shortfall) =
            self.hypothetical_liquidity_internal(redeemer, Some(*market), redeem_tokens, 0);
        if !code.is_no_error() {
            return code;
        }
        if shortfall > 0 {
            return ErrorCode::InsufficientLiquidity;
        }
        ErrorCode::NoError
    }

    /// Post-redeem consistency check: a nonzero underlying payout must
    /// burn a nonzero number of pool tokens.
    pub fn redeem_verify(
        &self,
        _market: Address,
        _redeemer: Address,
        redeem_amount: u128,
        redeem_tokens: u128,
    ) -> Result<(), EngineError> {
        if redeem_tokens == 0 && redeem_amount > 0 {
            return Err(EngineError::RedeemTokensZero);
        }
        Ok(())
    }

    /// Whether `borrower` may draw `borrow_amount` from `market`.
    ///
    /// A borrower who never entered the market is entered automatically,
    /// but only the market itself may trigger that on their behalf.
    pub fn borrow_allowed(
        &mut self,
        caller: Address,
        market: Address,
        borrower: Address,
        borrow_amount: u128,
    ) -> Result<ErrorCode, EngineError> {
        if self.market(&market).map(|m| m.borrow_paused).unwrap_or(false) {
            return Err(EngineError::BorrowPaused);
        }
        if !self.is_listed(&market) {
            return Ok(ErrorCode::MarketNotListed);
        }

        if !self.check_membership(&borrower, &market) {
            if caller != market {
                return Err(EngineError::SenderMustBeMarket);
            }
            let code = self.add_to_market(market, borrower);
            if !code.is_no_error() {
                return Ok(code);
            }
        }

        if self.oracle().underlying_price(&market) == 0 {
            return Ok(ErrorCode::PriceError);
        }

        let borrow_cap = self
            .market(&market)
            .map(|m| m.borrow_cap)
            .unwrap_or(0);
        if borrow_cap != 0 {
            let total_borrows = self.market_contract(&market)?.total_borrows();
            let next_total = total_borrows
                .checked_add(borrow_amount)
                .ok_or(EngineError::BorrowCapReached)?;
            if next_total >= borrow_cap {
                return Err(EngineError::BorrowCapReached);
            }
        }

        let (code, _, shortfall) =
            self.hypothetical_liquidity_internal(&borrower, Some(market), 0, borrow_amount);
        if !code.is_no_error() {
            return Ok(code);
        }
        if shortfall > 0 {
            return Ok(ErrorCode::InsufficientLiquidity);
        }
        Ok(ErrorCode::NoError)
    }

    /// Whether `src` may transfer `transfer_tokens` of `market` away.
    pub fn transfer_allowed(
        &self,
        market: Address,
        src: Address,
        _dst: Address,
        transfer_tokens: u128,
    ) -> Result<ErrorCode, EngineError> {
        if self.transfer_guardian_paused() {
            return Err(EngineError::TransferPaused);
        }
        Ok(self.redeem_allowed_internal(&market, &src, transfer_tokens))
    }

    /// Whether a liquidation may seize `market_collateral` tokens to
    /// settle a borrow in `market_borrowed`.
    pub fn seize_allowed(
        &self,
        market_collateral: Address,
        market_borrowed: Address,
        _liquidator: Address,
        _borrower: Address,
        _seize_tokens: u128,
    ) -> Result<ErrorCode, EngineError> {
        if self.seize_guardian_paused() {
            return Err(EngineError::SeizePaused);
        }
        if !self.is_listed(&market_collateral) || !self.is_listed(&market_borrowed) {
            return Ok(ErrorCode::MarketNotListed);
        }

        let collateral = self.market_contract(&market_collateral)?;
        let borrowed = self.market_contract(&market_borrowed)?;
        if collateral.controller() != borrowed.controller() {
            return Ok(ErrorCode::ControllerMismatch);
        }
        Ok(ErrorCode::NoError)
    }
}
