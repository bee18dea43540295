//! Risk engine - registry, governance, and account membership
//!
//! The engine owns all protocol risk state. Governance setters follow
//! the soft-failure convention (code plus `Failure` event) for policy
//! rejections and hard `EngineError` for calls that may not proceed at
//! all. Admission hooks live in `hooks`, liquidity math in `liquidity`.

use lendcore_core::{Address, ErrorCode, FailureInfo};
use lendcore_market::MarketContract;
use lendcore_oracle::PriceOracle;
use lendcore_proxy::StorageLayout;
use std::rc::Rc;

use crate::error::EngineError;
use crate::events::{PauseAction, ProtocolEvent};
use crate::state::{
    CoreState, Market, CLOSE_FACTOR_MAX_MANTISSA, CLOSE_FACTOR_MIN_MANTISSA,
    COLLATERAL_FACTOR_MAX_MANTISSA, CORE_STORAGE_LAYOUT, DEFAULT_CLOSE_FACTOR_MANTISSA,
    DEFAULT_LIQUIDATION_INCENTIVE_MANTISSA, LIQUIDATION_INCENTIVE_MAX_MANTISSA,
    LIQUIDATION_INCENTIVE_MIN_MANTISSA,
};

/// The protocol's central risk controller.
pub struct RiskEngine {
    address: Address,
    pub(crate) state: CoreState,
    pub(crate) events: Vec<ProtocolEvent>,
}

impl RiskEngine {
    /// A fresh engine instance at `address`, administered by `admin`.
    pub fn new(address: Address, admin: Address, oracle: Rc<dyn PriceOracle>) -> Self {
        Self {
            address,
            state: CoreState::new(admin, oracle),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn admin(&self) -> Address {
        self.state.admin
    }

    pub fn oracle(&self) -> &Rc<dyn PriceOracle> {
        &self.state.oracle
    }

    pub fn close_factor_mantissa(&self) -> u128 {
        self.state.close_factor_mantissa
    }

    pub fn liquidation_incentive_mantissa(&self) -> u128 {
        self.state.liquidation_incentive_mantissa
    }

    pub fn pause_guardian(&self) -> Address {
        self.state.pause_guardian
    }

    pub fn transfer_guardian_paused(&self) -> bool {
        self.state.transfer_guardian_paused
    }

    pub fn seize_guardian_paused(&self) -> bool {
        self.state.seize_guardian_paused
    }

    /// Registry entry for `market`, if it was ever listed.
    pub fn market(&self, market: &Address) -> Option<&Market> {
        self.state.markets.get(market)
    }

    /// The markets `account` has entered, in entry order (subject to
    /// swap-removal on exit).
    pub fn assets_in(&self, account: &Address) -> &[Address] {
        self.state
            .account_assets
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `account` is a member of `market`.
    pub fn check_membership(&self, account: &Address, market: &Address) -> bool {
        self.state
            .markets
            .get(market)
            .map(|m| m.is_member(account))
            .unwrap_or(false)
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[ProtocolEvent] {
        &self.events
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<ProtocolEvent> {
        std::mem::take(&mut self.events)
    }

    /// The storage layout this engine version declares to the proxy.
    pub fn storage_layout(&self) -> StorageLayout {
        StorageLayout::new(CORE_STORAGE_LAYOUT)
    }

    pub(crate) fn fail(&mut self, error: ErrorCode, info: FailureInfo) -> ErrorCode {
        tracing::debug!(?error, ?info, "engine soft failure");
        self.events.push(ProtocolEvent::Failure { error, info });
        error
    }

    pub(crate) fn market_contract(
        &self,
        market: &Address,
    ) -> Result<Rc<dyn MarketContract>, EngineError> {
        self.state
            .market_contracts
            .get(market)
            .cloned()
            .ok_or(EngineError::UnknownMarket { market: *market })
    }

    pub(crate) fn is_listed(&self, market: &Address) -> bool {
        self.state
            .markets
            .get(market)
            .map(|m| m.is_listed)
            .unwrap_or(false)
    }

    // ---- governance ----

    /// Bring a new market under the engine's control. Admin only. The
    /// contract must identify as a market token or the call aborts.
    pub fn support_market(
        &mut self,
        caller: Address,
        contract: Rc<dyn MarketContract>,
    ) -> Result<ErrorCode, EngineError> {
        if caller != self.state.admin {
            return Ok(self.fail(ErrorCode::Unauthorized, FailureInfo::SupportMarketOwnerCheck));
        }

        let market = contract.address();
        if self.is_listed(&market) {
            return Ok(self.fail(ErrorCode::MarketAlreadyListed, FailureInfo::SupportMarketExists));
        }

        if !contract.is_market_token() {
            return Err(EngineError::NotMarketToken { market });
        }

        self.state.markets.insert(
            market,
            Market {
                is_listed: true,
                ..Default::default()
            },
        );
        self.state.market_contracts.insert(market, contract);

        tracing::debug!(%market, "market listed");
        self.events.push(ProtocolEvent::MarketListed { market });
        Ok(ErrorCode::NoError)
    }

    /// Set a listed market's collateral factor. Checks run in order:
    /// admin, listed, bound, then price (a nonzero factor needs a
    /// nonzero oracle price to back it).
    pub fn set_collateral_factor(
        &mut self,
        caller: Address,
        market: Address,
        new_mantissa: u128,
    ) -> ErrorCode {
        if caller != self.state.admin {
            return self.fail(
                ErrorCode::Unauthorized,
                FailureInfo::SetCollateralFactorOwnerCheck,
            );
        }

        if !self.is_listed(&market) {
            return self.fail(
                ErrorCode::MarketNotListed,
                FailureInfo::SetCollateralFactorNoExists,
            );
        }

        if new_mantissa > COLLATERAL_FACTOR_MAX_MANTISSA {
            return self.fail(
                ErrorCode::InvalidCollateralFactor,
                FailureInfo::SetCollateralFactorValidation,
            );
        }

        if new_mantissa != 0 && self.state.oracle.underlying_price(&market) == 0 {
            return self.fail(
                ErrorCode::PriceError,
                FailureInfo::SetCollateralFactorWithoutPrice,
            );
        }

        let entry = self
            .state
            .markets
            .get_mut(&market)
            .expect("listed market has a registry entry");
        let old_mantissa = entry.collateral_factor_mantissa;
        entry.collateral_factor_mantissa = new_mantissa;

        self.events.push(ProtocolEvent::NewCollateralFactor {
            market,
            old_mantissa,
            new_mantissa,
        });
        ErrorCode::NoError
    }

    /// Set the close factor. Admin only; must sit in (0.05, 0.9].
    pub fn set_close_factor(&mut self, caller: Address, new_mantissa: u128) -> ErrorCode {
        if caller != self.state.admin {
            return self.fail(ErrorCode::Unauthorized, FailureInfo::SetCloseFactorOwnerCheck);
        }

        if new_mantissa <= CLOSE_FACTOR_MIN_MANTISSA || new_mantissa > CLOSE_FACTOR_MAX_MANTISSA {
            return self.fail(
                ErrorCode::InvalidCloseFactor,
                FailureInfo::SetCloseFactorValidation,
            );
        }

        let old_mantissa = self.state.close_factor_mantissa;
        self.state.close_factor_mantissa = new_mantissa;
        self.events.push(ProtocolEvent::NewCloseFactor {
            old_mantissa,
            new_mantissa,
        });
        ErrorCode::NoError
    }

    /// Set the liquidation incentive. Admin only; must sit in [1.0, 1.5].
    pub fn set_liquidation_incentive(&mut self, caller: Address, new_mantissa: u128) -> ErrorCode {
        if caller != self.state.admin {
            return self.fail(
                ErrorCode::Unauthorized,
                FailureInfo::SetLiquidationIncentiveOwnerCheck,
            );
        }

        if new_mantissa < LIQUIDATION_INCENTIVE_MIN_MANTISSA
            || new_mantissa > LIQUIDATION_INCENTIVE_MAX_MANTISSA
        {
            return self.fail(
                ErrorCode::InvalidLiquidationIncentive,
                FailureInfo::SetLiquidationIncentiveValidation,
            );
        }

        let old_mantissa = self.state.liquidation_incentive_mantissa;
        self.state.liquidation_incentive_mantissa = new_mantissa;
        self.events.push(ProtocolEvent::NewLiquidationIncentive {
            old_mantissa,
            new_mantissa,
        });
        ErrorCode::NoError
    }

    /// Swap the price oracle. Admin only.
    pub fn set_price_oracle(
        &mut self,
        caller: Address,
        new_oracle: Rc<dyn PriceOracle>,
    ) -> ErrorCode {
        if caller != self.state.admin {
            return self.fail(ErrorCode::Unauthorized, FailureInfo::SetPriceOracleOwnerCheck);
        }

        let old_oracle = self.state.oracle.address();
        let new_address = new_oracle.address();
        self.state.oracle = new_oracle;
        self.events.push(ProtocolEvent::NewPriceOracle {
            old_oracle,
            new_oracle: new_address,
        });
        ErrorCode::NoError
    }

    /// Appoint the pause guardian. Admin only.
    pub fn set_pause_guardian(&mut self, caller: Address, new_guardian: Address) -> ErrorCode {
        if caller != self.state.admin {
            return self.fail(
                ErrorCode::Unauthorized,
                FailureInfo::SetPauseGuardianOwnerCheck,
            );
        }

        let old_guardian = self.state.pause_guardian;
        self.state.pause_guardian = new_guardian;
        self.events.push(ProtocolEvent::NewPauseGuardian {
            old_guardian,
            new_guardian,
        });
        ErrorCode::NoError
    }

    // ---- pause switches ----

    fn check_pause_auth(&self, caller: Address, pausing: bool) -> Result<(), EngineError> {
        if caller != self.state.pause_guardian && caller != self.state.admin {
            return Err(EngineError::NotPauseGuardian);
        }
        // the guardian can flip the switch on but only admin turns it off
        if !pausing && caller != self.state.admin {
            return Err(EngineError::OnlyAdminCanUnpause);
        }
        Ok(())
    }

    fn set_market_pause(
        &mut self,
        caller: Address,
        market: Address,
        action: PauseAction,
        paused: bool,
    ) -> Result<bool, EngineError> {
        if !self.is_listed(&market) {
            return Err(EngineError::CannotPauseUnlistedMarket);
        }
        self.check_pause_auth(caller, paused)?;

        let entry = self
            .state
            .markets
            .get_mut(&market)
            .expect("listed market has a registry entry");
        match action {
            PauseAction::Mint => entry.mint_paused = paused,
            PauseAction::Borrow => entry.borrow_paused = paused,
            PauseAction::Transfer | PauseAction::Seize => unreachable!("global actions"),
        }

        tracing::warn!(%market, %action, paused, "market action pause changed");
        self.events.push(ProtocolEvent::ActionPaused {
            market: Some(market),
            action,
            state: paused,
        });
        Ok(paused)
    }

    pub fn set_mint_paused(
        &mut self,
        caller: Address,
        market: Address,
        paused: bool,
    ) -> Result<bool, EngineError> {
        self.set_market_pause(caller, market, PauseAction::Mint, paused)
    }

    pub fn set_borrow_paused(
        &mut self,
        caller: Address,
        market: Address,
        paused: bool,
    ) -> Result<bool, EngineError> {
        self.set_market_pause(caller, market, PauseAction::Borrow, paused)
    }

    pub fn set_transfer_paused(&mut self, caller: Address, paused: bool) -> Result<bool, EngineError> {
        self.check_pause_auth(caller, paused)?;
        self.state.transfer_guardian_paused = paused;
        tracing::warn!(paused, "transfer pause changed");
        self.events.push(ProtocolEvent::ActionPaused {
            market: None,
            action: PauseAction::Transfer,
            state: paused,
        });
        Ok(paused)
    }

    pub fn set_seize_paused(&mut self, caller: Address, paused: bool) -> Result<bool, EngineError> {
        self.check_pause_auth(caller, paused)?;
        self.state.seize_guardian_paused = paused;
        tracing::warn!(paused, "seize pause changed");
        self.events.push(ProtocolEvent::ActionPaused {
            market: None,
            action: PauseAction::Seize,
            state: paused,
        });
        Ok(paused)
    }

    /// Set per-market borrow caps; a cap of 0 removes the limit.
    /// Admin only, and the two slices must pair up.
    pub fn set_market_borrow_caps(
        &mut self,
        caller: Address,
        markets: &[Address],
        caps: &[u128],
    ) -> Result<(), EngineError> {
        if caller != self.state.admin {
            return Err(EngineError::OnlyAdminCanSetBorrowCaps);
        }
        if markets.is_empty() || markets.len() != caps.len() {
            return Err(EngineError::InvalidInput);
        }

        for (market, cap) in markets.iter().zip(caps.iter()) {
            let entry = self
                .state
                .markets
                .get_mut(market)
                .ok_or(EngineError::UnknownMarket { market: *market })?;
            entry.borrow_cap = *cap;
            self.events.push(ProtocolEvent::NewBorrowCap {
                market: *market,
                new_cap: *cap,
            });
        }
        Ok(())
    }

    // ---- account membership ----

    /// Enter each listed market in `markets` as collateral for `caller`.
    /// Returns one code per requested market; already-entered markets
    /// succeed idempotently.
    pub fn enter_markets(&mut self, caller: Address, markets: &[Address]) -> Vec<ErrorCode> {
        markets
            .iter()
            .map(|market| self.add_to_market(*market, caller))
            .collect()
    }

    pub(crate) fn add_to_market(&mut self, market: Address, borrower: Address) -> ErrorCode {
        let Some(entry) = self.state.markets.get_mut(&market) else {
            return ErrorCode::MarketNotListed;
        };
        if !entry.is_listed {
            return ErrorCode::MarketNotListed;
        }
        if entry.is_member(&borrower) {
            return ErrorCode::NoError;
        }

        entry.account_membership.insert(borrower, true);
        self.state
            .account_assets
            .entry(borrower)
            .or_default()
            .push(market);

        self.events.push(ProtocolEvent::MarketEntered {
            market,
            account: borrower,
        });
        ErrorCode::NoError
    }

    /// Remove `market` from `caller`'s collateral set. The position must
    /// be fully unwound: any outstanding borrow, or a withdrawal the
    /// remaining collateral cannot cover, blocks the exit. Exiting a
    /// market never entered is a successful no-op.
    pub fn exit_market(
        &mut self,
        caller: Address,
        market: Address,
    ) -> Result<ErrorCode, EngineError> {
        let contract = self.market_contract(&market)?;
        let snapshot = contract
            .account_snapshot(&caller)
            .map_err(|_| EngineError::SnapshotFailed { market })?;

        if snapshot.borrow_balance != 0 {
            return Ok(self.fail(
                ErrorCode::NonzeroBorrowBalance,
                FailureInfo::ExitMarketBalanceOwed,
            ));
        }

        let allowed = self.redeem_allowed_internal(&market, &caller, snapshot.token_balance);
        if !allowed.is_no_error() {
            return Ok(self.fail(ErrorCode::Rejection, FailureInfo::ExitMarketRejection));
        }

        let entry = self
            .state
            .markets
            .get_mut(&market)
            .expect("registered market has a registry entry");
        if !entry.is_member(&caller) {
            return Ok(ErrorCode::NoError);
        }
        entry.account_membership.remove(&caller);

        // order is not part of the contract, so take the O(1) removal
        let assets = self.state.account_assets.entry(caller).or_default();
        if let Some(index) = assets.iter().position(|a| *a == market) {
            assets.swap_remove(index);
        }

        self.events.push(ProtocolEvent::MarketExited {
            market,
            account: caller,
        });
        Ok(ErrorCode::NoError)
    }

    // ---- proxy adoption support ----

    pub(crate) fn into_state(self) -> CoreState {
        self.state
    }

    pub(crate) fn adopt_state(&mut self, state: CoreState) {
        self.state = state;
    }

    /// Applied when the proxy adopts this engine: the shell's admin wins,
    /// and unset risk parameters fall back to protocol defaults.
    pub(crate) fn align_with_shell(&mut self, shell_admin: Address) {
        self.state.admin = shell_admin;
        if self.state.close_factor_mantissa == 0 {
            self.state.close_factor_mantissa = DEFAULT_CLOSE_FACTOR_MANTISSA;
        }
        if self.state.liquidation_incentive_mantissa == 0 {
            self.state.liquidation_incentive_mantissa = DEFAULT_LIQUIDATION_INCENTIVE_MANTISSA;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{addr, fixture, ROOT};
    use lendcore_core::EXP_SCALE;
    use lendcore_market::MockMarket;
    use lendcore_oracle::MockOracle;

    #[test]
    fn test_fresh_engine_defaults() {
        let fix = fixture();
        assert_eq!(fix.engine.admin(), ROOT);
        assert_eq!(fix.engine.close_factor_mantissa(), DEFAULT_CLOSE_FACTOR_MANTISSA);
        assert_eq!(fix.engine.liquidation_incentive_mantissa(), EXP_SCALE);
        assert_eq!(fix.engine.pause_guardian(), Address::ZERO);
    }

    #[test]
    fn test_support_market_requires_admin() {
        let mut fix = fixture();
        let market = Rc::new(MockMarket::new(addr(50), fix.engine.address()));
        let code = fix.engine.support_market(addr(2), market).unwrap();
        assert_eq!(code, ErrorCode::Unauthorized);
        assert!(fix.engine.market(&addr(50)).is_none());
        assert_eq!(
            fix.engine.events().last(),
            Some(&ProtocolEvent::Failure {
                error: ErrorCode::Unauthorized,
                info: FailureInfo::SupportMarketOwnerCheck,
            })
        );
    }

    #[test]
    fn test_support_market_lists_once() {
        let mut fix = fixture();
        let market = Rc::new(MockMarket::new(addr(50), fix.engine.address()));

        let code = fix.engine.support_market(ROOT, market.clone()).unwrap();
        assert_eq!(code, ErrorCode::NoError);
        assert!(fix.engine.market(&addr(50)).unwrap().is_listed);
        assert!(fix
            .engine
            .events()
            .contains(&ProtocolEvent::MarketListed { market: addr(50) }));

        let code = fix.engine.support_market(ROOT, market).unwrap();
        assert_eq!(code, ErrorCode::MarketAlreadyListed);
    }

    #[test]
    fn test_support_market_rejects_non_market_token() {
        let mut fix = fixture();
        let imposter = Rc::new(MockMarket::not_a_market(addr(50), fix.engine.address()));
        let result = fix.engine.support_market(ROOT, imposter);
        assert_eq!(result, Err(EngineError::NotMarketToken { market: addr(50) }));
    }

    #[test]
    fn test_set_close_factor_bounds() {
        let mut fix = fixture();

        // not admin
        assert_eq!(
            fix.engine.set_close_factor(addr(2), EXP_SCALE / 2),
            ErrorCode::Unauthorized
        );

        // 0.05 is excluded, 0.9 included
        assert_eq!(
            fix.engine.set_close_factor(ROOT, CLOSE_FACTOR_MIN_MANTISSA),
            ErrorCode::InvalidCloseFactor
        );
        assert_eq!(
            fix.engine.set_close_factor(ROOT, CLOSE_FACTOR_MAX_MANTISSA + 1),
            ErrorCode::InvalidCloseFactor
        );
        assert_eq!(
            fix.engine.set_close_factor(ROOT, CLOSE_FACTOR_MAX_MANTISSA),
            ErrorCode::NoError
        );
        assert_eq!(fix.engine.close_factor_mantissa(), CLOSE_FACTOR_MAX_MANTISSA);
    }

    #[test]
    fn test_set_collateral_factor_check_order() {
        let mut fix = fixture();

        // not admin comes first
        assert_eq!(
            fix.engine.set_collateral_factor(addr(2), addr(50), EXP_SCALE / 2),
            ErrorCode::Unauthorized
        );

        // then unlisted
        assert_eq!(
            fix.engine.set_collateral_factor(ROOT, addr(50), EXP_SCALE / 2),
            ErrorCode::MarketNotListed
        );

        let market = fix.list_market(50);

        // then the 0.9 bound
        assert_eq!(
            fix.engine
                .set_collateral_factor(ROOT, market.address(), COLLATERAL_FACTOR_MAX_MANTISSA + 1),
            ErrorCode::InvalidCollateralFactor
        );

        // then the price backing: nonzero factor with no price fails
        assert_eq!(
            fix.engine
                .set_collateral_factor(ROOT, market.address(), EXP_SCALE / 2),
            ErrorCode::PriceError
        );
        // but zero is always allowed
        assert_eq!(
            fix.engine.set_collateral_factor(ROOT, market.address(), 0),
            ErrorCode::NoError
        );

        fix.oracle.set_underlying_price(market.address(), EXP_SCALE);
        assert_eq!(
            fix.engine
                .set_collateral_factor(ROOT, market.address(), EXP_SCALE / 2),
            ErrorCode::NoError
        );
        assert_eq!(
            fix.engine.market(&market.address()).unwrap().collateral_factor_mantissa,
            EXP_SCALE / 2
        );
        assert!(fix.engine.events().contains(&ProtocolEvent::NewCollateralFactor {
            market: market.address(),
            old_mantissa: 0,
            new_mantissa: EXP_SCALE / 2,
        }));
    }

    #[test]
    fn test_set_liquidation_incentive_bounds() {
        let mut fix = fixture();
        assert_eq!(
            fix.engine.set_liquidation_incentive(addr(2), EXP_SCALE),
            ErrorCode::Unauthorized
        );
        assert_eq!(
            fix.engine
                .set_liquidation_incentive(ROOT, LIQUIDATION_INCENTIVE_MIN_MANTISSA - 1),
            ErrorCode::InvalidLiquidationIncentive
        );
        assert_eq!(
            fix.engine
                .set_liquidation_incentive(ROOT, LIQUIDATION_INCENTIVE_MAX_MANTISSA + 1),
            ErrorCode::InvalidLiquidationIncentive
        );
        assert_eq!(
            fix.engine
                .set_liquidation_incentive(ROOT, LIQUIDATION_INCENTIVE_MAX_MANTISSA),
            ErrorCode::NoError
        );
    }

    #[test]
    fn test_set_price_oracle() {
        let mut fix = fixture();
        let old_address = fix.engine.oracle().address();
        let replacement = Rc::new(MockOracle::new(addr(77)));

        assert_eq!(
            fix.engine.set_price_oracle(addr(2), replacement.clone()),
            ErrorCode::Unauthorized
        );
        assert_eq!(
            fix.engine.set_price_oracle(ROOT, replacement),
            ErrorCode::NoError
        );
        assert_eq!(fix.engine.oracle().address(), addr(77));
        assert!(fix.engine.events().contains(&ProtocolEvent::NewPriceOracle {
            old_oracle: old_address,
            new_oracle: addr(77),
        }));
    }

    #[test]
    fn test_set_pause_guardian() {
        let mut fix = fixture();
        assert_eq!(
            fix.engine.set_pause_guardian(addr(2), addr(9)),
            ErrorCode::Unauthorized
        );
        assert_eq!(fix.engine.set_pause_guardian(ROOT, addr(9)), ErrorCode::NoError);
        assert_eq!(fix.engine.pause_guardian(), addr(9));
    }

    #[test]
    fn test_pause_requires_listed_market() {
        let mut fix = fixture();
        assert_eq!(
            fix.engine.set_mint_paused(ROOT, addr(50), true),
            Err(EngineError::CannotPauseUnlistedMarket)
        );
    }

    #[test]
    fn test_pause_authority_matrix() {
        let mut fix = fixture();
        let market = fix.list_market(50);
        fix.engine.set_pause_guardian(ROOT, addr(9));

        // strangers can do nothing
        assert_eq!(
            fix.engine.set_borrow_paused(addr(2), market.address(), true),
            Err(EngineError::NotPauseGuardian)
        );
        assert_eq!(
            fix.engine.set_transfer_paused(addr(2), true),
            Err(EngineError::NotPauseGuardian)
        );

        // the guardian can pause
        assert_eq!(
            fix.engine.set_borrow_paused(addr(9), market.address(), true),
            Ok(true)
        );
        assert_eq!(fix.engine.set_seize_paused(addr(9), true), Ok(true));

        // but only admin can unpause
        assert_eq!(
            fix.engine.set_borrow_paused(addr(9), market.address(), false),
            Err(EngineError::OnlyAdminCanUnpause)
        );
        assert_eq!(
            fix.engine.set_seize_paused(addr(9), false),
            Err(EngineError::OnlyAdminCanUnpause)
        );
        assert_eq!(
            fix.engine.set_borrow_paused(ROOT, market.address(), false),
            Ok(false)
        );
        assert_eq!(fix.engine.set_seize_paused(ROOT, false), Ok(false));
    }

    #[test]
    fn test_pause_emits_action_paused() {
        let mut fix = fixture();
        let market = fix.list_market(50);
        fix.engine.set_mint_paused(ROOT, market.address(), true).unwrap();
        assert!(fix.engine.events().contains(&ProtocolEvent::ActionPaused {
            market: Some(market.address()),
            action: PauseAction::Mint,
            state: true,
        }));

        fix.engine.set_transfer_paused(ROOT, true).unwrap();
        assert!(fix.engine.events().contains(&ProtocolEvent::ActionPaused {
            market: None,
            action: PauseAction::Transfer,
            state: true,
        }));
    }

    #[test]
    fn test_borrow_caps_admin_only_and_paired() {
        let mut fix = fixture();
        let market = fix.list_market(50);

        assert_eq!(
            fix.engine.set_market_borrow_caps(addr(2), &[market.address()], &[100]),
            Err(EngineError::OnlyAdminCanSetBorrowCaps)
        );
        assert_eq!(
            fix.engine.set_market_borrow_caps(ROOT, &[market.address()], &[100, 200]),
            Err(EngineError::InvalidInput)
        );
        assert_eq!(
            fix.engine.set_market_borrow_caps(ROOT, &[], &[]),
            Err(EngineError::InvalidInput)
        );

        fix.engine
            .set_market_borrow_caps(ROOT, &[market.address()], &[100])
            .unwrap();
        assert_eq!(fix.engine.market(&market.address()).unwrap().borrow_cap, 100);
        assert!(fix.engine.events().contains(&ProtocolEvent::NewBorrowCap {
            market: market.address(),
            new_cap: 100,
        }));
    }

    #[test]
    fn test_enter_markets_is_idempotent() {
        let mut fix = fixture();
        let market = fix.list_market(50);
        let account = addr(2);

        let codes = fix
            .engine
            .enter_markets(account, &[market.address(), market.address()]);
        assert_eq!(codes, vec![ErrorCode::NoError, ErrorCode::NoError]);
        assert_eq!(fix.engine.assets_in(&account), &[market.address()]);
        assert!(fix.engine.check_membership(&account, &market.address()));

        // one entry event, not two
        let entered = fix
            .engine
            .events()
            .iter()
            .filter(|e| matches!(e, ProtocolEvent::MarketEntered { .. }))
            .count();
        assert_eq!(entered, 1);
    }

    #[test]
    fn test_enter_markets_rejects_unlisted() {
        let mut fix = fixture();
        let listed = fix.list_market(50);
        let codes = fix.engine.enter_markets(addr(2), &[listed.address(), addr(51)]);
        assert_eq!(codes, vec![ErrorCode::NoError, ErrorCode::MarketNotListed]);
        assert_eq!(fix.engine.assets_in(&addr(2)), &[listed.address()]);
    }

    #[test]
    fn test_exit_market_swap_removes() {
        let mut fix = fixture();
        let omg = fix.list_market(50);
        let bat = fix.list_market(51);
        let zrx = fix.list_market(52);
        let account = addr(2);
        for market in [&omg, &bat, &zrx] {
            fix.oracle.set_underlying_price(market.address(), EXP_SCALE);
        }

        fix.engine
            .enter_markets(account, &[omg.address(), bat.address(), zrx.address()]);

        // removing the head swaps the tail into its place
        let code = fix.engine.exit_market(account, omg.address()).unwrap();
        assert_eq!(code, ErrorCode::NoError);
        assert_eq!(fix.engine.assets_in(&account), &[zrx.address(), bat.address()]);
        assert!(!fix.engine.check_membership(&account, &omg.address()));
    }

    #[test]
    fn test_exit_market_not_entered_is_noop() {
        let mut fix = fixture();
        let market = fix.list_market(50);
        let code = fix.engine.exit_market(addr(2), market.address()).unwrap();
        assert_eq!(code, ErrorCode::NoError);
        assert!(fix.engine.events().iter().all(|e| !matches!(
            e,
            ProtocolEvent::MarketExited { .. }
        )));
    }

    #[test]
    fn test_exit_market_blocked_by_borrow() {
        let mut fix = fixture();
        let market = fix.list_market(50);
        let account = addr(2);
        fix.engine.enter_markets(account, &[market.address()]);
        market.set_borrow_balance(account, 1);

        let code = fix.engine.exit_market(account, market.address()).unwrap();
        assert_eq!(code, ErrorCode::NonzeroBorrowBalance);
        assert!(fix.engine.check_membership(&account, &market.address()));
        assert_eq!(
            fix.engine.events().last(),
            Some(&ProtocolEvent::Failure {
                error: ErrorCode::NonzeroBorrowBalance,
                info: FailureInfo::ExitMarketBalanceOwed,
            })
        );
    }

    #[test]
    fn test_exit_market_aborts_on_snapshot_failure() {
        let mut fix = fixture();
        let market = fix.list_market(50);
        fix.engine.enter_markets(addr(2), &[market.address()]);
        market.fail_snapshots(true);

        let result = fix.engine.exit_market(addr(2), market.address());
        assert_eq!(
            result,
            Err(EngineError::SnapshotFailed {
                market: market.address()
            })
        );
    }

    #[test]
    fn test_exit_market_unknown_market_aborts() {
        let mut fix = fixture();
        let result = fix.engine.exit_market(addr(2), addr(50));
        assert_eq!(result, Err(EngineError::UnknownMarket { market: addr(50) }));
    }
}
