//! Command implementations
//!
//! Each command builds a throwaway in-memory protocol around the risk
//! engine, applies the requested inputs, and prints the outcome as one
//! JSON object per line.

use anyhow::{ensure, Result};
use lendcore_core::{Address, ErrorCode, EXP_SCALE};
use lendcore_market::{MarketContract, MockMarket};
use lendcore_oracle::MockOracle;
use lendcore_risk::{ProxiedCore, RiskEngine};
use std::rc::Rc;

use crate::Mantissa;

fn require_no_error(code: ErrorCode, what: &str) -> Result<()> {
    ensure!(code.is_no_error(), "{what} failed with code {code:?}");
    Ok(())
}

struct Sandbox {
    admin: Address,
    engine: RiskEngine,
    oracle: Rc<MockOracle>,
}

impl Sandbox {
    fn new() -> Self {
        let admin = Address::from_low_u64(1);
        let oracle = Rc::new(MockOracle::new(Address::from_low_u64(2)));
        let engine = RiskEngine::new(Address::from_low_u64(3), admin, oracle.clone());
        Self {
            admin,
            engine,
            oracle,
        }
    }

    fn market(&mut self, n: u64, price: Mantissa) -> Result<Rc<MockMarket>> {
        let market = Rc::new(MockMarket::new(
            Address::from_low_u64(n),
            self.engine.address(),
        ));
        self.oracle.set_underlying_price(market.address(), price.0);
        require_no_error(
            self.engine.support_market(self.admin, market.clone())?,
            "support market",
        )?;
        Ok(market)
    }
}

/// Evaluate (hypothetical) liquidity for a one-market position.
#[allow(clippy::too_many_arguments)]
pub fn liquidity(
    balance: u128,
    borrow: u128,
    collateral_factor: Mantissa,
    price: Mantissa,
    exchange_rate: Mantissa,
    redeem: u128,
    borrow_more: u128,
) -> Result<()> {
    let mut sandbox = Sandbox::new();
    let market = sandbox.market(10, price)?;
    require_no_error(
        sandbox
            .engine
            .set_collateral_factor(sandbox.admin, market.address(), collateral_factor.0),
        "set collateral factor",
    )?;
    market.set_exchange_rate(exchange_rate.0);

    let account = Address::from_low_u64(100);
    market.set_token_balance(account, balance);
    market.set_borrow_balance(account, borrow);
    for code in sandbox.engine.enter_markets(account, &[market.address()]) {
        require_no_error(code, "enter market")?;
    }

    let (code, liquidity, shortfall) = sandbox.engine.get_hypothetical_account_liquidity(
        &account,
        market.address(),
        redeem,
        borrow_more,
    );
    println!(
        "{}",
        serde_json::json!({
            "code": code,
            "liquidity": liquidity.to_string(),
            "shortfall": shortfall.to_string(),
        })
    );
    Ok(())
}

/// Compute collateral tokens seized for repaying `repay` underlying.
pub fn seize(
    repay: u128,
    incentive: Mantissa,
    price_borrowed: Mantissa,
    price_collateral: Mantissa,
    exchange_rate: Mantissa,
) -> Result<()> {
    let mut sandbox = Sandbox::new();
    let borrowed = sandbox.market(10, price_borrowed)?;
    let collateral = sandbox.market(11, price_collateral)?;
    collateral.set_exchange_rate(exchange_rate.0);
    require_no_error(
        sandbox.engine.set_liquidation_incentive(sandbox.admin, incentive.0),
        "set liquidation incentive",
    )?;

    let (code, tokens) = sandbox.engine.liquidate_calculate_seize_tokens(
        borrowed.address(),
        collateral.address(),
        repay,
    )?;
    println!(
        "{}",
        serde_json::json!({
            "code": code,
            "seize_tokens": tokens.to_string(),
        })
    );
    Ok(())
}

/// Walk a two-market scenario behind the proxy and print its events.
pub fn demo() -> Result<()> {
    let admin = Address::from_low_u64(0xad);
    let engine_address = Address::from_low_u64(0x10);
    let oracle = Rc::new(MockOracle::new(Address::from_low_u64(0x0a)));

    let mut core = ProxiedCore::new(admin);
    core.shell_mut().set_pending_implementation(admin, engine_address);
    core.become_implementation(admin, RiskEngine::new(engine_address, admin, oracle.clone()))?;

    let stable = Rc::new(MockMarket::new(Address::from_low_u64(0x100), engine_address));
    let volatile = Rc::new(MockMarket::new(Address::from_low_u64(0x200), engine_address));
    oracle.set_underlying_price(stable.address(), EXP_SCALE);
    oracle.set_underlying_price(volatile.address(), 2_000 * EXP_SCALE);

    let engine = core.engine_mut()?;
    require_no_error(engine.support_market(admin, stable.clone())?, "list stable market")?;
    require_no_error(
        engine.support_market(admin, volatile.clone())?,
        "list volatile market",
    )?;
    require_no_error(
        engine.set_collateral_factor(admin, volatile.address(), 3 * EXP_SCALE / 4),
        "set collateral factor",
    )?;

    let borrower = Address::from_low_u64(0xb0b);
    volatile.set_token_balance(borrower, 10);
    for code in engine.enter_markets(borrower, &[volatile.address()]) {
        require_no_error(code, "enter market")?;
    }

    let (code, liquidity, shortfall) = engine.get_account_liquidity(&borrower);
    require_no_error(code, "account liquidity")?;
    tracing::info!(liquidity, shortfall, "borrower position");

    let code = engine.borrow_allowed(stable.address(), stable.address(), borrower, 5_000)?;
    tracing::info!(?code, "borrow 5000 stable");

    for event in engine.take_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
