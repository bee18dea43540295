//! Risk engine storage
//!
//! Field order here is load-bearing: `CORE_STORAGE_LAYOUT` mirrors the
//! declaration order of `CoreState`, and the proxy shell only adopts an
//! implementation whose layout extends the active one append-only. New
//! fields go at the end, always.

use lendcore_core::{Address, EXP_SCALE};
use lendcore_market::MarketContract;
use lendcore_oracle::PriceOracle;
use lendcore_proxy::FieldDef;
use std::collections::HashMap;
use std::rc::Rc;

/// closeFactor must sit in (0.05, 0.9].
pub const CLOSE_FACTOR_MIN_MANTISSA: u128 = EXP_SCALE / 20;
pub const CLOSE_FACTOR_MAX_MANTISSA: u128 = EXP_SCALE * 9 / 10;

/// A market's collateral factor may not exceed 0.9.
pub const COLLATERAL_FACTOR_MAX_MANTISSA: u128 = EXP_SCALE * 9 / 10;

/// liquidationIncentive must sit in [1.0, 1.5].
pub const LIQUIDATION_INCENTIVE_MIN_MANTISSA: u128 = EXP_SCALE;
pub const LIQUIDATION_INCENTIVE_MAX_MANTISSA: u128 = EXP_SCALE * 3 / 2;

/// 0.051, applied when a fresh engine is adopted with no value set.
pub const DEFAULT_CLOSE_FACTOR_MANTISSA: u128 = 51_000_000_000_000_000;

/// 1.0, no seizure bonus until governance raises it.
pub const DEFAULT_LIQUIDATION_INCENTIVE_MANTISSA: u128 = EXP_SCALE;

/// Per-market registry entry.
#[derive(Debug, Default)]
pub struct Market {
    pub is_listed: bool,
    pub collateral_factor_mantissa: u128,
    pub mint_paused: bool,
    pub borrow_paused: bool,
    /// 0 means no cap.
    pub borrow_cap: u128,
    pub(crate) account_membership: HashMap<Address, bool>,
}

impl Market {
    pub fn is_member(&self, account: &Address) -> bool {
        self.account_membership.get(account).copied().unwrap_or(false)
    }
}

/// All engine storage, owned by the implementation and carried over
/// wholesale when the proxy swaps logic versions.
pub struct CoreState {
    pub admin: Address,
    pub pending_admin: Address,
    pub oracle: Rc<dyn PriceOracle>,
    pub close_factor_mantissa: u128,
    pub liquidation_incentive_mantissa: u128,
    pub markets: HashMap<Address, Market>,
    pub account_assets: HashMap<Address, Vec<Address>>,
    pub pause_guardian: Address,
    pub transfer_guardian_paused: bool,
    pub seize_guardian_paused: bool,
    pub(crate) market_contracts: HashMap<Address, Rc<dyn MarketContract>>,
}

impl CoreState {
    pub fn new(admin: Address, oracle: Rc<dyn PriceOracle>) -> Self {
        Self {
            admin,
            pending_admin: Address::ZERO,
            oracle,
            close_factor_mantissa: DEFAULT_CLOSE_FACTOR_MANTISSA,
            liquidation_incentive_mantissa: DEFAULT_LIQUIDATION_INCENTIVE_MANTISSA,
            markets: HashMap::new(),
            account_assets: HashMap::new(),
            pause_guardian: Address::ZERO,
            transfer_guardian_paused: false,
            seize_guardian_paused: false,
            market_contracts: HashMap::new(),
        }
    }
}

/// Declared storage layout of this engine version, in field order.
pub const CORE_STORAGE_LAYOUT: &[FieldDef] = &[
    FieldDef::new("admin", "Address"),
    FieldDef::new("pending_admin", "Address"),
    FieldDef::new("oracle", "Address"),
    FieldDef::new("close_factor_mantissa", "u128"),
    FieldDef::new("liquidation_incentive_mantissa", "u128"),
    FieldDef::new("markets", "map<Address,Market>"),
    FieldDef::new("account_assets", "map<Address,Vec<Address>>"),
    FieldDef::new("pause_guardian", "Address"),
    FieldDef::new("transfer_guardian_paused", "bool"),
    FieldDef::new("seize_guardian_paused", "bool"),
];
