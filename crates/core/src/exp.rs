//! Exp - 10^18-scaled fixed-point arithmetic
//!
//! All protocol ratios (prices, exchange rates, collateral factors,
//! liquidation incentives) are unsigned integers scaled by 10^18
//! ("mantissas"). Mantissas are stored as `u128`; every multiply and
//! divide runs through a 256-bit intermediate so the only overflow
//! point is the final narrowing back to `u128`, which is checked and
//! reported as `MathError` rather than panicking.

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uint::construct_uint;

// 256-bit intermediate with 4 x 64-bit words
construct_uint! {
    struct U256(4);
}

/// One, expressed as a mantissa.
pub const EXP_SCALE: u128 = 1_000_000_000_000_000_000;

/// Errors from checked fixed-point arithmetic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("integer overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,
}

/// An unsigned fixed-point value, precise to 18 decimal places.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Exp {
    pub mantissa: u128,
}

impl Exp {
    /// Zero.
    pub const ZERO: Self = Self { mantissa: 0 };

    /// Wrap a raw mantissa.
    pub const fn new(mantissa: u128) -> Self {
        Self { mantissa }
    }

    /// One (1.0 scaled by 10^18).
    pub const fn one() -> Self {
        Self { mantissa: EXP_SCALE }
    }

    /// Whether the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    fn widened(self) -> U256 {
        U256::from(self.mantissa)
    }

    fn narrowed(value: U256) -> Result<Self, MathError> {
        let mantissa = u128::try_from(value).map_err(|_| MathError::Overflow)?;
        Ok(Self { mantissa })
    }

    /// `self * rhs`, truncating toward zero.
    pub fn try_mul(self, rhs: Exp) -> Result<Exp, MathError> {
        // Two u128 factors cannot overflow 256 bits.
        Self::narrowed(self.widened() * rhs.widened() / U256::from(EXP_SCALE))
    }

    /// `self / rhs`, truncating toward zero.
    pub fn try_div(self, rhs: Exp) -> Result<Exp, MathError> {
        if rhs.mantissa == 0 {
            return Err(MathError::DivisionByZero);
        }
        Self::narrowed(self.widened() * U256::from(EXP_SCALE) / rhs.widened())
    }

    /// `self + rhs` on the mantissa.
    pub fn try_add(self, rhs: Exp) -> Result<Exp, MathError> {
        self.mantissa
            .checked_add(rhs.mantissa)
            .map(Exp::new)
            .ok_or(MathError::Overflow)
    }

    /// `self * scalar`, truncated to a whole-unit `u128`.
    pub fn mul_scalar_truncate(self, scalar: u128) -> Result<u128, MathError> {
        let product = self.widened() * U256::from(scalar) / U256::from(EXP_SCALE);
        u128::try_from(product).map_err(|_| MathError::Overflow)
    }

    /// `self * scalar + addend`, truncated. The accumulation form used by
    /// the liquidity loop; commutative in the accumulated addend.
    pub fn mul_scalar_truncate_add(self, scalar: u128, addend: u128) -> Result<u128, MathError> {
        let truncated = self.mul_scalar_truncate(scalar)?;
        truncated.checked_add(addend).ok_or(MathError::Overflow)
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.mantissa / EXP_SCALE;
        let frac = self.mantissa % EXP_SCALE;
        write!(f, "{}.{:018}", whole, frac)
    }
}
