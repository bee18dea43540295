//! Decimal input parsing
//!
//! Command-line rates arrive as decimal strings ("0.75", "1.1") and
//! become 10^18-scaled mantissas, to at most 18 fractional digits.

use anyhow::{ensure, Context};
use lendcore_core::EXP_SCALE;
use std::str::FromStr;

/// A 10^18-scaled fixed-point value parsed from a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mantissa(pub u128);

impl FromStr for Mantissa {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        ensure!(!whole.is_empty() || !frac.is_empty(), "empty number");
        ensure!(frac.len() <= 18, "at most 18 decimal places");

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().context("invalid whole part")?
        };
        let frac_units: u128 = if frac.is_empty() {
            0
        } else {
            frac.parse().context("invalid fractional part")?
        };
        let frac_scale = 10u128.pow((18 - frac.len()) as u32);

        whole
            .checked_mul(EXP_SCALE)
            .and_then(|scaled| scaled.checked_add(frac_units * frac_scale))
            .map(Mantissa)
            .context("value too large")
    }
}
