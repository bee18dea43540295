//! Lendcore Core - Domain types
//!
//! This crate contains the fundamental types used across Lendcore:
//! - `Address`: 20-byte identity for accounts, markets, and contracts
//! - `Exp`: 10^18-scaled fixed-point value with checked arithmetic
//! - `ErrorCode` / `FailureInfo`: the soft-failure taxonomy shared by the
//!   risk engine and the proxy shell

pub mod address;
pub mod codes;
pub mod exp;

pub use address::Address;
pub use codes::{ErrorCode, FailureInfo};
pub use exp::{Exp, MathError, EXP_SCALE};
