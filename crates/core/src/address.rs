//! Address - 20-byte identity for accounts, markets, and contracts
//!
//! The zero address doubles as "unset" for optional role slots
//! (pending admin, pause guardian), matching the wire conventions
//! external indexers expect.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte account/contract identity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address, used as the "unset" sentinel for role slots.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create an address whose low 8 bytes hold `value` (big-endian).
    ///
    /// Convenient for tests and deterministic fixtures.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Whether this is the zero (unset) address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Raw byte view.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}
