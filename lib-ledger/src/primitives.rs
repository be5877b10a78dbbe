//! Canonical Primitive Types for the Bond Ledger
//!
//! Rule: No String identifiers in ledger state. Ever.
//!
//! These types are the foundational building blocks for all balance-critical
//! data structures. They are designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Efficient to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Token amounts in scaled units (supports up to ~340 undecillion units)
pub type Amount = u128;

/// Seconds since the Unix epoch
pub type Timestamp = u64;

// ============================================================================
// FIXED-POINT SCALE
// ============================================================================

/// Decimal places carried by every [`Amount`]
pub const DECIMALS: u32 = 8;

/// Fixed-point scale factor (10^8). One whole unit of any asset is
/// `SCALE` in ledger representation; rates are fractions of `SCALE`.
pub const SCALE: Amount = 100_000_000;

/// Convert whole units into scaled ledger representation.
///
/// `scaled(100)` is one hundred whole units, i.e. `100 * 10^8`.
pub const fn scaled(units: u128) -> Amount {
    units * SCALE
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte account identifier
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Create a new AccountId from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed AccountId
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero account
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_basics() {
        let account = AccountId::new([1u8; 32]);
        assert!(!account.is_zero());
        assert_eq!(account.as_bytes(), &[1u8; 32]);

        let zero = AccountId::zero();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_scaled_values() {
        assert_eq!(scaled(0), 0);
        assert_eq!(scaled(1), 100_000_000);
        assert_eq!(scaled(1_000), 100_000_000_000);
        assert_eq!(SCALE, 10u128.pow(DECIMALS));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let account = AccountId::new([42u8; 32]);
        let serialized = bincode::serialize(&account).unwrap();
        let deserialized: AccountId = bincode::deserialize(&serialized).unwrap();
        assert_eq!(account, deserialized);
    }

    #[test]
    fn test_from_array() {
        let bytes = [5u8; 32];
        let account: AccountId = bytes.into();
        assert_eq!(account.0, bytes);
    }

    #[test]
    fn test_debug_truncates_display_does_not() {
        let account = AccountId::new([0xabu8; 32]);
        assert_eq!(format!("{:?}", account), "AccountId(abababababababab)");
        assert_eq!(format!("{}", account).len(), 64);
    }
}
