//! Treasury Configuration
//!
//! Fee-routing accounts and settlement rates. All rates are fractions of
//! [`lib_ledger::SCALE`]; accounts are plain ledger accounts the engine
//! credits, nothing more.

use serde::{Deserialize, Serialize};

use lib_ledger::{AccountId, Amount};

/// Account and rate configuration for the treasury engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryConfig {
    /// Receives the stablecoin proceeds of bond orders
    pub treasury: AccountId,
    /// Receives custody fees charged on bond-token transfers
    pub custody: AccountId,
    /// Income tax withholding account, reserved for redemption flows
    pub income_tax: AccountId,
    /// Financial-operations tax account, reserved for redemption flows
    pub iof: AccountId,
    /// Custody fee on bond-token transfers, fraction of SCALE. Not capped.
    pub custody_fee_rate: Amount,
    /// Stablecoin per whole native unit, at SCALE. Zero means native
    /// conversion is not configured and native-denominated calls fail.
    pub exchange_rate: Amount,
}

impl TreasuryConfig {
    /// Create a configuration with all rates unset
    pub fn new(
        treasury: AccountId,
        custody: AccountId,
        income_tax: AccountId,
        iof: AccountId,
    ) -> Self {
        Self {
            treasury,
            custody,
            income_tax,
            iof,
            custody_fee_rate: 0,
            exchange_rate: 0,
        }
    }

    /// Create a configuration with distinct placeholder accounts for tests
    pub fn for_testing() -> Self {
        Self::new(
            AccountId::new([250u8; 32]),
            AccountId::new([251u8; 32]),
            AccountId::new([252u8; 32]),
            AccountId::new([253u8; 32]),
        )
    }
}
