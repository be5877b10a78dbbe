//! Multi-Asset Balance Ledger
//!
//! This crate provides the canonical account/asset balance map that every
//! higher layer settles against.
//!
//! # Key Rules
//!
//! 1. **Validate, then mutate**: An error from any operation means state is
//!    untouched
//! 2. **Conservation**: Per asset, the sum of balances always equals
//!    `minted - burned`
//! 3. **No String identifiers**: Accounts are 32-byte ids, assets a tagged enum
//!
//! # Usage
//!
//! ```ignore
//! use lib_ledger::{AccountId, AssetId, BalanceLedger};
//!
//! let mut ledger = BalanceLedger::new();
//! ledger.mint(treasury, AssetId::Stablecoin, amount)?;
//! ledger.transfer(treasury, buyer, AssetId::Stablecoin, amount)?;
//! ledger.check_conservation(AssetId::Stablecoin)?;
//! ```

pub mod asset;
pub mod errors;
pub mod ledger;
pub mod primitives;

pub use asset::{derive_series_code, AssetId};
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{AssetSupply, BalanceLedger};
pub use primitives::{scaled, AccountId, Amount, Timestamp, DECIMALS, SCALE};
