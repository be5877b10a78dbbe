//! Tokenized Bond Treasury
//!
//! Order settlement, custody fees, liquidity pools, and native-currency
//! conversion for a multi-asset bond ledger, driven through one serial
//! engine.
//!
//! # Key Rules
//!
//! 1. **One engine, serial operations**: every mutation is a `&mut self`
//!    method that validates completely before touching state
//! 2. **Capabilities, not identities**: admin and minter checks run first
//!    and fail `Unauthorized` without side effects
//! 3. **Everything is ledgered**: order proceeds, custody fees, and pool
//!    reserves are ordinary balances, so conservation covers them all
//!
//! # Usage
//!
//! ```ignore
//! use lib_treasury::{CapabilitySet, TreasuryConfig, TreasuryEngine};
//!
//! let capabilities = CapabilitySet::with_admin(admin);
//! let mut engine = TreasuryEngine::with_system_clock(config, capabilities);
//! engine.set_series_properties(admin, series_code, terms)?;
//! let receipt = engine.order_by_stablecoin(buyer, series_code, payment)?;
//! ```

pub mod authority;
pub mod clock;
pub mod config;
pub mod custody;
pub mod engine;
pub mod errors;
pub mod orders;
pub mod registry;
pub mod shared;

pub use authority::{Capability, CapabilitySet};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TreasuryConfig;
pub use custody::{custody_fee, TransferReceipt};
pub use engine::{ConversionReceipt, LiquidityReceipt, SwapReceipt, TreasuryEngine};
pub use errors::{TreasuryError, TreasuryResult};
pub use orders::OrderReceipt;
pub use registry::{BondRegistry, LotProperties, SeriesProperties};
pub use shared::SharedTreasury;

pub use lib_market::{Pool, PoolId, SwapDirection};
