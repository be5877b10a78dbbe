//! Constant-Product Market Maker
//!
//! Pure, deterministic pool math for bond/stablecoin pairs.
//!
//! # Design Principles
//!
//! 1. **Pure functions** - No side effects outside the pool passed in
//! 2. **Deterministic** - Same inputs produce identical outputs across all platforms
//! 3. **No floats** - All arithmetic uses u128 integers
//! 4. **Pool-favoring rounding** - The reserve product never decreases
//!
//! # Usage
//!
//! ```ignore
//! use lib_market::{apply_swap, Pool, SwapDirection};
//!
//! let mut pool = Pool::new(bond_asset, reference_price, fee_rate);
//! let outcome = apply_swap(&mut pool, SwapDirection::StableToBond, amount_in, min_out)?;
//! ```

pub mod errors;
pub mod math;
pub mod pool;

#[cfg(test)]
mod golden_vectors;

pub use errors::{MarketError, MarketResult};
pub use math::{
    apply_swap, net_of_fee, required_stable_for_bond, shares_for_deposit, swap_output,
    withdrawal_for_shares,
};
pub use pool::{Pool, PoolId, SwapDirection, SwapOutcome};
