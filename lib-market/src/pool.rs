//! Pool State
//!
//! A pool pairs one bond token with the stablecoin. Reserves, outstanding
//! shares, and fee parameters live here; the pricing rules live in
//! [`crate::math`].

use serde::{Deserialize, Serialize};

use lib_ledger::{Amount, AssetId};

/// Pool identifier, assigned sequentially by the engine that owns the pools
pub type PoolId = u32;

/// Which side of the pair is sold into the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell bond tokens, receive stablecoin
    BondToStable,
    /// Sell stablecoin, receive bond tokens
    StableToBond,
}

/// Constant-product pool pairing one bond token with the stablecoin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Bond-token side of the pair
    pub bond_asset: AssetId,
    /// Bond tokens held in reserve
    pub reserve_bond: Amount,
    /// Stablecoin held in reserve
    pub reserve_stable: Amount,
    /// Liquidity shares outstanding
    pub total_shares: Amount,
    /// Stablecoin per whole bond token, prices deposits into an empty pool
    pub reference_price: Amount,
    /// Swap fee as a fraction of [`lib_ledger::SCALE`], taken from the input
    pub fee_rate: Amount,
}

impl Pool {
    /// Create an empty pool with the given pricing parameters
    pub fn new(bond_asset: AssetId, reference_price: Amount, fee_rate: Amount) -> Self {
        Self {
            bond_asset,
            reserve_bond: 0,
            reserve_stable: 0,
            total_shares: 0,
            reference_price,
            fee_rate,
        }
    }

    /// True while the pool holds no reserves on either side
    pub fn is_empty(&self) -> bool {
        self.reserve_bond == 0 && self.reserve_stable == 0
    }

    /// The constant-product invariant value, `None` on overflow
    pub fn reserve_product(&self) -> Option<u128> {
        self.reserve_bond.checked_mul(self.reserve_stable)
    }
}

/// Result of a successfully applied swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// Direction the swap was taken in
    pub direction: SwapDirection,
    /// Input amount, fee included
    pub amount_in: Amount,
    /// Output amount credited to the trader
    pub amount_out: Amount,
    /// Fee portion of the input, retained by the pool reserves
    pub fee_paid: Amount,
}
