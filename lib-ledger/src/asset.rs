//! Asset Identifiers
//!
//! Every balance in the ledger is keyed by an [`AssetId`]. The id is a tagged
//! enum rather than a bare number, so different asset classes can never
//! collide no matter which codes hosts pick for series, lots, or pools.
//!
//! A flat `u128` codec is provided for hosts that key external storage by a
//! single integer. The class tag lives in the top 8 bits; payload layouts are
//! disjoint per class and decoding rejects anything that does not round-trip.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{LedgerError, LedgerResult};

const TAG_SHIFT: u32 = 120;
const TAG_STABLECOIN: u128 = 0;
const TAG_SERIES: u128 = 1;
const TAG_LOT: u128 = 2;
const TAG_POOL_SHARE: u128 = 3;
const PAYLOAD_MASK: u128 = (1u128 << TAG_SHIFT) - 1;

/// Derive a bond series code from its base code and expiration year.
///
/// `derive_series_code(100, 2030)` is `1_002_030`: the year occupies the
/// four low decimal digits, so two series of the same base code but
/// different maturities get distinct codes.
pub const fn derive_series_code(base_code: u64, expiration_year: u16) -> u64 {
    base_code * 10_000 + expiration_year as u64
}

/// Identifier of a single fungible asset tracked by the ledger
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AssetId {
    /// The settlement currency all prices and fees are denominated in
    Stablecoin,
    /// A bond series: fungible units sharing one set of terms
    BondSeries { code: u64 },
    /// A bond lot: the units minted by one purchase order against a series
    BondLot { series_code: u64, sequence: u32 },
    /// Liquidity shares of one market pool
    PoolShare { pool: u32 },
}

impl AssetId {
    /// Asset id of a bond series
    pub const fn series(code: u64) -> Self {
        Self::BondSeries { code }
    }

    /// Asset id of a bond lot within a series
    pub const fn lot(series_code: u64, sequence: u32) -> Self {
        Self::BondLot {
            series_code,
            sequence,
        }
    }

    /// Asset id of a pool's liquidity shares
    pub const fn pool_share(pool: u32) -> Self {
        Self::PoolShare { pool }
    }

    /// Bond tokens (series and lots) are subject to custody fees on transfer
    pub const fn is_bond_token(&self) -> bool {
        matches!(self, Self::BondSeries { .. } | Self::BondLot { .. })
    }

    /// Check if this is the settlement currency
    pub const fn is_stablecoin(&self) -> bool {
        matches!(self, Self::Stablecoin)
    }

    /// Encode into a single integer for hosts that key storage by `u128`.
    ///
    /// The stablecoin encodes as exactly `0`; every other class carries its
    /// tag in the top 8 bits, so encodings of different classes are disjoint.
    pub const fn to_u128(&self) -> u128 {
        match *self {
            Self::Stablecoin => 0,
            Self::BondSeries { code } => (TAG_SERIES << TAG_SHIFT) | code as u128,
            Self::BondLot {
                series_code,
                sequence,
            } => (TAG_LOT << TAG_SHIFT) | ((series_code as u128) << 32) | sequence as u128,
            Self::PoolShare { pool } => (TAG_POOL_SHARE << TAG_SHIFT) | pool as u128,
        }
    }

    /// Decode a [`to_u128`](Self::to_u128) encoding.
    ///
    /// Rejects unknown tags and payload bits outside the class layout, so
    /// every accepted value round-trips to the identical encoding.
    pub fn from_u128(value: u128) -> LedgerResult<Self> {
        let tag = value >> TAG_SHIFT;
        let payload = value & PAYLOAD_MASK;
        let asset = match tag {
            TAG_STABLECOIN if payload == 0 => Self::Stablecoin,
            TAG_SERIES if payload <= u64::MAX as u128 => Self::BondSeries {
                code: payload as u64,
            },
            TAG_LOT if payload < (1u128 << 96) => Self::BondLot {
                series_code: (payload >> 32) as u64,
                sequence: (payload & u32::MAX as u128) as u32,
            },
            TAG_POOL_SHARE if payload <= u32::MAX as u128 => Self::PoolShare {
                pool: payload as u32,
            },
            _ => return Err(LedgerError::InvalidAssetEncoding(value)),
        };
        Ok(asset)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stablecoin => write!(f, "stablecoin"),
            Self::BondSeries { code } => write!(f, "series:{code}"),
            Self::BondLot {
                series_code,
                sequence,
            } => write!(f, "lot:{series_code}.{sequence}"),
            Self::PoolShare { pool } => write!(f, "pool-share:{pool}"),
        }
    }
}
