//! Bond Series and Lot Registry
//!
//! A series holds the commercial terms bonds are sold under; a lot is the
//! batch of units one order minted, with the terms it locked in at purchase.
//! Series terms may be corrected freely until the first lot is issued
//! against them, then they are immutable. Lot sequence numbers within a
//! series are never reused.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use lib_ledger::{Amount, AssetId, Timestamp};

use crate::errors::{TreasuryError, TreasuryResult};

/// Commercial terms of a bond series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesProperties {
    /// Annual interest rate, fraction of SCALE
    pub interest_rate: Amount,
    /// Minimum bond quantity per order, in scaled units
    pub min_purchase: Amount,
    /// Stablecoin per whole unit when the treasury sells
    pub unit_price_buy: Amount,
    /// Stablecoin per whole unit when the treasury redeems
    pub unit_price_sell: Amount,
    /// Maturity timestamp
    pub expiration: Timestamp,
}

/// Terms locked into a lot when its order settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotProperties {
    /// Units minted
    pub quantity: Amount,
    /// Interest rate captured from the series at purchase
    pub rate: Amount,
    /// When the order settled
    pub purchase_ts: Timestamp,
    /// Accrual reference, equals `purchase_ts` until adjusted
    pub reference_ts: Timestamp,
    /// Unit price paid
    pub purchase_price: Amount,
    /// Maturity timestamp captured from the series
    pub expiration: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SeriesEntry {
    properties: SeriesProperties,
    next_sequence: u32,
}

/// Registry of series terms and per-lot purchase records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BondRegistry {
    series: HashMap<u64, SeriesEntry>,
    lots: HashMap<AssetId, LotProperties>,
}

impl BondRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series or correct its terms.
    ///
    /// # Rules
    ///
    /// - `unit_price_buy` and `min_purchase` must be positive
    /// - Terms are frozen once any lot has been issued against the series
    pub fn set_series(&mut self, code: u64, properties: SeriesProperties) -> TreasuryResult<()> {
        if properties.unit_price_buy == 0 {
            return Err(TreasuryError::InvalidParameter(
                "unit price must be positive".to_string(),
            ));
        }
        if properties.min_purchase == 0 {
            return Err(TreasuryError::InvalidParameter(
                "minimum purchase must be positive".to_string(),
            ));
        }
        match self.series.get_mut(&code) {
            Some(entry) if entry.next_sequence > 0 => Err(TreasuryError::InvalidParameter(
                format!("series {code} already has issued lots"),
            )),
            Some(entry) => {
                entry.properties = properties;
                Ok(())
            }
            None => {
                self.series.insert(
                    code,
                    SeriesEntry {
                        properties,
                        next_sequence: 0,
                    },
                );
                Ok(())
            }
        }
    }

    /// Terms of a series
    pub fn series(&self, code: u64) -> TreasuryResult<SeriesProperties> {
        self.series
            .get(&code)
            .map(|entry| entry.properties)
            .ok_or_else(|| TreasuryError::NotFound(format!("series {code}")))
    }

    /// Check if a series is registered
    pub fn has_series(&self, code: u64) -> bool {
        self.series.contains_key(&code)
    }

    /// Number of lots issued against a series
    pub fn sequences_issued(&self, code: u64) -> u32 {
        self.series
            .get(&code)
            .map(|entry| entry.next_sequence)
            .unwrap_or(0)
    }

    /// Claim the next lot sequence number for a series. Sequences start at 1
    /// and are never reused, even if a later step of the order fails.
    pub fn allocate_sequence(&mut self, code: u64) -> TreasuryResult<u32> {
        let entry = self
            .series
            .get_mut(&code)
            .ok_or_else(|| TreasuryError::NotFound(format!("series {code}")))?;
        let sequence = entry
            .next_sequence
            .checked_add(1)
            .ok_or(TreasuryError::Overflow)?;
        entry.next_sequence = sequence;
        Ok(sequence)
    }

    /// Record the purchase terms of a freshly minted lot
    pub fn record_lot(&mut self, lot: AssetId, properties: LotProperties) -> TreasuryResult<()> {
        if !matches!(lot, AssetId::BondLot { .. }) {
            return Err(TreasuryError::InvalidParameter(format!(
                "{lot} is not a bond lot"
            )));
        }
        if self.lots.contains_key(&lot) {
            return Err(TreasuryError::InvalidParameter(format!(
                "lot {lot} already recorded"
            )));
        }
        self.lots.insert(lot, properties);
        Ok(())
    }

    /// Write the recorded terms of a lot, inserting or overwriting. Orders
    /// record lots themselves; this is the bookkeeping override.
    pub fn set_lot(&mut self, lot: AssetId, properties: LotProperties) -> TreasuryResult<()> {
        if !matches!(lot, AssetId::BondLot { .. }) {
            return Err(TreasuryError::InvalidParameter(format!(
                "{lot} is not a bond lot"
            )));
        }
        self.lots.insert(lot, properties);
        Ok(())
    }

    /// Recorded terms of a lot
    pub fn lot(&self, lot: AssetId) -> TreasuryResult<LotProperties> {
        self.lots
            .get(&lot)
            .copied()
            .ok_or_else(|| TreasuryError::NotFound(format!("lot {lot}")))
    }
}
