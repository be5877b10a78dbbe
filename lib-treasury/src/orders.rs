//! Primary-Market Order Settlement
//!
//! An order spends stablecoin and mints a fresh bond lot to the buyer.
//! Quantity is derived from the payment, never given directly:
//!
//! ```text
//! quantity = stablecoin_amount * SCALE / unit_price_buy   (floor)
//! ```
//!
//! so paying 100.0 stablecoin at a unit price of 100.0 buys exactly 1.0
//! units. Every order mints its own lot so the purchase terms stay
//! attached to the tokens they priced.

use serde::{Deserialize, Serialize};

use lib_ledger::{AccountId, Amount, AssetId, BalanceLedger, Timestamp, SCALE};

use crate::config::TreasuryConfig;
use crate::errors::{TreasuryError, TreasuryResult};
use crate::registry::{BondRegistry, LotProperties};

/// Outcome of a settled order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Lot minted to the buyer
    pub lot: AssetId,
    /// Units minted, in scaled units
    pub quantity: Amount,
    /// Stablecoin paid to the treasury
    pub price_paid: Amount,
    /// Unit price the order settled at
    pub unit_price: Amount,
    /// Settlement timestamp
    pub purchase_ts: Timestamp,
}

/// Settle an order paid in stablecoin.
///
/// # Rules
///
/// - The series must be registered
/// - The derived quantity must meet the series minimum purchase
/// - The buyer must hold the full payment; it moves to the treasury account
/// - The lot is minted under the next sequence number of the series and its
///   purchase terms are recorded
///
/// All checks run before any state changes, so a failed order leaves the
/// ledger and registry untouched.
pub fn apply_stablecoin_order(
    ledger: &mut BalanceLedger,
    registry: &mut BondRegistry,
    config: &TreasuryConfig,
    buyer: AccountId,
    series_code: u64,
    stablecoin_amount: Amount,
    now: Timestamp,
) -> TreasuryResult<OrderReceipt> {
    let series = registry.series(series_code)?;
    let quantity = order_quantity(stablecoin_amount, series.unit_price_buy)?;
    if quantity < series.min_purchase {
        return Err(TreasuryError::BelowMinimum {
            quantity,
            min_purchase: series.min_purchase,
        });
    }
    ledger.check_transfer(buyer, config.treasury, AssetId::Stablecoin, stablecoin_amount)?;

    // The sequence is the only fallible mutation; the remaining legs were
    // validated above (the lot id is fresh, so its mint cannot collide).
    let sequence = registry.allocate_sequence(series_code)?;
    let lot = AssetId::lot(series_code, sequence);
    ledger.transfer(buyer, config.treasury, AssetId::Stablecoin, stablecoin_amount)?;
    ledger.mint(buyer, lot, quantity)?;
    registry.record_lot(
        lot,
        LotProperties {
            quantity,
            rate: series.interest_rate,
            purchase_ts: now,
            reference_ts: now,
            purchase_price: series.unit_price_buy,
            expiration: series.expiration,
        },
    )?;

    Ok(OrderReceipt {
        lot,
        quantity,
        price_paid: stablecoin_amount,
        unit_price: series.unit_price_buy,
        purchase_ts: now,
    })
}

/// Settle an order paid in the native currency.
///
/// The payment converts at the configured exchange rate, the converted
/// stablecoin is minted to the buyer, and the order then settles exactly
/// like [`apply_stablecoin_order`]. The native leg itself is collected
/// outside the ledger.
pub fn apply_native_order(
    ledger: &mut BalanceLedger,
    registry: &mut BondRegistry,
    config: &TreasuryConfig,
    buyer: AccountId,
    series_code: u64,
    native_amount: Amount,
    now: Timestamp,
) -> TreasuryResult<OrderReceipt> {
    if config.exchange_rate == 0 {
        return Err(TreasuryError::InvalidParameter(
            "exchange rate not configured".to_string(),
        ));
    }
    if native_amount == 0 {
        return Err(TreasuryError::InvalidParameter(
            "amount must be positive".to_string(),
        ));
    }
    let stablecoin_amount = native_amount
        .checked_mul(config.exchange_rate)
        .ok_or(TreasuryError::Overflow)?
        / SCALE;

    let series = registry.series(series_code)?;
    let quantity = order_quantity(stablecoin_amount, series.unit_price_buy)?;
    if quantity < series.min_purchase {
        return Err(TreasuryError::BelowMinimum {
            quantity,
            min_purchase: series.min_purchase,
        });
    }
    // The buyer receives the stablecoin and immediately pays it out again,
    // so only the mint-side sums can overflow.
    ledger
        .balance_of(buyer, AssetId::Stablecoin)
        .checked_add(stablecoin_amount)
        .ok_or(TreasuryError::Overflow)?;
    ledger
        .supply_of(AssetId::Stablecoin)
        .minted
        .checked_add(stablecoin_amount)
        .ok_or(TreasuryError::Overflow)?;
    if buyer != config.treasury {
        ledger
            .balance_of(config.treasury, AssetId::Stablecoin)
            .checked_add(stablecoin_amount)
            .ok_or(TreasuryError::Overflow)?;
    }

    let sequence = registry.allocate_sequence(series_code)?;
    let lot = AssetId::lot(series_code, sequence);
    ledger.mint(buyer, AssetId::Stablecoin, stablecoin_amount)?;
    ledger.transfer(buyer, config.treasury, AssetId::Stablecoin, stablecoin_amount)?;
    ledger.mint(buyer, lot, quantity)?;
    registry.record_lot(
        lot,
        LotProperties {
            quantity,
            rate: series.interest_rate,
            purchase_ts: now,
            reference_ts: now,
            purchase_price: series.unit_price_buy,
            expiration: series.expiration,
        },
    )?;

    Ok(OrderReceipt {
        lot,
        quantity,
        price_paid: stablecoin_amount,
        unit_price: series.unit_price_buy,
        purchase_ts: now,
    })
}

/// Units bought by a stablecoin payment at a unit price, rounded down
fn order_quantity(stablecoin_amount: Amount, unit_price: Amount) -> TreasuryResult<Amount> {
    Ok(stablecoin_amount
        .checked_mul(SCALE)
        .ok_or(TreasuryError::Overflow)?
        / unit_price)
}
