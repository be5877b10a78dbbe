//! Custody-Fee Transfers
//!
//! Secondary-market transfers of bond tokens carry a custody fee, charged
//! in stablecoin on top of the tokens moved. The sender pays it to the
//! custody account; the recipient always receives the full token amount.
//! Stablecoin and pool-share transfers are exempt.

use serde::{Deserialize, Serialize};

use lib_ledger::{AccountId, Amount, AssetId, BalanceLedger, SCALE};

use crate::config::TreasuryConfig;
use crate::errors::{TreasuryError, TreasuryResult};

/// Outcome of a custody transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Asset moved
    pub asset: AssetId,
    /// Amount received by the recipient
    pub amount: Amount,
    /// Stablecoin the sender paid to the custody account
    pub custody_fee: Amount,
}

/// Custody fee for a transfer amount at a fee rate, rounded down
pub fn custody_fee(amount: Amount, rate: Amount) -> TreasuryResult<Amount> {
    Ok(amount.checked_mul(rate).ok_or(TreasuryError::Overflow)? / SCALE)
}

/// Transfer an asset between accounts, charging the custody fee when the
/// asset is a bond token.
///
/// # Rules
///
/// - The fee is `amount * custody_fee_rate / SCALE`, in stablecoin, paid by
///   the sender on top of the tokens moved
/// - Only bond series and bond lot tokens are charged; stablecoin and pool
///   shares move fee-free
/// - Both legs are validated before either moves, so a sender who cannot
///   cover the fee keeps their tokens
pub fn apply_custody_transfer(
    ledger: &mut BalanceLedger,
    config: &TreasuryConfig,
    from: AccountId,
    to: AccountId,
    asset: AssetId,
    amount: Amount,
) -> TreasuryResult<TransferReceipt> {
    let fee = if asset.is_bond_token() {
        custody_fee(amount, config.custody_fee_rate)?
    } else {
        0
    };

    ledger.check_transfer(from, to, asset, amount)?;
    if fee > 0 {
        ledger.check_transfer(from, config.custody, AssetId::Stablecoin, fee)?;
    }

    ledger.transfer(from, to, asset, amount)?;
    if fee > 0 {
        ledger.transfer(from, config.custody, AssetId::Stablecoin, fee)?;
    }

    Ok(TransferReceipt {
        asset,
        amount,
        custody_fee: fee,
    })
}
