//! Treasury Errors
//!
//! One flat error surface for every engine operation. Errors from the
//! ledger and market layers fold onto these variants so hosts match on a
//! single enum.

use thiserror::Error;

use lib_ledger::{AccountId, Amount, LedgerError};
use lib_market::MarketError;

use crate::authority::Capability;

/// Error during treasury operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("Account {account:?} lacks the {capability:?} capability")]
    Unauthorized {
        account: AccountId,
        capability: Capability,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Quantity {quantity} below series minimum {min_purchase}")]
    BelowMinimum {
        quantity: Amount,
        min_purchase: Amount,
    },

    #[error("Insufficient liquidity in pool")]
    InsufficientLiquidity,

    #[error("Slippage exceeded: minimum out {min_out}, computed {computed}")]
    SlippageExceeded { min_out: Amount, computed: Amount },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Internal invariant failure: {0}")]
    Internal(String),
}

/// Result type for treasury operations
pub type TreasuryResult<T> = Result<T, TreasuryError>;

impl From<LedgerError> for TreasuryError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ZeroAmount => {
                TreasuryError::InvalidParameter("amount must be positive".to_string())
            }
            LedgerError::InsufficientBalance { have, need } => {
                TreasuryError::InsufficientBalance { have, need }
            }
            LedgerError::Overflow => TreasuryError::Overflow,
            LedgerError::ConservationViolated(detail) => TreasuryError::Internal(detail),
            LedgerError::InvalidAssetEncoding(value) => {
                TreasuryError::InvalidParameter(format!("invalid asset encoding {value:#x}"))
            }
        }
    }
}

impl From<MarketError> for TreasuryError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::ZeroAmount => {
                TreasuryError::InvalidParameter("amount must be positive".to_string())
            }
            MarketError::InsufficientLiquidity => TreasuryError::InsufficientLiquidity,
            MarketError::SlippageExceeded { min_out, computed } => {
                TreasuryError::SlippageExceeded { min_out, computed }
            }
            MarketError::InvalidParameter(detail) => TreasuryError::InvalidParameter(detail),
            MarketError::Overflow => TreasuryError::Overflow,
            MarketError::InvariantViolated(detail) => TreasuryError::Internal(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_errors_fold_onto_treasury_kinds() {
        let err: TreasuryError = LedgerError::InsufficientBalance { have: 1, need: 2 }.into();
        assert!(matches!(
            err,
            TreasuryError::InsufficientBalance { have: 1, need: 2 }
        ));

        let err: TreasuryError = LedgerError::ZeroAmount.into();
        assert!(matches!(err, TreasuryError::InvalidParameter(_)));

        let err: TreasuryError = LedgerError::Overflow.into();
        assert!(matches!(err, TreasuryError::Overflow));
    }

    #[test]
    fn test_market_errors_fold_onto_treasury_kinds() {
        let err: TreasuryError = MarketError::SlippageExceeded {
            min_out: 10,
            computed: 5,
        }
        .into();
        assert!(matches!(
            err,
            TreasuryError::SlippageExceeded {
                min_out: 10,
                computed: 5
            }
        ));

        let err: TreasuryError = MarketError::InvariantViolated("x".to_string()).into();
        assert!(matches!(err, TreasuryError::Internal(_)));
    }
}
