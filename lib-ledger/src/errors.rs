//! Ledger Errors

use thiserror::Error;

use crate::primitives::Amount;

/// Error during ledger operations
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Conservation violated: {0}")]
    ConservationViolated(String),

    #[error("Invalid asset encoding: {0:#034x}")]
    InvalidAssetEncoding(u128),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
