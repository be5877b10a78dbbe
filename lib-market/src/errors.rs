//! Market Errors

use thiserror::Error;

use lib_ledger::Amount;

/// Error during pool math or swap application
#[derive(Error, Debug, Clone)]
pub enum MarketError {
    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Insufficient liquidity in pool")]
    InsufficientLiquidity,

    #[error("Slippage exceeded: minimum out {min_out}, computed {computed}")]
    SlippageExceeded { min_out: Amount, computed: Amount },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Invariant violated: {0}")]
    InvariantViolated(String),
}

/// Result type for market operations
pub type MarketResult<T> = Result<T, MarketError>;
