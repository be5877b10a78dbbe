//! Constant-Product Pool Math
//!
//! Pure, deterministic pricing for bond/stablecoin pools.
//!
//! # Rules (enforced in code)
//!
//! - No floats; all arithmetic is checked `u128`
//! - The swap fee comes off the input before the curve is applied
//! - The post-swap reserve on the output side is rounded UP, so the reserve
//!   product never decreases across a swap
//! - Errors never leave a pool partially updated

use lib_ledger::{Amount, SCALE};

use crate::errors::{MarketError, MarketResult};
use crate::pool::{Pool, SwapDirection, SwapOutcome};

/// Ceiling division. Callers guarantee `denominator > 0`.
fn ceil_div(numerator: u128, denominator: u128) -> u128 {
    numerator / denominator + u128::from(numerator % denominator != 0)
}

/// Input amount remaining after the swap fee is deducted.
///
/// `fee_rate` is a fraction of [`SCALE`] and must be below it; the fee is
/// `floor(amount_in * fee_rate / SCALE)`, so a positive input always nets
/// a positive amount.
pub fn net_of_fee(amount_in: Amount, fee_rate: Amount) -> MarketResult<Amount> {
    if fee_rate >= SCALE {
        return Err(MarketError::InvalidParameter(format!(
            "fee rate {fee_rate} must be below {SCALE}"
        )));
    }
    let fee = amount_in
        .checked_mul(fee_rate)
        .ok_or(MarketError::Overflow)?
        / SCALE;
    Ok(amount_in - fee)
}

/// Stablecoin that must accompany a bond deposit.
///
/// An empty pool prices at the reference price; otherwise the deposit must
/// match the current reserve ratio:
///
/// ```text
/// empty:     stable = floor(bond_amount * reference_price / SCALE)
/// otherwise: stable = floor(bond_amount * reserve_stable / reserve_bond)
/// ```
pub fn required_stable_for_bond(pool: &Pool, bond_amount: Amount) -> MarketResult<Amount> {
    if bond_amount == 0 {
        return Err(MarketError::ZeroAmount);
    }
    if pool.is_empty() {
        let stable = bond_amount
            .checked_mul(pool.reference_price)
            .ok_or(MarketError::Overflow)?
            / SCALE;
        return Ok(stable);
    }
    if pool.reserve_bond == 0 {
        return Err(MarketError::InsufficientLiquidity);
    }
    let stable = bond_amount
        .checked_mul(pool.reserve_stable)
        .ok_or(MarketError::Overflow)?
        / pool.reserve_bond;
    Ok(stable)
}

/// Liquidity shares minted for a bond deposit.
///
/// The first deposit mints exactly the bond amount; later deposits mint in
/// proportion to the bond reserve they extend.
pub fn shares_for_deposit(pool: &Pool, bond_amount: Amount) -> MarketResult<Amount> {
    if bond_amount == 0 {
        return Err(MarketError::ZeroAmount);
    }
    if pool.total_shares == 0 {
        return Ok(bond_amount);
    }
    if pool.reserve_bond == 0 {
        return Err(MarketError::InsufficientLiquidity);
    }
    let shares = bond_amount
        .checked_mul(pool.total_shares)
        .ok_or(MarketError::Overflow)?
        / pool.reserve_bond;
    Ok(shares)
}

/// Reserves paid out for returned shares, as `(bond, stable)`.
///
/// Both sides pay out `floor(shares * reserve / total_shares)`; the dust
/// that truncation leaves behind stays in the pool for remaining holders.
pub fn withdrawal_for_shares(pool: &Pool, shares: Amount) -> MarketResult<(Amount, Amount)> {
    if shares == 0 {
        return Err(MarketError::ZeroAmount);
    }
    if pool.total_shares == 0 {
        return Err(MarketError::InsufficientLiquidity);
    }
    if shares > pool.total_shares {
        return Err(MarketError::InvalidParameter(format!(
            "shares {shares} exceed outstanding {}",
            pool.total_shares
        )));
    }
    let bond = shares
        .checked_mul(pool.reserve_bond)
        .ok_or(MarketError::Overflow)?
        / pool.total_shares;
    let stable = shares
        .checked_mul(pool.reserve_stable)
        .ok_or(MarketError::Overflow)?
        / pool.total_shares;
    Ok((bond, stable))
}

/// Output of a constant-product swap.
///
/// # Algorithm
///
/// ```text
/// in_net     = amount_in - floor(amount_in * fee_rate / SCALE)
/// kept       = ceil(reserve_in * reserve_out / (reserve_in + in_net))
/// amount_out = reserve_out - kept
/// ```
///
/// Rounding `kept` up keeps `reserve_in * reserve_out` from ever shrinking
/// and means the output reserve is never drained below one unit. The output
/// may truncate to zero for dust inputs; callers guard with a minimum-out.
pub fn swap_output(
    reserve_in: Amount,
    reserve_out: Amount,
    amount_in: Amount,
    fee_rate: Amount,
) -> MarketResult<Amount> {
    if amount_in == 0 {
        return Err(MarketError::ZeroAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(MarketError::InsufficientLiquidity);
    }
    let in_net = net_of_fee(amount_in, fee_rate)?;
    let product = reserve_in
        .checked_mul(reserve_out)
        .ok_or(MarketError::Overflow)?;
    let new_reserve_in = reserve_in.checked_add(in_net).ok_or(MarketError::Overflow)?;
    let kept = ceil_div(product, new_reserve_in);
    Ok(reserve_out - kept)
}

/// Apply a swap to a pool.
///
/// # Rules
///
/// This function enforces:
/// - **Slippage**: fails if the computed output is below `min_out`
/// - **Product monotonicity**: the reserve product after the swap must be
///   at least the product before it
/// - **Atomicity**: reserves are only written once every check has passed
///
/// The full input, fee included, enters the input-side reserve; the fee is
/// how liquidity providers earn.
///
/// # Returns
///
/// * `Ok(SwapOutcome)` - Amounts and fee on success
/// * `Err(MarketError)` - Error describing failure, pool untouched
pub fn apply_swap(
    pool: &mut Pool,
    direction: SwapDirection,
    amount_in: Amount,
    min_out: Amount,
) -> MarketResult<SwapOutcome> {
    let (reserve_in, reserve_out) = match direction {
        SwapDirection::BondToStable => (pool.reserve_bond, pool.reserve_stable),
        SwapDirection::StableToBond => (pool.reserve_stable, pool.reserve_bond),
    };

    let amount_out = swap_output(reserve_in, reserve_out, amount_in, pool.fee_rate)?;
    if amount_out < min_out {
        return Err(MarketError::SlippageExceeded {
            min_out,
            computed: amount_out,
        });
    }

    let in_net = net_of_fee(amount_in, pool.fee_rate)?;
    let new_reserve_in = reserve_in
        .checked_add(amount_in)
        .ok_or(MarketError::Overflow)?;
    let new_reserve_out = reserve_out - amount_out;

    let product_before = reserve_in
        .checked_mul(reserve_out)
        .ok_or(MarketError::Overflow)?;
    let product_after = new_reserve_in
        .checked_mul(new_reserve_out)
        .ok_or(MarketError::Overflow)?;
    if product_after < product_before {
        return Err(MarketError::InvariantViolated(format!(
            "reserve product decreased: {product_before} -> {product_after}"
        )));
    }

    match direction {
        SwapDirection::BondToStable => {
            pool.reserve_bond = new_reserve_in;
            pool.reserve_stable = new_reserve_out;
        }
        SwapDirection::StableToBond => {
            pool.reserve_stable = new_reserve_in;
            pool.reserve_bond = new_reserve_out;
        }
    }

    Ok(SwapOutcome {
        direction,
        amount_in,
        amount_out,
        fee_paid: amount_in - in_net,
    })
}
