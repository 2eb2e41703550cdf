//! Quote math.
//!
//! Mirrors the on-chain arithmetic exactly so off-chain estimates match on-chain results.

use solana_sdk::pubkey::Pubkey;
use crate::error::{Error, Result};
use crate::state::{PoolState, PositionState};
use crate::types::{DepositQuote, SwapQuote, WithdrawQuote};

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u128 = 10_000;

// ─── Deposit ──────────────────────────────────────────────────────────────────

/// Check a deposit pair the way the program does.
///
/// Non-genesis deposits pass when
/// `|amount_b * reserve_a − amount_a * reserve_b| * 10_000 ≤ tolerance_bps * amount_a * reserve_b`,
/// evaluated without forming either scaled product.
pub fn quote_deposit(pool: &PoolState, amount_a: u64, amount_b: u64) -> Result<DepositQuote> {
    if amount_a == 0 || amount_b == 0 {
        return Err(Error::AmountZero);
    }
    let reserve_a_after = pool.reserve_a.checked_add(amount_a).ok_or(Error::MathOverflow)?;
    let reserve_b_after = pool.reserve_b.checked_add(amount_b).ok_or(Error::MathOverflow)?;

    let mut quote = DepositQuote {
        amount_a,
        amount_b,
        genesis: pool.is_empty(),
        implied_b: 0,
        deviation_bps: 0,
        tolerance_bps: pool.ratio_tolerance_bps,
        reserve_a_after,
        reserve_b_after,
    };
    if quote.genesis {
        return Ok(quote);
    }
    if pool.reserve_a == 0 || pool.reserve_b == 0 {
        return Err(Error::DivisionByZero);
    }

    let offered = amount_b as u128 * pool.reserve_a as u128;
    let implied = amount_a as u128 * pool.reserve_b as u128;
    let deviation = offered.abs_diff(implied);

    quote.implied_b = u64::try_from(implied / pool.reserve_a as u128).unwrap_or(u64::MAX);
    quote.deviation_bps = deviation_bps(deviation, implied);

    if deviation > tolerance_bound(implied, pool.ratio_tolerance_bps) {
        return Err(Error::RatioMismatch {
            deviation_bps: quote.deviation_bps,
            tolerance_bps: pool.ratio_tolerance_bps,
        });
    }
    Ok(quote)
}

/// floor(implied * tolerance_bps / 10_000), split so no step leaves u128.
pub fn tolerance_bound(implied: u128, tolerance_bps: u16) -> u128 {
    let tol = tolerance_bps as u128;
    let whole = (implied / BPS_DENOMINATOR).saturating_mul(tol);
    let part = (implied % BPS_DENOMINATOR) * tol / BPS_DENOMINATOR;
    whole.saturating_add(part)
}

/// ceil(deviation * 10_000 / implied) for display. Exact while the product
/// fits; past that the divisor is scaled down instead, rounding upward.
fn deviation_bps(deviation: u128, implied: u128) -> u64 {
    let bps = match deviation.checked_mul(BPS_DENOMINATOR) {
        Some(lhs) => lhs.div_ceil(implied),
        None => match implied / BPS_DENOMINATOR {
            0 => u128::MAX,
            per_bps => deviation.div_ceil(per_bps),
        },
    };
    u64::try_from(bps).unwrap_or(u64::MAX)
}

/// B amount that matches `amount_a` at the current reserve ratio, floored.
/// `None` for an empty pool, where any pair is accepted.
pub fn matching_amount_b(pool: &PoolState, amount_a: u64) -> Result<Option<u64>> {
    if pool.is_empty() {
        return Ok(None);
    }
    if pool.reserve_a == 0 {
        return Err(Error::DivisionByZero);
    }
    let b = amount_a as u128 * pool.reserve_b as u128 / pool.reserve_a as u128;
    u64::try_from(b).map(Some).map_err(|_| Error::MathOverflow)
}

// ─── Swap ─────────────────────────────────────────────────────────────────────

/// Full fee and output breakdown for selling `amount_in` of `mint_in`.
///
/// `amount_out = floor(reserve_out * after_fee / (reserve_in + after_fee))`.
/// All inputs are pre-fetched on-chain values; no RPC calls are made here.
pub fn quote_swap(pool: &PoolState, mint_in: &Pubkey, amount_in: u64) -> Result<SwapQuote> {
    if amount_in == 0 {
        return Err(Error::AmountZero);
    }
    let input = pool.asset_of(mint_in).ok_or(Error::UnknownMint(*mint_in))?;
    let reserve_in = pool.reserve(input);
    let reserve_out = pool.reserve(input.other());
    if reserve_in == 0 || reserve_out == 0 {
        return Err(Error::InsufficientLiquidity);
    }

    let in_u128 = amount_in as u128;
    let fee_amount = in_u128
        .checked_mul(pool.fee_rate_bps as u128)
        .ok_or(Error::MathOverflow)?
        / BPS_DENOMINATOR;
    let after_fee = in_u128.checked_sub(fee_amount).ok_or(Error::MathOverflow)?;

    let r_in  = reserve_in  as u128;
    let r_out = reserve_out as u128;
    let amount_out = r_out
        .checked_mul(after_fee)
        .ok_or(Error::MathOverflow)?
        .checked_div(r_in.checked_add(after_fee).ok_or(Error::MathOverflow)?)
        .ok_or(Error::DivisionByZero)?;

    if amount_out == 0 || amount_out >= r_out {
        return Err(Error::InsufficientLiquidity);
    }
    let amount_out = amount_out as u64;

    let reserve_in_after = reserve_in.checked_add(amount_in).ok_or(Error::MathOverflow)?;
    let reserve_out_after = reserve_out - amount_out;
    let quote_fee = if input == pool.quote { fee_amount as u64 } else { 0 };

    Ok(SwapQuote {
        input,
        amount_in,
        fee_amount:          fee_amount as u64,
        amount_in_after_fee: after_fee as u64,
        amount_out,
        fee_rate_bps:        pool.fee_rate_bps,
        reserve_in,
        reserve_out,
        reserve_in_after,
        reserve_out_after,
        quote_fee,
        effective_rate:      amount_out as f64 / amount_in as f64,
        price_impact_pct:    (1.0 - (amount_out as f64 * r_in as f64) / (amount_in as f64 * r_out as f64)) * 100.0,
    })
}

// ─── Withdraw ─────────────────────────────────────────────────────────────────

/// Payout a full redemption of `position` would receive against `pool` now.
pub fn quote_withdraw(pool: &PoolState, position: &PositionState) -> Result<WithdrawQuote> {
    if !position.is_open() {
        return Err(Error::PositionNotFound { pool: position.pool, owner: position.owner });
    }
    Ok(WithdrawQuote {
        principal_a: position.asset_a_deposited,
        principal_b: position.asset_b_deposited,
        payout_a:    pro_rata(pool.reserve_a, position.asset_a_deposited, pool.total_a_deposited)?,
        payout_b:    pro_rata(pool.reserve_b, position.asset_b_deposited, pool.total_b_deposited)?,
    })
}

fn pro_rata(reserve: u64, principal: u64, total: u64) -> Result<u64> {
    let share = (reserve as u128)
        .checked_mul(principal as u128)
        .ok_or(Error::MathOverflow)?
        .checked_div(total as u128)
        .ok_or(Error::DivisionByZero)?;
    u64::try_from(share).map_err(|_| Error::MathOverflow)
}
