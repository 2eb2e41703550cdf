use anchor_lang::prelude::*;
use crate::{constants::*, error::PoolError};

/// Result of swap pricing, computed against a pre-swap reserve snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// floor(amount_in * fee_rate_bps / 10_000); stays in the pool.
    pub fee_amount: u64,
    /// amount_in − fee_amount; the portion priced by the curve.
    pub amount_in_after_fee: u64,
    /// Tokens leaving the output vault.
    pub amount_out: u64,
}

/// Reject a non-genesis deposit whose B amount strays from the amount the
/// pool ratio implies for its A amount.
///
/// implied_b = amount_a * reserve_b / reserve_a, compared exactly by
/// cross-multiplying:
///   |amount_b * reserve_a − amount_a * reserve_b| * 10_000
///       ≤ tolerance_bps * amount_a * reserve_b
pub fn check_deposit_ratio(
    amount_a: u64,
    amount_b: u64,
    reserve_a: u64,
    reserve_b: u64,
    tolerance_bps: u16,
) -> Result<()> {
    require!(reserve_a > 0 && reserve_b > 0, PoolError::DivisionByZero);

    let offered = (amount_b as u128) * (reserve_a as u128);
    let implied = (amount_a as u128) * (reserve_b as u128);
    let deviation = offered.abs_diff(implied);

    require!(
        deviation <= tolerance_bound(implied, tolerance_bps),
        PoolError::RatioMismatch
    );
    Ok(())
}

/// floor(implied * tolerance_bps / 10_000) without forming the full product.
///
/// Splitting implied into q * 10_000 + r keeps every step inside u128; a
/// saturated bound is still above any u128 deviation.
pub fn tolerance_bound(implied: u128, tolerance_bps: u16) -> u128 {
    let tol = tolerance_bps as u128;
    let whole = (implied / BPS_DENOMINATOR).saturating_mul(tol);
    let part = (implied % BPS_DENOMINATOR) * tol / BPS_DENOMINATOR;
    whole.saturating_add(part)
}

/// Price a trade on x * y = k with the fee taken from the input.
///
/// amount_out = floor(reserve_out * after_fee / (reserve_in + after_fee)),
/// which is reserve_out − ceil(k / (reserve_in + after_fee)): the remaining
/// output reserve rounds up, so k never shrinks.
pub fn quote_swap(
    amount_in: u64,
    fee_rate_bps: u16,
    reserve_in: u64,
    reserve_out: u64,
) -> Result<SwapQuote> {
    require!(amount_in > 0, PoolError::AmountZero);
    require!(reserve_in > 0 && reserve_out > 0, PoolError::InsufficientLiquidity);

    let in_u128 = amount_in as u128;
    let fee_amount = in_u128
        .checked_mul(fee_rate_bps as u128)
        .ok_or(PoolError::ArithmeticOverflow)?
        / BPS_DENOMINATOR;
    let after_fee = in_u128
        .checked_sub(fee_amount)
        .ok_or(PoolError::ArithmeticOverflow)?;

    let r_in = reserve_in as u128;
    let r_out = reserve_out as u128;
    let amount_out = r_out
        .checked_mul(after_fee)
        .ok_or(PoolError::ArithmeticOverflow)?
        .checked_div(r_in.checked_add(after_fee).ok_or(PoolError::ArithmeticOverflow)?)
        .ok_or(PoolError::DivisionByZero)?;

    require!(
        amount_out > 0 && amount_out < r_out,
        PoolError::InsufficientLiquidity
    );

    Ok(SwapQuote {
        fee_amount: fee_amount as u64,
        amount_in_after_fee: after_fee as u64,
        amount_out: amount_out as u64,
    })
}

/// reserve * principal / total without intermediate rounding.
pub fn pro_rata_share(reserve: u64, principal: u64, total: u64) -> Result<u64> {
    let share = (reserve as u128)
        .checked_mul(principal as u128)
        .ok_or(PoolError::ArithmeticOverflow)?
        .checked_div(total as u128)
        .ok_or(PoolError::DivisionByZero)?;
    u64::try_from(share).map_err(|_| error!(PoolError::ArithmeticOverflow))
}

/// k before vs after; true when the trade did not shrink the product.
pub fn product_preserved(before: (u64, u64), after: (u64, u64)) -> bool {
    (after.0 as u128) * (after.1 as u128) >= (before.0 as u128) * (before.1 as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_err<T: std::fmt::Debug>(res: Result<T>, expected: PoolError) {
        assert_eq!(res.unwrap_err(), anchor_lang::error::Error::from(expected));
    }

    #[test]
    fn matching_ratio_is_accepted() {
        // Pool at 50:1; (400, 8) is exact.
        check_deposit_ratio(400, 8, 1_000, 20, 100).unwrap();
    }

    #[test]
    fn ratio_within_tolerance_is_accepted() {
        // implied_b = 1000; 1% above and below are still fine.
        check_deposit_ratio(50_000, 1_010, 1_000_000, 20_000, 100).unwrap();
        check_deposit_ratio(50_000, 990, 1_000_000, 20_000, 100).unwrap();
    }

    #[test]
    fn ratio_beyond_tolerance_is_rejected() {
        // 2% off with a 1% tolerance
        expect_err(
            check_deposit_ratio(50_000, 1_020, 1_000_000, 20_000, 100),
            PoolError::RatioMismatch,
        );
        expect_err(
            check_deposit_ratio(50_000, 980, 1_000_000, 20_000, 100),
            PoolError::RatioMismatch,
        );
    }

    #[test]
    fn zero_tolerance_demands_exact_ratio() {
        check_deposit_ratio(400, 8, 1_000, 20, 0).unwrap();
        expect_err(check_deposit_ratio(401, 8, 1_000, 20, 0), PoolError::RatioMismatch);
    }

    #[test]
    fn ratio_check_accepts_full_width_deposits() {
        // Both cross products sit near 1.6e37; scaling by 10_000 would not fit.
        let r = 4_000_000_000_000_000_000u64;
        check_deposit_ratio(r, r, r, r, 100).unwrap();
        check_deposit_ratio(r, r + r / 100, r, r, 100).unwrap();
        expect_err(
            check_deposit_ratio(r, r + r / 100 + 1, r, r, 100),
            PoolError::RatioMismatch,
        );
        check_deposit_ratio(u64::MAX, u64::MAX, u64::MAX, u64::MAX, u16::MAX).unwrap();
    }

    #[test]
    fn tolerance_bound_matches_direct_product() {
        for implied in [0u128, 1, 9_999, 10_000, 10_001, 123_456_789] {
            for tol in [0u16, 1, 100, 9_999, 10_000, u16::MAX] {
                assert_eq!(
                    tolerance_bound(implied, tol),
                    implied * tol as u128 / BPS_DENOMINATOR,
                    "implied={implied} tol={tol}"
                );
            }
        }
        assert_eq!(tolerance_bound(u128::MAX, u16::MAX), u128::MAX);
    }

    #[test]
    fn swap_reference_trade() {
        // 500 A into (1000, 20) at 30 bps
        let quote = quote_swap(500, 30, 1_000, 20).unwrap();
        assert_eq!(quote.fee_amount, 1);
        assert_eq!(quote.amount_in_after_fee, 499);
        // floor(20 * 499 / 1499) = 6
        assert_eq!(quote.amount_out, 6);
        assert!(product_preserved((1_000, 20), (1_500, 20 - quote.amount_out)));
    }

    #[test]
    fn swap_fee_rounds_down() {
        let quote = quote_swap(333, 30, 1_000_000, 1_000_000).unwrap();
        assert_eq!(quote.fee_amount, 0);
        assert_eq!(quote.amount_in_after_fee, 333);
    }

    #[test]
    fn swap_output_rounding_to_zero_is_insufficient_liquidity() {
        expect_err(quote_swap(1, 30, 1_000, 20), PoolError::InsufficientLiquidity);
    }

    #[test]
    fn swap_against_empty_reserve_fails() {
        expect_err(quote_swap(10, 30, 0, 20), PoolError::InsufficientLiquidity);
        expect_err(quote_swap(0, 30, 1_000, 20), PoolError::AmountZero);
    }

    #[test]
    fn swap_never_drains_output_reserve() {
        // floor(1000 * (2^64 − 1) / 2^64)
        let quote = quote_swap(u64::MAX, 0, 1, 1_000).unwrap();
        assert_eq!(quote.amount_out, 999);
        assert!(product_preserved((1, 1_000), (u64::MAX, 1)));
    }

    #[test]
    fn pro_rata_share_is_exact_for_sole_owner() {
        assert_eq!(pro_rata_share(1_234, 600, 600).unwrap(), 1_234);
        assert_eq!(pro_rata_share(1_500, 600, 1_000).unwrap(), 900);
        // floor(7 * 1 / 3)
        assert_eq!(pro_rata_share(7, 1, 3).unwrap(), 2);
    }

    #[test]
    fn pro_rata_share_guards_zero_total() {
        expect_err(pro_rata_share(10, 1, 0), PoolError::DivisionByZero);
    }

    #[test]
    fn pro_rata_share_handles_full_width_inputs() {
        assert_eq!(pro_rata_share(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);
    }
}
