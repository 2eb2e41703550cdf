use anchor_lang::prelude::*;
use crate::{constants::*, error::{invariant_broken, PoolError}};

// ─── Asset ─────────────────────────────────────────────────────────────────
// One side of the pair. Pool identity is ordered: (A, B) ≠ (B, A).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    A,
    B,
}

impl Asset {
    pub fn other(self) -> Asset {
        match self {
            Asset::A => Asset::B,
            Asset::B => Asset::A,
        }
    }
}

// ─── PoolConfig ────────────────────────────────────────────────────────────
// Recorded in the pool at genesis; procedures read parameters from here.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Swap fee in basis points, charged on the input amount
    pub fee_rate_bps: u16,        // 2
    /// Max relative deviation of a deposit from the pool ratio, in bps
    pub ratio_tolerance_bps: u16, // 2
    /// Asset whose swap-input fees are tallied in `fees_collected_quote`
    pub quote: Asset,             // 1
}

impl PoolConfig {
    pub const LEN: usize = 5;

    pub fn validate(&self) -> Result<()> {
        require!(
            (self.fee_rate_bps as u128) < BPS_DENOMINATOR,
            PoolError::InvalidConfig
        );
        require!(
            (self.ratio_tolerance_bps as u128) <= BPS_DENOMINATOR,
            PoolError::InvalidConfig
        );
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fee_rate_bps: FEE_RATE_DEFAULT_BPS,
            ratio_tolerance_bps: RATIO_TOLERANCE_DEFAULT_BPS,
            quote: Asset::A,
        }
    }
}

// ─── Pool ──────────────────────────────────────────────────────────────────
// Constant-product pool (x * y = k), one per ordered mint pair.
// Vaults are the pool PDA's associated token accounts.
#[account]
#[derive(Default)]
pub struct Pool {
    pub mint_a: Pubkey,               // 32
    pub mint_b: Pubkey,               // 32
    /// Authoritative reserves, backed one-to-one by the vaults
    pub reserve_a: u64,               // 8
    pub reserve_b: u64,               // 8
    /// Principal contributed by all open positions
    pub total_a_deposited: u64,       // 8
    pub total_b_deposited: u64,       // 8
    /// Monotonic tally of fees paid in the quote asset
    pub fees_collected_quote: u64,    // 8
    pub config: PoolConfig,           // 5
    pub bump: u8,                     // 1
}

impl Pool {
    // 8 discriminator + 32+32+8+8+8+8+8+5+1 = 118
    pub const LEN: usize = 118;

    /// Both reserves are zero: the next deposit sets the price.
    pub fn is_empty(&self) -> bool {
        self.reserve_a == 0 && self.reserve_b == 0
    }

    pub fn asset_of(&self, mint: &Pubkey) -> Option<Asset> {
        if *mint == self.mint_a {
            Some(Asset::A)
        } else if *mint == self.mint_b {
            Some(Asset::B)
        } else {
            None
        }
    }

    pub fn reserve(&self, asset: Asset) -> u64 {
        match asset {
            Asset::A => self.reserve_a,
            Asset::B => self.reserve_b,
        }
    }

    /// Recorded reserves must be fully backed by the vaults.
    pub fn check_backing(&self, vault_a: u64, vault_b: u64) -> Result<()> {
        if vault_a < self.reserve_a || vault_b < self.reserve_b {
            return Err(invariant_broken("vault balance below recorded reserve"));
        }
        Ok(())
    }

    /// Add a deposit to reserves and principal totals. All four sums are
    /// checked before any field is written.
    pub fn credit_deposit(&mut self, amount_a: u64, amount_b: u64) -> Result<()> {
        let reserve_a = checked_add(self.reserve_a, amount_a)?;
        let reserve_b = checked_add(self.reserve_b, amount_b)?;
        let total_a = checked_add(self.total_a_deposited, amount_a)?;
        let total_b = checked_add(self.total_b_deposited, amount_b)?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_a_deposited = total_a;
        self.total_b_deposited = total_b;
        Ok(())
    }

    /// Move `amount_in` into the input reserve and `amount_out` out of the
    /// other. `quote_fee` is added to `fees_collected_quote`.
    pub fn apply_swap(
        &mut self,
        input: Asset,
        amount_in: u64,
        amount_out: u64,
        quote_fee: u64,
    ) -> Result<()> {
        let reserve_in = checked_add(self.reserve(input), amount_in)?;
        let reserve_out = checked_sub(self.reserve(input.other()), amount_out)?;
        let fees = checked_add(self.fees_collected_quote, quote_fee)?;

        match input {
            Asset::A => {
                self.reserve_a = reserve_in;
                self.reserve_b = reserve_out;
            }
            Asset::B => {
                self.reserve_b = reserve_in;
                self.reserve_a = reserve_out;
            }
        }
        self.fees_collected_quote = fees;
        Ok(())
    }

    /// Pay out a redemption and retire the redeemed principal.
    pub fn debit_withdrawal(
        &mut self,
        payout_a: u64,
        payout_b: u64,
        principal_a: u64,
        principal_b: u64,
    ) -> Result<()> {
        let reserve_a = checked_sub(self.reserve_a, payout_a)?;
        let reserve_b = checked_sub(self.reserve_b, payout_b)?;
        let total_a = checked_sub(self.total_a_deposited, principal_a)?;
        let total_b = checked_sub(self.total_b_deposited, principal_b)?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.total_a_deposited = total_a;
        self.total_b_deposited = total_b;
        Ok(())
    }
}

// ─── Position ──────────────────────────────────────────────────────────────
// One owner's recorded principal in a single pool. No share token is minted;
// the principal itself weights the owner's claim on reserves.
#[account]
#[derive(Default)]
pub struct Position {
    pub owner: Pubkey,              // 32
    pub pool: Pubkey,               // 32
    pub asset_a_deposited: u64,     // 8
    pub asset_b_deposited: u64,     // 8
    pub bump: u8,                   // 1
}

impl Position {
    // 8 + 32+32+8+8+1 = 89
    pub const LEN: usize = 89;

    pub fn is_open(&self) -> bool {
        self.asset_a_deposited > 0 || self.asset_b_deposited > 0
    }

    pub fn credit(&mut self, amount_a: u64, amount_b: u64) -> Result<()> {
        let a = checked_add(self.asset_a_deposited, amount_a)?;
        let b = checked_add(self.asset_b_deposited, amount_b)?;
        self.asset_a_deposited = a;
        self.asset_b_deposited = b;
        Ok(())
    }

    pub fn close(&mut self) {
        self.asset_a_deposited = 0;
        self.asset_b_deposited = 0;
    }
}

// ─── Checked u64 helpers ──────────────────────────────────────────────────
pub fn checked_add(a: u64, b: u64) -> Result<u64> {
    Ok(a.checked_add(b).ok_or(PoolError::ArithmeticOverflow)?)
}

pub fn checked_sub(a: u64, b: u64) -> Result<u64> {
    Ok(a.checked_sub(b).ok_or(PoolError::ArithmeticOverflow)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_err<T: std::fmt::Debug>(res: Result<T>, expected: PoolError) {
        assert_eq!(res.unwrap_err(), anchor_lang::error::Error::from(expected));
    }

    fn seeded_pool() -> Pool {
        Pool {
            mint_a: Pubkey::new_unique(),
            mint_b: Pubkey::new_unique(),
            reserve_a: 1_000,
            reserve_b: 20,
            total_a_deposited: 1_000,
            total_b_deposited: 20,
            ..Pool::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = PoolConfig::default();
        assert_eq!(config.fee_rate_bps, 30);
        assert_eq!(config.ratio_tolerance_bps, 100);
        assert_eq!(config.quote, Asset::A);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_full_fee() {
        let config = PoolConfig { fee_rate_bps: 10_000, ..PoolConfig::default() };
        expect_err(config.validate(), PoolError::InvalidConfig);

        let config = PoolConfig { ratio_tolerance_bps: 10_001, ..PoolConfig::default() };
        expect_err(config.validate(), PoolError::InvalidConfig);
    }

    #[test]
    fn asset_lookup_follows_mint_order() {
        let pool = seeded_pool();
        assert_eq!(pool.asset_of(&pool.mint_a), Some(Asset::A));
        assert_eq!(pool.asset_of(&pool.mint_b), Some(Asset::B));
        assert_eq!(pool.asset_of(&Pubkey::new_unique()), None);
        assert_eq!(Asset::A.other(), Asset::B);
    }

    #[test]
    fn backing_check_flags_short_vaults() {
        let pool = seeded_pool();
        assert!(pool.check_backing(1_000, 20).is_ok());
        assert!(pool.check_backing(1_050, 25).is_ok());
        expect_err(pool.check_backing(999, 20), PoolError::InvariantBroken);
    }

    #[test]
    fn credit_deposit_overflow_leaves_pool_untouched() {
        let mut pool = seeded_pool();
        pool.total_b_deposited = u64::MAX;
        let before = pool.clone();

        expect_err(pool.credit_deposit(5, 1), PoolError::ArithmeticOverflow);
        assert_eq!(pool.reserve_a, before.reserve_a);
        assert_eq!(pool.reserve_b, before.reserve_b);
        assert_eq!(pool.total_a_deposited, before.total_a_deposited);
    }

    #[test]
    fn apply_swap_moves_both_reserves() {
        let mut pool = seeded_pool();
        pool.apply_swap(Asset::B, 10, 300, 0).unwrap();
        assert_eq!(pool.reserve_b, 30);
        assert_eq!(pool.reserve_a, 700);
        assert_eq!(pool.fees_collected_quote, 0);

        pool.apply_swap(Asset::A, 500, 9, 1).unwrap();
        assert_eq!(pool.reserve_a, 1_200);
        assert_eq!(pool.reserve_b, 21);
        assert_eq!(pool.fees_collected_quote, 1);
    }

    #[test]
    fn apply_swap_underflow_is_rejected() {
        let mut pool = seeded_pool();
        expect_err(pool.apply_swap(Asset::A, 1, 21, 0), PoolError::ArithmeticOverflow);
        assert_eq!(pool.reserve_a, 1_000);
    }

    #[test]
    fn debit_withdrawal_checks_every_field_first() {
        let mut pool = seeded_pool();
        expect_err(
            pool.debit_withdrawal(100, 2, 100, 21),
            PoolError::ArithmeticOverflow,
        );
        assert_eq!(pool.reserve_a, 1_000);
        assert_eq!(pool.reserve_b, 20);

        pool.debit_withdrawal(100, 2, 100, 2).unwrap();
        assert_eq!((pool.reserve_a, pool.reserve_b), (900, 18));
        assert_eq!((pool.total_a_deposited, pool.total_b_deposited), (900, 18));
    }

    #[test]
    fn position_credit_and_close() {
        let mut position = Position::default();
        assert!(!position.is_open());

        position.credit(600, 12).unwrap();
        position.credit(400, 8).unwrap();
        assert_eq!((position.asset_a_deposited, position.asset_b_deposited), (1_000, 20));
        assert!(position.is_open());

        position.close();
        assert!(!position.is_open());
    }

    #[test]
    fn position_credit_overflow() {
        let mut position = Position { asset_a_deposited: u64::MAX, ..Position::default() };
        expect_err(position.credit(1, 1), PoolError::ArithmeticOverflow);
        assert_eq!(position.asset_b_deposited, 0);
    }
}
