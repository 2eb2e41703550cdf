use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::get_associated_token_address,
    token::{Token, TokenAccount},
};
use crate::{
    constants::*,
    custody::{ReserveCustody, TokenCustody},
    error::{invariant_broken, PoolError},
    state::{Asset, Pool, Position},
};
use super::curve::pro_rata_share;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub payout_a: u64,
    pub payout_b: u64,
    pub principal_a: u64,
    pub principal_b: u64,
}

/// Redeem the whole position against current reserves.
///
/// Each side pays reserve * principal / total, so retained swap fees and any
/// drift in the reserve ratio flow back to providers in proportion to what
/// they put in. There is no partial redemption.
pub fn process_withdraw<C: ReserveCustody>(
    pool: &mut Pool,
    position: &mut Position,
    custody: &mut C,
) -> Result<WithdrawReceipt> {
    require!(position.is_open(), PoolError::PositionNotFound);

    let principal_a = position.asset_a_deposited;
    let principal_b = position.asset_b_deposited;

    let payout_a = pro_rata_share(pool.reserve_a, principal_a, pool.total_a_deposited)?;
    let payout_b = pro_rata_share(pool.reserve_b, principal_b, pool.total_b_deposited)?;

    if payout_a > pool.reserve_a || payout_b > pool.reserve_b {
        return Err(invariant_broken("withdraw payout exceeds reserves"));
    }
    if principal_a > pool.total_a_deposited || principal_b > pool.total_b_deposited {
        return Err(invariant_broken("position principal exceeds pool totals"));
    }

    let mut next_pool = pool.clone();
    next_pool.debit_withdrawal(payout_a, payout_b, principal_a, principal_b)?;

    if payout_a > 0 {
        custody.disburse(Asset::A, payout_a)?;
    }
    if payout_b > 0 {
        custody.disburse(Asset::B, payout_b)?;
    }

    *pool = next_pool;
    position.close();

    Ok(WithdrawReceipt { payout_a, payout_b, principal_a, principal_b })
}

// ─── Handler ──────────────────────────────────────────────────────────────
/// Full redemption. The position account is closed and its rent returned to
/// the owner once the handler succeeds.
pub fn handler(ctx: Context<Withdraw>) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let owner_key = accounts.owner.key();

    accounts
        .pool
        .check_backing(accounts.vault_a.amount, accounts.vault_b.amount)?;

    let mut custody = TokenCustody {
        token_program: accounts.token_program.to_account_info(),
        caller: accounts.owner.to_account_info(),
        caller_a: &accounts.owner_token_a,
        caller_b: &accounts.owner_token_b,
        vault_a: &accounts.vault_a,
        vault_b: &accounts.vault_b,
        pool: accounts.pool.to_account_info(),
        mint_a: accounts.pool.mint_a,
        mint_b: accounts.pool.mint_b,
        pool_bump: accounts.pool.bump,
    };

    let receipt = process_withdraw(&mut accounts.pool, &mut accounts.position, &mut custody)?;

    msg!(
        "Withdraw: owner={} principal=({}, {}) payout=({}, {}) reserves=({}, {})",
        owner_key,
        receipt.principal_a,
        receipt.principal_b,
        receipt.payout_a,
        receipt.payout_b,
        accounts.pool.reserve_a,
        accounts.pool.reserve_b
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        close = owner,
        seeds = [POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        has_one = owner,
        has_one = pool,
    )]
    pub position: Account<'info, Position>,

    #[account(
        mut,
        address = get_associated_token_address(&pool.key(), &pool.mint_a) @ PoolError::VaultMismatch,
    )]
    pub vault_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = get_associated_token_address(&pool.key(), &pool.mint_b) @ PoolError::VaultMismatch,
    )]
    pub vault_b: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token_a.mint == pool.mint_a @ PoolError::UnknownMint,
        constraint = owner_token_a.owner == owner.key(),
    )]
    pub owner_token_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token_b.mint == pool.mint_b @ PoolError::UnknownMint,
        constraint = owner_token_b.owner == owner.key(),
    )]
    pub owner_token_b: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
