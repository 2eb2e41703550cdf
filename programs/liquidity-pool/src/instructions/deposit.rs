use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};
use crate::{
    constants::*,
    custody::{ReserveCustody, TokenCustody},
    error::PoolError,
    state::{Asset, Pool, PoolConfig, Position},
};
use super::curve::check_deposit_ratio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    pub amount_a: u64,
    pub amount_b: u64,
    /// The deposit hit an empty pool and fixed its price.
    pub genesis: bool,
}

/// Validate a liquidity contribution and apply it.
///
/// An empty pool accepts any positive pair; otherwise the pair must sit
/// within `ratio_tolerance_bps` of the reserve ratio. Pool and position are
/// staged on copies so a failure anywhere leaves both untouched.
pub fn process_deposit<C: ReserveCustody>(
    pool: &mut Pool,
    position: &mut Position,
    custody: &mut C,
    amount_a: u64,
    amount_b: u64,
) -> Result<DepositReceipt> {
    require!(amount_a > 0 && amount_b > 0, PoolError::AmountZero);
    pool.config.validate()?;

    let genesis = pool.is_empty();
    if !genesis {
        check_deposit_ratio(
            amount_a,
            amount_b,
            pool.reserve_a,
            pool.reserve_b,
            pool.config.ratio_tolerance_bps,
        )?;
    }

    let mut next_pool = pool.clone();
    next_pool.credit_deposit(amount_a, amount_b)?;
    let mut next_position = position.clone();
    next_position.credit(amount_a, amount_b)?;

    require!(
        custody.caller_balance(Asset::A) >= amount_a
            && custody.caller_balance(Asset::B) >= amount_b,
        PoolError::InsufficientCallerBalance
    );

    custody.collect(Asset::A, amount_a)?;
    custody.collect(Asset::B, amount_b)?;

    *pool = next_pool;
    *position = next_position;

    Ok(DepositReceipt { amount_a, amount_b, genesis })
}

// ─── Handler ──────────────────────────────────────────────────────────────
/// Add liquidity. Creates the pool, its vaults and the owner's position on
/// first use; the first deposit into an empty pool sets the price.
pub fn handler(ctx: Context<Deposit>, amount_a: u64, amount_b: u64) -> Result<()> {
    let pool_bump = ctx.bumps.pool;
    let position_bump = ctx.bumps.position;
    let accounts = &mut *ctx.accounts;

    let pool_key = accounts.pool.key();
    let owner_key = accounts.owner.key();

    // Fresh accounts from init_if_needed carry a default identity
    if accounts.pool.mint_a == Pubkey::default() {
        let pool = &mut accounts.pool;
        pool.mint_a = accounts.mint_a.key();
        pool.mint_b = accounts.mint_b.key();
        pool.config = PoolConfig::default();
        pool.bump = pool_bump;
        msg!(
            "Pool initialised: {} / {} fee_bps={} tolerance_bps={}",
            pool.mint_a, pool.mint_b, pool.config.fee_rate_bps, pool.config.ratio_tolerance_bps
        );
    }
    if accounts.position.owner == Pubkey::default() {
        let position = &mut accounts.position;
        position.owner = owner_key;
        position.pool = pool_key;
        position.bump = position_bump;
    }

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

    let receipt = process_deposit(
        &mut accounts.pool,
        &mut accounts.position,
        &mut custody,
        amount_a,
        amount_b,
    )?;

    msg!(
        "Deposit: owner={} a={} b={} genesis={} reserves=({}, {})",
        owner_key,
        receipt.amount_a,
        receipt.amount_b,
        receipt.genesis,
        accounts.pool.reserve_a,
        accounts.pool.reserve_b
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    pub mint_a: Box<Account<'info, Mint>>,

    #[account(constraint = mint_b.key() != mint_a.key() @ PoolError::UnknownMint)]
    pub mint_b: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Pool::LEN,
        seeds = [POOL_SEED, mint_a.key().as_ref(), mint_b.key().as_ref()],
        bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Position::LEN,
        seeds = [POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump,
    )]
    pub position: Account<'info, Position>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = mint_a,
        associated_token::authority = pool,
    )]
    pub vault_a: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = mint_b,
        associated_token::authority = pool,
    )]
    pub vault_b: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token_a.mint == mint_a.key() @ PoolError::UnknownMint,
        constraint = owner_token_a.owner == owner.key(),
    )]
    pub owner_token_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_token_b.mint == mint_b.key() @ PoolError::UnknownMint,
        constraint = owner_token_b.owner == owner.key(),
    )]
    pub owner_token_b: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}
