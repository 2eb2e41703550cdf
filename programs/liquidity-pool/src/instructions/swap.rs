use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::get_associated_token_address,
    token::{Token, TokenAccount},
};
use crate::{
    constants::*,
    custody::{ReserveCustody, TokenCustody},
    error::{invariant_broken, PoolError},
    state::{Asset, Pool},
};
use super::curve::{product_preserved, quote_swap, SwapQuote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapReceipt {
    pub input: Asset,
    pub amount_in: u64,
    pub quote: SwapQuote,
}

/// Constant-product swap: x * y = k.
///
/// The fee is taken from `amount_in` and stays in the input reserve, so k
/// grows by at least the fee on every trade. Fees paid in the configured
/// quote asset are also tallied in `fees_collected_quote`.
///
/// Effective flow:
///   1. trader → input vault   : amount_in
///   2. output vault → trader  : amount_out (PDA-signed)
pub fn process_swap<C: ReserveCustody>(
    pool: &mut Pool,
    custody: &mut C,
    mint_in: Pubkey,
    amount_in: u64,
) -> Result<SwapReceipt> {
    require!(amount_in > 0, PoolError::AmountZero);
    let input = pool.asset_of(&mint_in).ok_or(PoolError::UnknownMint)?;
    pool.config.validate()?;

    let quote = quote_swap(
        amount_in,
        pool.config.fee_rate_bps,
        pool.reserve(input),
        pool.reserve(input.other()),
    )?;
    let quote_fee = if input == pool.config.quote { quote.fee_amount } else { 0 };

    let mut next_pool = pool.clone();
    next_pool.apply_swap(input, amount_in, quote.amount_out, quote_fee)?;

    if !product_preserved(
        (pool.reserve_a, pool.reserve_b),
        (next_pool.reserve_a, next_pool.reserve_b),
    ) {
        return Err(invariant_broken("swap shrank the reserve product"));
    }

    require!(
        custody.caller_balance(input) >= amount_in,
        PoolError::InsufficientCallerBalance
    );

    custody.collect(input, amount_in)?;
    custody.disburse(input.other(), quote.amount_out)?;

    *pool = next_pool;

    Ok(SwapReceipt { input, amount_in, quote })
}

// ─── Handler ──────────────────────────────────────────────────────────────
pub fn handler(ctx: Context<Swap>, amount_in: u64) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let mint_in = accounts.trader_in.mint;

    let input = accounts.pool.asset_of(&mint_in).ok_or(PoolError::UnknownMint)?;
    let mint_out = match input.other() {
        Asset::A => accounts.pool.mint_a,
        Asset::B => accounts.pool.mint_b,
    };
    require_keys_eq!(accounts.trader_out.mint, mint_out, PoolError::UnknownMint);

    accounts
        .pool
        .check_backing(accounts.vault_a.amount, accounts.vault_b.amount)?;

    // Custody is indexed by asset; line the trader's accounts up with A/B.
    let (caller_a, caller_b) = match input {
        Asset::A => (&accounts.trader_in, &accounts.trader_out),
        Asset::B => (&accounts.trader_out, &accounts.trader_in),
    };
    let mut custody = TokenCustody {
        token_program: accounts.token_program.to_account_info(),
        caller: accounts.trader.to_account_info(),
        caller_a,
        caller_b,
        vault_a: &accounts.vault_a,
        vault_b: &accounts.vault_b,
        pool: accounts.pool.to_account_info(),
        mint_a: accounts.pool.mint_a,
        mint_b: accounts.pool.mint_b,
        pool_bump: accounts.pool.bump,
    };

    let receipt = process_swap(&mut accounts.pool, &mut custody, mint_in, amount_in)?;

    msg!(
        "Swap: in={} fee={} out={} input={:?} reserves=({}, {})",
        receipt.amount_in,
        receipt.quote.fee_amount,
        receipt.quote.amount_out,
        receipt.input,
        accounts.pool.reserve_a,
        accounts.pool.reserve_b
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Swap<'info> {
    pub trader: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

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

    /// Trader's account for the asset being sold
    #[account(mut, constraint = trader_in.owner == trader.key())]
    pub trader_in: Box<Account<'info, TokenAccount>>,

    /// Trader's account for the asset being bought
    #[account(mut, constraint = trader_out.owner == trader.key())]
    pub trader_out: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
