/// Liquidity Pool — two-asset constant-product AMM.
///
/// 3 instructions:
///   deposit   — add both assets; the first deposit into an empty pool sets the price
///   swap      — trade one pooled asset for the other, fee retained in reserves
///   withdraw  — redeem an entire position pro rata to recorded principal

// ─── Security contact ─────────────────────────────────────────────────────────

use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name:             "Liquidity Pool",
    project_url:      "https://github.com/liquidity-pool/liquidity-pool",
    contacts:         "email:security@liquidity-pool.dev",
    policy:           "Please report security vulnerabilities by email. \
                       We aim to respond within 48 hours.",
    source_code:      "https://github.com/liquidity-pool/liquidity-pool",
    preferred_languages: "en"
}

pub mod constants;
pub mod custody;
pub mod error;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;
pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("7jnBs9B2hHMtDA57hWKZLpQ986aYbLvtcijp4Z9ePdGR");

#[program]
pub mod liquidity_pool {
    use super::*;

    /// Add liquidity. Creates the pool and the caller's position if absent.
    pub fn deposit(ctx: Context<Deposit>, amount_a: u64, amount_b: u64) -> Result<()> {
        deposit::handler(ctx, amount_a, amount_b)
    }

    /// Sell `amount_in` of the asset held in `trader_in` for the other one.
    pub fn swap(ctx: Context<Swap>, amount_in: u64) -> Result<()> {
        swap::handler(ctx, amount_in)
    }

    /// Redeem the caller's entire position and close it.
    ///
    /// Closing returns the position's rent, so a repeat call finds no account
    /// and is refused during account validation with Anchor's
    /// `AccountNotInitialized` (3012) before the handler runs. Clients should
    /// read that code as "no open position"; `PositionNotFound` is raised for
    /// a position account that exists with zero principal.
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        withdraw::handler(ctx)
    }
}
