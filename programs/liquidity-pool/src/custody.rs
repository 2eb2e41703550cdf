use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};
use crate::{constants::*, state::Asset};

/// The vaults that actually hold the pooled assets, seen from one caller.
///
/// Procedures read `caller_balance` while validating and only move tokens
/// once every precondition has passed; the pool record is written after the
/// transfers, inside the same atomic unit.
pub trait ReserveCustody {
    /// Balance of the caller's own account for `asset`.
    fn caller_balance(&self, asset: Asset) -> u64;

    /// Caller → pool vault.
    fn collect(&mut self, asset: Asset, amount: u64) -> Result<()>;

    /// Pool vault → caller, signed by the pool PDA.
    fn disburse(&mut self, asset: Asset, amount: u64) -> Result<()>;
}

// ─── SPL token custody ─────────────────────────────────────────────────────
// Vaults are associated token accounts owned by the pool PDA, which signs
// outbound transfers with seeds [POOL_SEED, mint_a, mint_b, bump].
pub struct TokenCustody<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub caller: AccountInfo<'info>,
    pub caller_a: &'a Account<'info, TokenAccount>,
    pub caller_b: &'a Account<'info, TokenAccount>,
    pub vault_a: &'a Account<'info, TokenAccount>,
    pub vault_b: &'a Account<'info, TokenAccount>,
    pub pool: AccountInfo<'info>,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub pool_bump: u8,
}

impl<'a, 'info> TokenCustody<'a, 'info> {
    fn caller_account(&self, asset: Asset) -> &'a Account<'info, TokenAccount> {
        match asset {
            Asset::A => self.caller_a,
            Asset::B => self.caller_b,
        }
    }

    fn vault(&self, asset: Asset) -> &'a Account<'info, TokenAccount> {
        match asset {
            Asset::A => self.vault_a,
            Asset::B => self.vault_b,
        }
    }
}

impl<'a, 'info> ReserveCustody for TokenCustody<'a, 'info> {
    fn caller_balance(&self, asset: Asset) -> u64 {
        self.caller_account(asset).amount
    }

    fn collect(&mut self, asset: Asset, amount: u64) -> Result<()> {
        token::transfer(
            CpiContext::new(
                self.token_program.clone(),
                Transfer {
                    from: self.caller_account(asset).to_account_info(),
                    to: self.vault(asset).to_account_info(),
                    authority: self.caller.clone(),
                },
            ),
            amount,
        )
    }

    fn disburse(&mut self, asset: Asset, amount: u64) -> Result<()> {
        let bump = [self.pool_bump];
        let seeds: &[&[u8]] = &[
            POOL_SEED,
            self.mint_a.as_ref(),
            self.mint_b.as_ref(),
            &bump,
        ];
        let signer = &[seeds];

        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.vault(asset).to_account_info(),
                    to: self.caller_account(asset).to_account_info(),
                    authority: self.pool.clone(),
                },
                signer,
            ),
            amount,
        )
    }
}
