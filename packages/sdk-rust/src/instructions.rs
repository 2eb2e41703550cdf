//! Low-level Anchor instruction builders.
//!
//! Each function constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission.  Account order mirrors the Anchor
//! `#[derive(Accounts)]` structs in the on-chain program exactly.
//!
//! Anchor instruction discriminators: `sha256("global:{name}")[..8]`.

use crate::error::{Error, Result};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey,
    pubkey::Pubkey,
};

// ─── Well-known program IDs ───────────────────────────────────────────────────

pub const PROGRAM_ID: Pubkey = pubkey!("7jnBs9B2hHMtDA57hWKZLpQ986aYbLvtcijp4Z9ePdGR");
pub const SPL_TOKEN_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const ATA_PROGRAM_ID: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

// ─── PDA seeds (mirrors programs/liquidity-pool/src/constants.rs) ────────────

pub const POOL_SEED:     &[u8] = b"pool";
pub const POSITION_SEED: &[u8] = b"position";

// ─── PDA derivation helpers ───────────────────────────────────────────────────

/// Derive the pool PDA for the ordered mint pair.
pub fn derive_pool(mint_a: &Pubkey, mint_b: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POOL_SEED, mint_a.as_ref(), mint_b.as_ref()],
        program_id,
    )
}

/// Derive the per-owner position PDA for a pool.
pub fn derive_position(pool: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POSITION_SEED, pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Derive the Associated Token Account for a wallet + mint.
///
/// The pool's vaults are `derive_ata(&pool, &mint_a)` / `derive_ata(&pool, &mint_b)`.
pub fn derive_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), SPL_TOKEN_ID.as_ref(), mint.as_ref()],
        &ATA_PROGRAM_ID,
    )
    .0
}

// ─── Discriminator ────────────────────────────────────────────────────────────

fn disc(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let h = solana_sdk::hash::hash(preimage.as_bytes());
    let mut d = [0u8; 8];
    d.copy_from_slice(&h.to_bytes()[..8]);
    d
}

// ─── deposit ──────────────────────────────────────────────────────────────────

/// Build the `deposit` instruction.
///
/// Creates the pool, its vaults and the owner's position on first use, so the
/// same builder serves the genesis deposit and every later one. The owner's
/// token accounts are their ATAs for the two mints.
pub fn deposit_ix(
    program_id: &Pubkey,
    owner:      &Pubkey,
    mint_a:     &Pubkey,
    mint_b:     &Pubkey,
    amount_a:   u64,
    amount_b:   u64,
) -> Instruction {
    let (pool, _)     = derive_pool(mint_a, mint_b, program_id);
    let (position, _) = derive_position(&pool, owner, program_id);

    let mut data = disc("deposit").to_vec();
    data.extend_from_slice(&amount_a.to_le_bytes());
    data.extend_from_slice(&amount_b.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner,                       true),   // mut + signer
            AccountMeta::new_readonly(*mint_a,             false),
            AccountMeta::new_readonly(*mint_b,             false),
            AccountMeta::new(pool,                         false),  // mut PDA (init_if_needed)
            AccountMeta::new(position,                     false),  // mut PDA (init_if_needed)
            AccountMeta::new(derive_ata(&pool, mint_a),    false),  // vault A
            AccountMeta::new(derive_ata(&pool, mint_b),    false),  // vault B
            AccountMeta::new(derive_ata(owner, mint_a),    false),
            AccountMeta::new(derive_ata(owner, mint_b),    false),
            AccountMeta::new_readonly(SPL_TOKEN_ID,        false),
            AccountMeta::new_readonly(ATA_PROGRAM_ID,      false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID,   false),
        ],
        data,
    }
}

// ─── swap ─────────────────────────────────────────────────────────────────────

/// Build the `swap` instruction selling `amount_in` of `mint_in`.
///
/// `mint_a` / `mint_b` are the pool's stored order; the direction comes from
/// which of the trader's ATAs is passed as `trader_in`. A `mint_in` that is
/// neither pool mint is rejected with [`Error::UnknownMint`].
pub fn swap_ix(
    program_id: &Pubkey,
    trader:     &Pubkey,
    mint_a:     &Pubkey,
    mint_b:     &Pubkey,
    mint_in:    &Pubkey,
    amount_in:  u64,
) -> Result<Instruction> {
    let mint_out = if mint_in == mint_a {
        mint_b
    } else if mint_in == mint_b {
        mint_a
    } else {
        return Err(Error::UnknownMint(*mint_in));
    };
    let (pool, _) = derive_pool(mint_a, mint_b, program_id);

    let mut data = disc("swap").to_vec();
    data.extend_from_slice(&amount_in.to_le_bytes());

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*trader,              true),
            AccountMeta::new(pool,                          false),  // mut
            AccountMeta::new(derive_ata(&pool, mint_a),     false),  // vault A
            AccountMeta::new(derive_ata(&pool, mint_b),     false),  // vault B
            AccountMeta::new(derive_ata(trader, mint_in),   false),
            AccountMeta::new(derive_ata(trader, mint_out),  false),
            AccountMeta::new_readonly(SPL_TOKEN_ID,         false),
        ],
        data,
    })
}

// ─── withdraw ─────────────────────────────────────────────────────────────────

/// Build the `withdraw` instruction. No arguments: the whole position is
/// redeemed and its account closed to `owner`.
pub fn withdraw_ix(
    program_id: &Pubkey,
    owner:      &Pubkey,
    mint_a:     &Pubkey,
    mint_b:     &Pubkey,
) -> Instruction {
    let (pool, _)     = derive_pool(mint_a, mint_b, program_id);
    let (position, _) = derive_position(&pool, owner, program_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner,                      true),   // mut + signer (rent refund)
            AccountMeta::new(pool,                        false),  // mut
            AccountMeta::new(position,                    false),  // mut (closed)
            AccountMeta::new(derive_ata(&pool, mint_a),   false),  // vault A
            AccountMeta::new(derive_ata(&pool, mint_b),   false),  // vault B
            AccountMeta::new(derive_ata(owner, mint_a),   false),
            AccountMeta::new(derive_ata(owner, mint_b),   false),
            AccountMeta::new_readonly(SPL_TOKEN_ID,       false),
        ],
        data: disc("withdraw").to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_pda_depends_on_mint_order() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (ab, _) = derive_pool(&a, &b, &PROGRAM_ID);
        let (ba, _) = derive_pool(&b, &a, &PROGRAM_ID);
        assert_ne!(ab, ba);
    }

    #[test]
    fn deposit_ix_layout() {
        let (owner, a, b) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let ix = deposit_ix(&PROGRAM_ID, &owner, &a, &b, 600, 12);

        assert_eq!(ix.accounts.len(), 12);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        let (pool, _) = derive_pool(&a, &b, &PROGRAM_ID);
        assert_eq!(ix.accounts[3].pubkey, pool);
        assert_eq!(ix.accounts[4].pubkey, derive_position(&pool, &owner, &PROGRAM_ID).0);
        assert_eq!(ix.accounts[5].pubkey, derive_ata(&pool, &a));

        assert_eq!(&ix.data[..8], &disc("deposit"));
        assert_eq!(&ix.data[8..16], &600u64.to_le_bytes());
        assert_eq!(&ix.data[16..24], &12u64.to_le_bytes());
    }

    #[test]
    fn swap_ix_orients_trader_accounts_by_input_mint() {
        let (trader, a, b) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let ix = swap_ix(&PROGRAM_ID, &trader, &a, &b, &b, 77).unwrap();

        assert_eq!(ix.accounts[4].pubkey, derive_ata(&trader, &b));
        assert_eq!(ix.accounts[5].pubkey, derive_ata(&trader, &a));
        assert!(!ix.accounts[0].is_writable);
        assert_eq!(ix.data.len(), 16);
    }

    #[test]
    fn swap_ix_rejects_foreign_input_mint() {
        let (trader, a, b) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let stranger = Pubkey::new_unique();
        let err = swap_ix(&PROGRAM_ID, &trader, &a, &b, &stranger, 77).unwrap_err();
        assert!(matches!(err, Error::UnknownMint(m) if m == stranger), "got {err:?}");
    }

    #[test]
    fn withdraw_ix_has_no_arguments() {
        let (owner, a, b) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let ix = withdraw_ix(&PROGRAM_ID, &owner, &a, &b);
        assert_eq!(ix.data, disc("withdraw").to_vec());
        assert_eq!(ix.accounts.len(), 8);
    }
}
