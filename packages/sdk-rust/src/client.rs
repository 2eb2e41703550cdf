//! [`PoolClient`] — read-only access to live pool and position accounts.
//!
//! Transaction submission stays with the caller: build instructions with
//! [`crate::instructions`] and sign them with whatever wallet stack you use.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::{
    error::{Error, Result},
    instructions::{derive_ata, derive_pool, derive_position, PROGRAM_ID},
    math::{quote_deposit, quote_swap, quote_withdraw},
    state::{parse_pool, parse_position, parse_token_amount, PoolState, PositionState},
    types::{DepositQuote, PoolInfo, PositionInfo, SwapQuote, WithdrawQuote},
};

// ─── Constants ────────────────────────────────────────────────────────────────

const DEVNET_RPC:  &str = "https://api.devnet.solana.com";
const MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async liquidity-pool client for Solana.
///
/// ```rust,no_run
/// # use liquidity_pool_sdk::PoolClient;
/// # use solana_sdk::pubkey::Pubkey;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = PoolClient::devnet();
/// let (mint_a, mint_b) = (Pubkey::new_unique(), Pubkey::new_unique());
/// let quote = client.simulate_swap(&mint_a, &mint_b, &mint_a, 1_000_000).await?;
/// println!("Estimated out: {}", quote.amount_out);
/// # Ok(())
/// # }
/// ```
pub struct PoolClient {
    rpc_url:    String,
    program_id: Pubkey,
}

impl PoolClient {
    /// Create a client pointing at any RPC endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self { rpc_url: rpc_url.into(), program_id: PROGRAM_ID }
    }

    /// Pre-configured client for Solana devnet.
    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    /// Pre-configured client for Solana mainnet-beta.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    /// Override the program ID (useful for locally deployed programs in tests).
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    // ── Account reads ─────────────────────────────────────────────────────────

    /// Fetch and decode the pool for the ordered pair `(mint_a, mint_b)`.
    pub async fn fetch_pool(&self, mint_a: &Pubkey, mint_b: &Pubkey) -> Result<(Pubkey, PoolState)> {
        let (pool, _) = derive_pool(mint_a, mint_b, &self.program_id);
        let account = self
            .rpc()
            .get_account_with_commitment(&pool, CommitmentConfig::confirmed())
            .await?
            .value
            .ok_or(Error::PoolNotFound(*mint_a, *mint_b))?;
        Ok((pool, parse_pool(&account.data)?))
    }

    /// Fetch `owner`'s open position in the pool.
    pub async fn fetch_position(&self, pool: &Pubkey, owner: &Pubkey) -> Result<(Pubkey, PositionState)> {
        let (position, _) = derive_position(pool, owner, &self.program_id);
        let not_found = || Error::PositionNotFound { pool: *pool, owner: *owner };
        let account = self
            .rpc()
            .get_account_with_commitment(&position, CommitmentConfig::confirmed())
            .await?
            .value
            .ok_or_else(not_found)?;
        let state = parse_position(&account.data)?;
        if !state.is_open() {
            return Err(not_found());
        }
        Ok((position, state))
    }

    /// Pool state plus live vault balances.
    pub async fn pool_info(&self, mint_a: &Pubkey, mint_b: &Pubkey) -> Result<PoolInfo> {
        let (pool, state) = self.fetch_pool(mint_a, mint_b).await?;
        let vault_a = derive_ata(&pool, mint_a);
        let vault_b = derive_ata(&pool, mint_b);
        let balances = self.vault_balances(&vault_a, &vault_b).await?;
        Ok(PoolInfo::new(pool, &state, (vault_a, vault_b), balances))
    }

    /// `owner`'s position with the payout it would redeem for right now.
    pub async fn position_info(
        &self,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
        owner:  &Pubkey,
    ) -> Result<PositionInfo> {
        let (pool, pool_state) = self.fetch_pool(mint_a, mint_b).await?;
        let (position, state) = self.fetch_position(&pool, owner).await?;
        let redeemable = quote_withdraw(&pool_state, &state)?;
        Ok(PositionInfo::new(position, &state, redeemable))
    }

    // ── Quotes against live reserves ──────────────────────────────────────────

    pub async fn simulate_deposit(
        &self,
        mint_a:   &Pubkey,
        mint_b:   &Pubkey,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<DepositQuote> {
        let (_, state) = self.fetch_pool(mint_a, mint_b).await?;
        quote_deposit(&state, amount_a, amount_b)
    }

    pub async fn simulate_swap(
        &self,
        mint_a:    &Pubkey,
        mint_b:    &Pubkey,
        mint_in:   &Pubkey,
        amount_in: u64,
    ) -> Result<SwapQuote> {
        let (_, state) = self.fetch_pool(mint_a, mint_b).await?;
        quote_swap(&state, mint_in, amount_in)
    }

    pub async fn simulate_withdraw(
        &self,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
        owner:  &Pubkey,
    ) -> Result<WithdrawQuote> {
        Ok(self.position_info(mint_a, mint_b, owner).await?.redeemable)
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn rpc(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), CommitmentConfig::confirmed())
    }

    async fn vault_balances(&self, vault_a: &Pubkey, vault_b: &Pubkey) -> Result<(u64, u64)> {
        let rpc = self.rpc();
        let a = parse_token_amount(&rpc.get_account(vault_a).await?.data)?;
        let b = parse_token_amount(&rpc.get_account(vault_b).await?.data)?;
        Ok((a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_id_override() {
        let custom = Pubkey::new_unique();
        let client = PoolClient::new("http://localhost:8899").with_program_id(custom);
        assert_eq!(client.program_id(), &custom);
        assert_eq!(PoolClient::devnet().program_id(), &PROGRAM_ID);
    }

    #[tokio::test]
    async fn unreachable_rpc_surfaces_as_rpc_error() {
        // Port 1 is never served; the request fails before any decoding.
        let client = PoolClient::new("http://127.0.0.1:1");
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let err = client.fetch_pool(&a, &b).await.unwrap_err();
        assert!(matches!(err, Error::Rpc(_)), "got {err:?}");
    }
}
