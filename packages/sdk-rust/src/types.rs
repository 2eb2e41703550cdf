//! Serializable quote and snapshot types returned by the SDK.
//!
//! Pubkeys are rendered as base-58 strings so the structs print cleanly
//! through `serde_json`.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use crate::state::{Asset, PoolState, PositionState};

/// Outcome of checking a deposit pair against the current reserves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositQuote {
    pub amount_a:      u64,
    pub amount_b:      u64,
    /// The pool is empty; this deposit sets the price.
    pub genesis:       bool,
    /// `amount_a * reserve_b / reserve_a`, floored. Zero for genesis.
    pub implied_b:     u64,
    /// Relative distance of `amount_b` from `implied_b`, in bps (rounded up).
    pub deviation_bps: u64,
    pub tolerance_bps: u16,
    pub reserve_a_after: u64,
    pub reserve_b_after: u64,
}

/// Fee and output breakdown for a hypothetical swap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapQuote {
    pub input:              Asset,
    pub amount_in:          u64,
    pub fee_amount:         u64,
    pub amount_in_after_fee: u64,
    pub amount_out:         u64,
    pub fee_rate_bps:       u16,
    pub reserve_in:         u64,
    pub reserve_out:        u64,
    pub reserve_in_after:   u64,
    pub reserve_out_after:  u64,
    /// Fee added to `fees_collected_quote` (zero for non-quote input).
    pub quote_fee:          u64,
    /// Output per unit of input, raw units.
    pub effective_rate:     f64,
    /// Shortfall of the executed rate against the pre-trade spot rate
    /// `reserve_out / reserve_in`, fee included, as a percentage.
    pub price_impact_pct:   f64,
}

/// Pro-rata payout for a full redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawQuote {
    pub principal_a: u64,
    pub principal_b: u64,
    pub payout_a:    u64,
    pub payout_b:    u64,
}

/// Pool account plus derived addresses, as shown by `pool-info`.
#[derive(Debug, Clone, Serialize)]
pub struct PoolInfo {
    pub pool:                 String,
    pub mint_a:               String,
    pub mint_b:               String,
    pub vault_a:              String,
    pub vault_b:              String,
    pub reserve_a:            u64,
    pub reserve_b:            u64,
    /// Live vault balances; at least the recorded reserves.
    pub vault_a_balance:      u64,
    pub vault_b_balance:      u64,
    pub total_a_deposited:    u64,
    pub total_b_deposited:    u64,
    pub fees_collected_quote: u64,
    pub fee_rate_bps:         u16,
    pub ratio_tolerance_bps:  u16,
    pub quote:                Asset,
    /// reserve_b / reserve_a in raw units; `None` while the pool is empty.
    pub spot_price_b_per_a:   Option<f64>,
}

impl PoolInfo {
    pub fn new(
        pool: Pubkey,
        state: &PoolState,
        vaults: (Pubkey, Pubkey),
        balances: (u64, u64),
    ) -> Self {
        let spot = if state.reserve_a > 0 {
            Some(state.reserve_b as f64 / state.reserve_a as f64)
        } else {
            None
        };
        Self {
            pool:                 pool.to_string(),
            mint_a:               state.mint_a.to_string(),
            mint_b:               state.mint_b.to_string(),
            vault_a:              vaults.0.to_string(),
            vault_b:              vaults.1.to_string(),
            reserve_a:            state.reserve_a,
            reserve_b:            state.reserve_b,
            vault_a_balance:      balances.0,
            vault_b_balance:      balances.1,
            total_a_deposited:    state.total_a_deposited,
            total_b_deposited:    state.total_b_deposited,
            fees_collected_quote: state.fees_collected_quote,
            fee_rate_bps:         state.fee_rate_bps,
            ratio_tolerance_bps:  state.ratio_tolerance_bps,
            quote:                state.quote,
            spot_price_b_per_a:   spot,
        }
    }
}

/// An owner's position with the payout it would redeem for right now.
#[derive(Debug, Clone, Serialize)]
pub struct PositionInfo {
    pub position:          String,
    pub owner:             String,
    pub pool:              String,
    pub asset_a_deposited: u64,
    pub asset_b_deposited: u64,
    pub redeemable:        WithdrawQuote,
}

impl PositionInfo {
    pub fn new(position: Pubkey, state: &PositionState, redeemable: WithdrawQuote) -> Self {
        Self {
            position:          position.to_string(),
            owner:             state.owner.to_string(),
            pool:              state.pool.to_string(),
            asset_a_deposited: state.asset_a_deposited,
            asset_b_deposited: state.asset_b_deposited,
            redeemable,
        }
    }
}
