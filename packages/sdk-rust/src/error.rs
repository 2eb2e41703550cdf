//! SDK error type.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the liquidity-pool SDK.
///
/// The quote variants mirror the program's caller-correctable failures, so a
/// quote that fails here would fail on-chain for the same reason.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Account discovery ────────────────────────────────────────────────────
    /// No pool account exists for the ordered mint pair.
    #[error("Pool not found for mints {0} / {1}")]
    PoolNotFound(Pubkey, Pubkey),

    /// The owner has no open position in the pool.
    #[error("No open position for owner {owner} in pool {pool}")]
    PositionNotFound { pool: Pubkey, owner: Pubkey },

    // ── Quote validation ─────────────────────────────────────────────────────
    #[error("Amount must be greater than zero")]
    AmountZero,

    /// Deposit pair strays from the pool ratio by more than the tolerance.
    #[error("Deposit ratio off by {deviation_bps} bps; pool tolerance is {tolerance_bps} bps")]
    RatioMismatch { deviation_bps: u64, tolerance_bps: u16 },

    #[error("Mint {0} is not one of the pool's assets")]
    UnknownMint(Pubkey),

    /// Reserves are empty or the trade would round to nothing / drain the pool.
    #[error("Pool has insufficient liquidity for this trade")]
    InsufficientLiquidity,

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in pool math")]
    MathOverflow,

    #[error("Division by zero in pool math")]
    DivisionByZero,

    // ── Account parsing ──────────────────────────────────────────────────────
    /// Raw account bytes could not be deserialized.
    #[error("Account parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
