/// PDA seeds
pub const POOL_SEED: &[u8] = b"pool";
pub const POSITION_SEED: &[u8] = b"position";

/// Default swap fee: 0.30 %
pub const FEE_RATE_DEFAULT_BPS: u16 = 30;

/// Default deposit-ratio tolerance: 1 %
pub const RATIO_TOLERANCE_DEFAULT_BPS: u16 = 100;

/// Denominator for basis-point math (u128 to avoid up-cast noise)
pub const BPS_DENOMINATOR: u128 = 10_000;
