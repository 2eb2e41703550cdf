use anchor_lang::prelude::*;

#[error_code]
pub enum PoolError {
    #[msg("Amount must be greater than zero")]
    AmountZero,
    #[msg("Deposit ratio deviates from the pool ratio beyond tolerance")]
    RatioMismatch,
    #[msg("Token mint is not one of the pool's assets")]
    UnknownMint,
    #[msg("Vault is not the pool's associated token account")]
    VaultMismatch,
    #[msg("No open liquidity position for this owner")]
    PositionNotFound,
    #[msg("Caller balance is too low for the requested transfer")]
    InsufficientCallerBalance,
    #[msg("Pool has insufficient liquidity")]
    InsufficientLiquidity,
    #[msg("Math overflow")]
    ArithmeticOverflow,
    #[msg("Division by zero")]
    DivisionByZero,
    #[msg("Pool config out of range")]
    InvalidConfig,
    #[msg("Pool bookkeeping invariant broken")]
    InvariantBroken,
}

/// Coarse failure classes. Everything except `Fatal` is caller-correctable
/// and guaranteed to leave pool and position state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Resource,
    Arithmetic,
    Fatal,
}

impl PoolError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PoolError::AmountZero
            | PoolError::RatioMismatch
            | PoolError::UnknownMint
            | PoolError::VaultMismatch
            | PoolError::PositionNotFound
            | PoolError::InvalidConfig => ErrorClass::Validation,
            PoolError::InsufficientCallerBalance | PoolError::InsufficientLiquidity => {
                ErrorClass::Resource
            }
            PoolError::ArithmeticOverflow | PoolError::DivisionByZero => ErrorClass::Arithmetic,
            PoolError::InvariantBroken => ErrorClass::Fatal,
        }
    }
}

/// Log and build the fatal bookkeeping error. The log line is distinct from
/// the per-operation lines so defects stand out in transaction logs.
pub fn invariant_broken(what: &str) -> anchor_lang::error::Error {
    msg!("INVARIANT BROKEN: {}", what);
    error!(PoolError::InvariantBroken)
}
