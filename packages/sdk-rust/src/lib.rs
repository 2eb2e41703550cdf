//! Liquidity Pool Rust SDK
//!
//! Off-chain companion to the two-asset constant-product pool program.
//! Decodes pool and position accounts, derives their addresses, builds the
//! `deposit` / `swap` / `withdraw` instructions, and quotes every operation
//! with the same integer arithmetic the program runs. No Anchor dependency
//! required.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use liquidity_pool_sdk::{instructions, PoolClient};
//! use solana_sdk::pubkey::Pubkey;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PoolClient::devnet();
//!     let (mint_a, mint_b) = (Pubkey::new_unique(), Pubkey::new_unique());
//!
//!     // 1. Quote first
//!     let quote = client.simulate_swap(&mint_a, &mint_b, &mint_a, 1_000_000).await?;
//!     println!("out: {}  price_impact: {:.2}%", quote.amount_out, quote.price_impact_pct);
//!
//!     // 2. Build the instruction; sign and send with your own wallet stack
//!     let trader = Pubkey::new_unique();
//!     let ix = instructions::swap_ix(client.program_id(), &trader, &mint_a, &mint_b, &mint_a, 1_000_000)?;
//!     println!("{} accounts", ix.accounts.len());
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Item | Description |
//! |------|-------------|
//! | [`PoolClient::pool_info`] | Pool reserves, totals, fee config, vault balances |
//! | [`PoolClient::position_info`] | An owner's principal and current redeemable payout |
//! | [`math::quote_deposit`] | Genesis / ratio-tolerance check for a deposit pair |
//! | [`math::quote_swap`] | Fee, output and post-trade reserves |
//! | [`math::quote_withdraw`] | Pro-rata payout of a full redemption |

pub mod client;
pub mod error;
pub mod instructions;
pub mod math;
pub mod state;
pub mod types;

pub use client::PoolClient;
pub use error::{Error, Result};
pub use state::{Asset, PoolState, PositionState};
pub use types::*;
