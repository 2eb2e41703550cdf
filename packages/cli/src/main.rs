use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use liquidity_pool_sdk::{
    instructions::PROGRAM_ID,
    math::{matching_amount_b, quote_deposit, quote_swap, quote_withdraw},
    Asset, PoolClient, PoolState, PositionState,
};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

// ─── Defaults, mirroring programs/liquidity-pool/src/constants.rs ───────────

const DEFAULT_FEE_BPS: u16       = 30;  // 0.30 %
const DEFAULT_TOLERANCE_BPS: u16 = 100; // 1 %

fn print_banner() {
    let ver = env!("CARGO_PKG_VERSION");
    println!();
    println!("  Liquidity Pool  v{ver}  ·  constant-product AMM on Solana");
    println!("  {}", "─".repeat(62));
    println!("  Program   {PROGRAM_ID}");
    println!("  Fees      {:.2}% per swap, charged on the input", DEFAULT_FEE_BPS as f64 / 100.0);
    println!("  Deposits  within {:.2}% of the pool ratio", DEFAULT_TOLERANCE_BPS as f64 / 100.0);
    println!();
}

// ─── CLI definition ───────────────────────────────────────────────────────────

/// Liquidity Pool — two-asset constant-product AMM on Solana.
///
/// Quote commands run offline against reserves you pass in; pool-info and
/// position read live accounts over JSON-RPC. Every command supports --json.
#[derive(Parser, Debug)]
#[command(
    name    = "liquidity-pool",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Quote and inspect a two-asset constant-product liquidity pool on Solana.",
    after_help = "\
ENVIRONMENT:
  LIQUIDITY_POOL_RPC_URL      Solana JSON-RPC endpoint  [default: https://api.mainnet-beta.solana.com]
  LIQUIDITY_POOL_PROGRAM_ID   Program to read accounts from

QUICK START:
  liquidity-pool quote-swap     --reserve-a 1000 --reserve-b 20 --amount 500
  liquidity-pool quote-deposit  --reserve-a 1000 --reserve-b 20 --amount-a 400
  liquidity-pool pool-info      --pair <MINT_A>-<MINT_B>"
)]
struct Cli {
    /// Solana JSON-RPC endpoint
    #[arg(
        long,
        global     = true,
        value_name = "URL",
        default_value = "https://api.mainnet-beta.solana.com",
        env = "LIQUIDITY_POOL_RPC_URL"
    )]
    rpc_url: String,

    /// Program ID of the deployed pool program
    #[arg(long, global = true, value_name = "PUBKEY", env = "LIQUIDITY_POOL_PROGRAM_ID")]
    program_id: Option<String>,

    /// Output machine-readable JSON instead of human-readable text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    A,
    B,
}

impl From<Side> for Asset {
    fn from(side: Side) -> Asset {
        match side {
            Side::A => Asset::A,
            Side::B => Asset::B,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a deposit pair against given reserves (offline)
    ///
    /// Leave out --amount-b to get the B amount matching the pool ratio.
    QuoteDeposit {
        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        reserve_a: u64,
        #[arg(long, value_name = "AMOUNT", default_value_t = 0)]
        reserve_b: u64,
        #[arg(long, value_name = "AMOUNT")]
        amount_a: u64,
        #[arg(long, value_name = "AMOUNT")]
        amount_b: Option<u64>,
        #[arg(long, value_name = "BPS", default_value_t = DEFAULT_TOLERANCE_BPS)]
        tolerance_bps: u16,
    },

    /// Price a swap against given reserves (offline)
    QuoteSwap {
        #[arg(long, value_name = "AMOUNT")]
        reserve_a: u64,
        #[arg(long, value_name = "AMOUNT")]
        reserve_b: u64,
        /// Amount of the input asset, atomic units
        #[arg(long, value_name = "AMOUNT")]
        amount: u64,
        /// Asset being sold
        #[arg(long = "in", value_enum, default_value_t = Side::A)]
        input: Side,
        #[arg(long, value_name = "BPS", default_value_t = DEFAULT_FEE_BPS)]
        fee_bps: u16,
    },

    /// Pro-rata payout of a full redemption (offline)
    QuoteWithdraw {
        #[arg(long, value_name = "AMOUNT")]
        reserve_a: u64,
        #[arg(long, value_name = "AMOUNT")]
        reserve_b: u64,
        #[arg(long, value_name = "AMOUNT")]
        total_a: u64,
        #[arg(long, value_name = "AMOUNT")]
        total_b: u64,
        #[arg(long, value_name = "AMOUNT")]
        principal_a: u64,
        #[arg(long, value_name = "AMOUNT")]
        principal_b: u64,
    },

    /// Show a pool's reserves, totals, fee config and vault balances
    PoolInfo {
        /// Ordered mint pair, MINT_A-MINT_B
        #[arg(long, value_name = "A-B")]
        pair: String,
    },

    /// Show an owner's position and what it would redeem for now
    Position {
        #[arg(long, value_name = "A-B")]
        pair: String,
        #[arg(long, value_name = "PUBKEY")]
        owner: String,
    },
}

/// JSON envelope shared by every command.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    status:  &'a str,
    command: &'a str,
    #[serde(flatten)]
    body:    T,
}

fn emit_json<T: Serialize>(command: &str, body: T) -> Result<()> {
    let out = serde_json::to_string_pretty(&Envelope { status: "ok", command, body })?;
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // When invoked with no arguments, show banner + full help and exit cleanly.
    if std::env::args().len() == 1 {
        print_banner();
        Cli::command().print_long_help().ok();
        println!();
        return Ok(());
    }

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::QuoteDeposit { reserve_a, reserve_b, amount_a, amount_b, tolerance_bps } => {
            let pool = offline_pool(*reserve_a, *reserve_b, DEFAULT_FEE_BPS, *tolerance_bps);
            cmd_quote_deposit(&pool, *amount_a, *amount_b, cli.json)
        }
        Commands::QuoteSwap { reserve_a, reserve_b, amount, input, fee_bps } => {
            let pool = offline_pool(*reserve_a, *reserve_b, *fee_bps, DEFAULT_TOLERANCE_BPS);
            cmd_quote_swap(&pool, (*input).into(), *amount, cli.json)
        }
        Commands::QuoteWithdraw { reserve_a, reserve_b, total_a, total_b, principal_a, principal_b } => {
            let pool = PoolState {
                total_a_deposited: *total_a,
                total_b_deposited: *total_b,
                ..offline_pool(*reserve_a, *reserve_b, DEFAULT_FEE_BPS, DEFAULT_TOLERANCE_BPS)
            };
            let position = PositionState {
                owner: Pubkey::default(),
                pool: Pubkey::default(),
                asset_a_deposited: *principal_a,
                asset_b_deposited: *principal_b,
            };
            cmd_quote_withdraw(&pool, &position, cli.json)
        }
        Commands::PoolInfo { pair } => cmd_pool_info(&client(&cli)?, pair, cli.json).await,
        Commands::Position { pair, owner } => {
            cmd_position(&client(&cli)?, pair, owner, cli.json).await
        }
    }
}

// ─── Offline quotes ──────────────────────────────────────────────────────────

/// Pool snapshot for offline quoting: reserves double as principal totals.
fn offline_pool(reserve_a: u64, reserve_b: u64, fee_rate_bps: u16, ratio_tolerance_bps: u16) -> PoolState {
    PoolState {
        mint_a: Pubkey::new_from_array([1; 32]),
        mint_b: Pubkey::new_from_array([2; 32]),
        reserve_a,
        reserve_b,
        total_a_deposited: reserve_a,
        total_b_deposited: reserve_b,
        fees_collected_quote: 0,
        fee_rate_bps,
        ratio_tolerance_bps,
        quote: Asset::A,
    }
}

fn cmd_quote_deposit(pool: &PoolState, amount_a: u64, amount_b: Option<u64>, json_output: bool) -> Result<()> {
    let amount_b = match amount_b {
        Some(b) => b,
        None => matching_amount_b(pool, amount_a)?.ok_or_else(|| anyhow!(
            "Pool is empty: the first deposit sets the price, so pass --amount-b explicitly."
        ))?,
    };
    let quote = quote_deposit(pool, amount_a, amount_b).context("deposit would be rejected")?;

    if json_output {
        return emit_json("quote-deposit", &quote);
    }
    println!("─── Deposit Quote ────────────────────────────────────────────────");
    println!("  Amount A         {:>20}", quote.amount_a);
    println!("  Amount B         {:>20}", quote.amount_b);
    if quote.genesis {
        println!("  Genesis deposit  sets the price at {:.8} B/A", amount_b as f64 / amount_a as f64);
    } else {
        println!("  Implied B        {:>20}", quote.implied_b);
        println!("  Deviation        {:>17} bps  (tolerance {} bps)", quote.deviation_bps, quote.tolerance_bps);
    }
    println!("  Reserves after   ({}, {})", quote.reserve_a_after, quote.reserve_b_after);
    Ok(())
}

fn cmd_quote_swap(pool: &PoolState, input: Asset, amount_in: u64, json_output: bool) -> Result<()> {
    let quote = quote_swap(pool, &pool.mint(input), amount_in).context("swap would be rejected")?;

    if json_output {
        return emit_json("quote-swap", &quote);
    }
    let dir = match input {
        Asset::A => "A → B",
        Asset::B => "B → A",
    };
    println!("─── Swap Quote ({dir}) ───────────────────────────────────────────");
    println!("  Reserve in       {:>20}", quote.reserve_in);
    println!("  Reserve out      {:>20}", quote.reserve_out);
    println!();
    println!("  Amount in        {:>20}", quote.amount_in);
    println!("  Fee              {:>20}  ({:.2}%, stays in the pool)",
             quote.fee_amount, quote.fee_rate_bps as f64 / 100.0);
    println!("  After fee        {:>20}", quote.amount_in_after_fee);
    println!("  Amount out       {:>20}", quote.amount_out);
    println!("  Effective rate   {:>20.8}  (raw units)", quote.effective_rate);
    println!("  Price impact     {:>19.4}%", quote.price_impact_pct);
    println!("  Reserves after   ({}, {})", quote.reserve_in_after, quote.reserve_out_after);
    Ok(())
}

fn cmd_quote_withdraw(pool: &PoolState, position: &PositionState, json_output: bool) -> Result<()> {
    let quote = quote_withdraw(pool, position).context("withdraw would be rejected")?;

    if json_output {
        return emit_json("quote-withdraw", &quote);
    }
    println!("─── Withdraw Quote ───────────────────────────────────────────────");
    println!("  Principal        ({}, {})", quote.principal_a, quote.principal_b);
    println!("  Payout A         {:>20}", quote.payout_a);
    println!("  Payout B         {:>20}", quote.payout_b);
    Ok(())
}

// ─── Live reads ───────────────────────────────────────────────────────────────

fn client(cli: &Cli) -> Result<PoolClient> {
    let client = PoolClient::new(cli.rpc_url.clone());
    Ok(match &cli.program_id {
        Some(id) => client.with_program_id(Pubkey::from_str(id).context("--program-id")?),
        None => client,
    })
}

async fn cmd_pool_info(client: &PoolClient, pair: &str, json_output: bool) -> Result<()> {
    let (mint_a, mint_b) = parse_pair(pair)?;
    let info = client.pool_info(&mint_a, &mint_b).await.with_context(|| format!(
        "Could not load pool for '{pair}'. The first deposit creates it."
    ))?;

    if json_output {
        return emit_json("pool-info", &info);
    }
    println!("─── Pool Info ────────────────────────────────────────────────────");
    println!("  Pool             {}", info.pool);
    println!();
    println!("  Mint A           {}", info.mint_a);
    println!("  Vault A          {}  (balance {})", info.vault_a, info.vault_a_balance);
    println!("  Reserve A        {:>20}", info.reserve_a);
    println!("  Deposited A      {:>20}", info.total_a_deposited);
    println!();
    println!("  Mint B           {}", info.mint_b);
    println!("  Vault B          {}  (balance {})", info.vault_b, info.vault_b_balance);
    println!("  Reserve B        {:>20}", info.reserve_b);
    println!("  Deposited B      {:>20}", info.total_b_deposited);
    println!();
    println!("  Fee rate         {} bps  ({:.2}% per swap)",
             info.fee_rate_bps, info.fee_rate_bps as f64 / 100.0);
    println!("  Ratio tolerance  {} bps", info.ratio_tolerance_bps);
    println!("  Fees collected   {:>20}  (quote asset {:?})", info.fees_collected_quote, info.quote);
    match info.spot_price_b_per_a {
        Some(price) => println!("  Spot price       {price:.8}  B/A  (raw atomic units)"),
        None => println!("  Spot price       — (pool is empty, next deposit sets it)"),
    }
    Ok(())
}

async fn cmd_position(client: &PoolClient, pair: &str, owner: &str, json_output: bool) -> Result<()> {
    let (mint_a, mint_b) = parse_pair(pair)?;
    let owner = Pubkey::from_str(owner).context("--owner")?;
    let info = client.position_info(&mint_a, &mint_b, &owner).await?;

    if json_output {
        return emit_json("position", &info);
    }
    println!("─── Position ─────────────────────────────────────────────────────");
    println!("  Position         {}", info.position);
    println!("  Owner            {}", info.owner);
    println!("  Pool             {}", info.pool);
    println!("  Principal A      {:>20}", info.asset_a_deposited);
    println!("  Principal B      {:>20}", info.asset_b_deposited);
    println!("  Redeemable A     {:>20}", info.redeemable.payout_a);
    println!("  Redeemable B     {:>20}", info.redeemable.payout_b);
    Ok(())
}

/// Parse `"MINT_A-MINT_B"` into the ordered pair the pool PDA is keyed on.
fn parse_pair(pair: &str) -> Result<(Pubkey, Pubkey)> {
    let (a, b) = pair.split_once('-').filter(|(a, b)| !a.is_empty() && !b.is_empty()).ok_or_else(|| anyhow!(
        "--pair must be MINT_A-MINT_B (base-58 mint addresses). Got: '{pair}'"
    ))?;
    let mint_a = Pubkey::from_str(a).context("pair: mint A")?;
    let mint_b = Pubkey::from_str(b).context("pair: mint B")?;
    if mint_a == mint_b {
        return Err(anyhow!("Mint A and mint B in --pair must be different."));
    }
    Ok((mint_a, mint_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn quote_swap_flags_parse() {
        let cli = Cli::try_parse_from([
            "liquidity-pool", "quote-swap", "--reserve-a", "1000", "--reserve-b", "20",
            "--amount", "500", "--in", "b", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::QuoteSwap { reserve_a, reserve_b, amount, input, fee_bps } => {
                assert_eq!((reserve_a, reserve_b, amount), (1_000, 20, 500));
                assert_eq!(input, Side::B);
                assert_eq!(fee_bps, DEFAULT_FEE_BPS);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn offline_quotes_run() {
        let pool = offline_pool(1_000, 20, 30, 100);
        cmd_quote_swap(&pool, Asset::A, 500, true).unwrap();
        cmd_quote_deposit(&pool, 400, None, false).unwrap();
        assert!(cmd_quote_deposit(&pool, 400, Some(9), false).is_err());
        assert!(cmd_quote_deposit(&offline_pool(0, 0, 30, 100), 400, None, false).is_err());
    }

    #[test]
    fn pair_parsing() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(parse_pair(&format!("{a}-{b}")).unwrap(), (a, b));
        assert!(parse_pair(&format!("{a}-{a}")).is_err());
        assert!(parse_pair("nope").is_err());
    }
}
