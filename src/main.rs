//! Command-line driver for the prediction adapters.
//!
//! Usage:
//!   predictionbets <platform> status
//!   predictionbets <platform> claimable
//!   predictionbets <platform> claim
//!   predictionbets <platform> bull <epoch> <amount_wei>
//!   predictionbets <platform> bear <epoch> <amount_wei>
//!
//! `<platform>` is one of dogebets, pancakeswap, candlegenie. The signing key
//! is read from PREDICTION_PRIVATE_KEY (a `.env` file is honoured).

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use alloy::primitives::U256;
use predictionbets::chain::AlloyChain;
use predictionbets::config::Config;
use predictionbets::prediction::{connect_platform, ClaimOutcome, Platform, PredictionClient};

const CONFIG_PATH: &str = "predictionbets.toml";

#[derive(Debug)]
enum Command {
    Status,
    Claimable,
    Claim,
    Bull { epoch: u64, amount: U256 },
    Bear { epoch: u64, amount: U256 },
}

fn parse_args(args: &[String]) -> Result<(Platform, Command)> {
    let platform: Platform = match args.get(1) {
        Some(p) => p.parse().map_err(anyhow::Error::msg)?,
        None => bail!("usage: predictionbets <platform> <status|claimable|claim|bull|bear> [epoch amount_wei]"),
    };

    let bet_args = || -> Result<(u64, U256)> {
        let epoch = args
            .get(3)
            .context("missing epoch")?
            .parse::<u64>()
            .context("epoch must be an integer")?;
        let amount = args
            .get(4)
            .context("missing amount")?
            .parse::<U256>()
            .context("amount must be an integer number of wei")?;
        Ok((epoch, amount))
    };

    let command = match args.get(2).map(String::as_str) {
        Some("status") | None => Command::Status,
        Some("claimable") => Command::Claimable,
        Some("claim") => Command::Claim,
        Some("bull") => {
            let (epoch, amount) = bet_args()?;
            Command::Bull { epoch, amount }
        }
        Some("bear") => {
            let (epoch, amount) = bet_args()?;
            Command::Bear { epoch, amount }
        }
        Some(other) => bail!("unknown command: {other}"),
    };

    Ok((platform, command))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let mut config = if Path::new(CONFIG_PATH).exists() {
        Config::load(Path::new(CONFIG_PATH))?
    } else {
        Config::from_env()
    };

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    let (platform, command) = parse_args(&args)?;

    info!("predictionbets v{} starting", env!("CARGO_PKG_VERSION"));

    let private_key = config.take_private_key()?;
    let chain = Arc::new(AlloyChain::connect(&config.chain.rpc_url).await?);
    let client = connect_platform(
        platform,
        chain,
        config.contract_address(platform)?,
        &private_key,
        config.tx_settings()?,
    )?;
    drop(private_key);

    match command {
        Command::Status => {
            let paused = client.is_paused().await?;
            let epoch = client.current_epoch().await?;
            let rounds = client.user_rounds_count(client.address()).await?;
            println!("platform:      {}", platform);
            println!("wallet:        {}", client.address());
            println!("paused:        {}", paused);
            println!("current epoch: {}", epoch);
            println!("rounds played: {}", rounds);
        }
        Command::Claimable => {
            let epochs = client.fetch_claimable(client.claim_window()).await?;
            if epochs.is_empty() {
                println!("nothing to claim");
            } else {
                println!("claimable epochs: {:?}", epochs);
            }
        }
        Command::Claim => match client.user_claim().await? {
            None => println!("nothing to claim"),
            Some(ClaimOutcome::Confirmed(receipt)) => {
                println!(
                    "claim confirmed: tx {} in block {:?} (success: {})",
                    receipt.transaction_hash,
                    receipt.block_number,
                    receipt.status()
                );
            }
            Some(ClaimOutcome::Submitted(hash)) => {
                println!("claim submitted: tx {} (not awaited)", hash);
            }
        },
        Command::Bull { epoch, amount } => {
            let hash = client.bet_bull(epoch, amount).await?;
            println!("bull bet submitted: tx {}", hash);
        }
        Command::Bear { epoch, amount } => {
            let hash = client.bet_bear(epoch, amount).await?;
            println!("bear bet submitted: tx {}", hash);
        }
    }

    Ok(())
}
