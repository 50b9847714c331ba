mod cli;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;

use wallet_spend_stats::activity::{ActivitySource, ChainActivity, FixedActivity};
use wallet_spend_stats::api::{self, AppState};
use wallet_spend_stats::config::Config;
use wallet_spend_stats::eth::EthClient;
use wallet_spend_stats::format::{format_usd, price_mode_label};
use wallet_spend_stats::models::{PriceMode, WalletAddress};
use wallet_spend_stats::price::{CoingeckoOracle, PriceSource};
use wallet_spend_stats::stats::StatsAggregator;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let price: Arc<dyn PriceSource> = Arc::new(CoingeckoOracle::new(
        config.price_api_base_url.clone(),
        config.price_asset_id.clone(),
    ));
    let activity: Arc<dyn ActivitySource> = if config.use_chain_activity {
        let client = EthClient::new(&config.eth_rpc_url)?;
        Arc::new(ChainActivity::new(client))
    } else {
        Arc::new(FixedActivity)
    };
    let aggregator = StatsAggregator::new(activity, price.clone());

    match cli.command {
        Commands::Stats { address, current } => {
            let report = aggregator
                .compute_report(&WalletAddress::new(address), current)
                .await;
            println!("{} ({})", report.address, price_mode_label(current));
            for row in &report.rows {
                println!("  {:<20} {:>14}  {:>12}", row.label, row.eth, row.usd);
            }
            println!("  ETH price: {}", format_usd(report.price_usd));
            if let Some(block) = report.as_of_block {
                println!("  as of block {}", block);
            }
        }
        Commands::Price { current, at } => {
            let mode = if current {
                PriceMode::Current
            } else {
                PriceMode::Historical {
                    timestamp: at.unwrap_or_else(|| Utc::now().timestamp()),
                }
            };
            let usd = price.price_usd(mode).await;
            println!("{}", format_usd(usd));
        }
        Commands::Serve { addr } => {
            let bind = addr.unwrap_or_else(|| config.http_bind_addr.clone());
            let state = AppState { aggregator, price };
            api::run_http_server(&bind, state).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
