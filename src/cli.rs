use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wallet-spend-stats", version, about = "Wallet gas and NFT spending in ETH and USD")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print spending stats for a wallet
    Stats {
        #[arg(long)]
        address: String,
        /// Value in USD at today's price instead of the price at time
        #[arg(long, default_value_t = false)]
        current: bool,
    },
    /// Print the ETH/USD price
    Price {
        #[arg(long, default_value_t = false)]
        current: bool,
        /// Unix timestamp for the historical price (defaults to now)
        #[arg(long)]
        at: Option<i64>,
    },
    /// Run the HTTP API server
    Serve {
        /// Override bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        addr: Option<String>,
    },
}
