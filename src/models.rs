use std::fmt;

use ethers_core::types::U256;
use serde::Serialize;

/// Wallet identifier as supplied by the caller. Not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Native amounts are in wei; fiat amounts are USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionStats {
    pub total_gas_fees: U256,
    pub total_nft_purchases: U256,
    pub total_nft_sales: U256,
    pub gas_fee_usd: f64,
    pub nft_purchase_usd: f64,
    pub nft_sale_usd: f64,
}

impl TransactionStats {
    pub fn zeroed() -> Self {
        Self {
            total_gas_fees: U256::zero(),
            total_nft_purchases: U256::zero(),
            total_nft_sales: U256::zero(),
            gas_fee_usd: 0.0,
            nft_purchase_usd: 0.0,
            nft_sale_usd: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityTotals {
    pub gas_fees: U256,
    pub nft_purchases: U256,
    pub nft_sales: U256,
    pub as_of_block: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceMode {
    Current,
    Historical { timestamp: i64 },
}

impl PriceMode {
    pub fn is_current(&self) -> bool {
        matches!(self, PriceMode::Current)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRow {
    pub label: &'static str,
    pub eth: String,
    pub usd: String,
    pub is_positive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub address: WalletAddress,
    pub mode: PriceMode,
    pub price_usd: f64,
    pub as_of_block: Option<u64>,
    pub stats: TransactionStats,
    pub rows: Vec<StatRow>,
}
