use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers_core::types::U256;

use crate::eth::EthClient;
use crate::models::{ActivityTotals, WalletAddress};

pub const STUB_GAS_FEES_WEI: u64 = 1_000_000_000_000_000;
pub const STUB_NFT_PURCHASES_WEI: u64 = 50_000_000_000_000_000;
pub const STUB_NFT_SALES_WEI: u64 = 100_000_000_000_000_000;

/// Source of per-wallet spending totals, denominated in wei.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn totals(&self, address: &WalletAddress) -> Result<ActivityTotals>;
}

/// Fixed totals standing in for a transaction-history indexer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedActivity;

impl FixedActivity {
    pub fn stub_totals() -> ActivityTotals {
        ActivityTotals {
            gas_fees: U256::from(STUB_GAS_FEES_WEI),
            nft_purchases: U256::from(STUB_NFT_PURCHASES_WEI),
            nft_sales: U256::from(STUB_NFT_SALES_WEI),
            as_of_block: None,
        }
    }
}

#[async_trait]
impl ActivitySource for FixedActivity {
    async fn totals(&self, _address: &WalletAddress) -> Result<ActivityTotals> {
        Ok(Self::stub_totals())
    }
}

/// Reads the chain head and stamps the stub totals with it.
#[derive(Clone)]
pub struct ChainActivity {
    client: EthClient,
}

impl ChainActivity {
    pub fn new(client: EthClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActivitySource for ChainActivity {
    async fn totals(&self, address: &WalletAddress) -> Result<ActivityTotals> {
        let block = self
            .client
            .block_number()
            .await
            .with_context(|| format!("failed to read chain head for {}", address))?;
        tracing::debug!("activity for {} as of block {}", address, block);

        // TODO: replace the stub totals with an indexer query bounded by `block`.
        Ok(ActivityTotals {
            as_of_block: Some(block),
            ..FixedActivity::stub_totals()
        })
    }
}
