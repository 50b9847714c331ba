use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::activity::ActivitySource;
use crate::fetch_stats::FETCH_STATS;
use crate::format::{stat_rows, wei_to_ether};
use crate::models::{PriceMode, StatsReport, TransactionStats, WalletAddress};
use crate::price::PriceSource;

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Combines wallet activity totals with a single price lookup.
#[derive(Clone)]
pub struct StatsAggregator {
    activity: Arc<dyn ActivitySource>,
    price: Arc<dyn PriceSource>,
    clock: Clock,
}

impl StatsAggregator {
    pub fn new(activity: Arc<dyn ActivitySource>, price: Arc<dyn PriceSource>) -> Self {
        Self {
            activity,
            price,
            clock: Arc::new(|| Utc::now().timestamp()),
        }
    }

    /// Replaces the source of "now" (unix seconds) used for historical pricing.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn price_mode(&self, use_current_price: bool) -> PriceMode {
        if use_current_price {
            PriceMode::Current
        } else {
            PriceMode::Historical {
                timestamp: (self.clock)(),
            }
        }
    }

    pub async fn compute_stats(
        &self,
        address: &WalletAddress,
        use_current_price: bool,
    ) -> TransactionStats {
        self.compute_report(address, use_current_price).await.stats
    }

    /// Never fails: any error yields an all-zero report.
    pub async fn compute_report(
        &self,
        address: &WalletAddress,
        use_current_price: bool,
    ) -> StatsReport {
        FETCH_STATS.inc_stats_computations();
        let mode = self.price_mode(use_current_price);

        match self.try_compute(address, mode).await {
            Ok(report) => report,
            Err(err) => {
                FETCH_STATS.inc_stats_failures();
                tracing::error!("failed to calculate stats for {}: {:#}", address, err);
                let stats = TransactionStats::zeroed();
                StatsReport {
                    address: address.clone(),
                    mode,
                    price_usd: 0.0,
                    as_of_block: None,
                    rows: stat_rows(&stats),
                    stats,
                }
            }
        }
    }

    async fn try_compute(&self, address: &WalletAddress, mode: PriceMode) -> Result<StatsReport> {
        let totals = self.activity.totals(address).await?;
        let price = self.price.price_usd(mode).await;

        let stats = TransactionStats {
            total_gas_fees: totals.gas_fees,
            total_nft_purchases: totals.nft_purchases,
            total_nft_sales: totals.nft_sales,
            gas_fee_usd: wei_to_ether(totals.gas_fees) * price,
            nft_purchase_usd: wei_to_ether(totals.nft_purchases) * price,
            nft_sale_usd: wei_to_ether(totals.nft_sales) * price,
        };

        Ok(StatsReport {
            address: address.clone(),
            mode,
            price_usd: price,
            as_of_block: totals.as_of_block,
            rows: stat_rows(&stats),
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::FixedActivity;
    use crate::models::ActivityTotals;
    use async_trait::async_trait;
    use ethers_core::types::U256;
    use std::sync::Mutex;

    /// Records every requested mode and answers with a fixed price.
    struct FakePrice {
        price: f64,
        calls: Mutex<Vec<PriceMode>>,
    }

    impl FakePrice {
        fn new(price: f64) -> Arc<Self> {
            Arc::new(Self {
                price,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<PriceMode> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceSource for FakePrice {
        async fn price_usd(&self, mode: PriceMode) -> f64 {
            self.calls.lock().unwrap().push(mode);
            self.price
        }
    }

    struct BrokenActivity;

    #[async_trait]
    impl ActivitySource for BrokenActivity {
        async fn totals(&self, _address: &WalletAddress) -> Result<ActivityTotals> {
            anyhow::bail!("indexer offline")
        }
    }

    fn addr() -> WalletAddress {
        WalletAddress::new("0x00000000000000000000000000000000000000aa")
    }

    #[tokio::test]
    async fn fiat_is_whole_units_times_price() {
        let price = FakePrice::new(2_500.25);
        let agg = StatsAggregator::new(Arc::new(FixedActivity), price.clone());

        let stats = agg.compute_stats(&addr(), true).await;
        assert_eq!(stats.total_gas_fees, U256::from(1_000_000_000_000_000u64));
        assert_eq!(stats.gas_fee_usd, 0.001 * 2_500.25);
        assert_eq!(stats.nft_purchase_usd, 0.05 * 2_500.25);
        assert_eq!(stats.nft_sale_usd, 0.1 * 2_500.25);
    }

    #[tokio::test]
    async fn zero_price_keeps_native_amounts() {
        let agg = StatsAggregator::new(Arc::new(FixedActivity), FakePrice::new(0.0));

        let stats = agg.compute_stats(&addr(), false).await;
        assert_eq!(stats.total_gas_fees, U256::from(1_000_000_000_000_000u64));
        assert_eq!(stats.total_nft_purchases, U256::from(50_000_000_000_000_000u64));
        assert_eq!(stats.total_nft_sales, U256::from(100_000_000_000_000_000u64));
        assert_eq!(stats.gas_fee_usd, 0.0);
        assert_eq!(stats.nft_purchase_usd, 0.0);
        assert_eq!(stats.nft_sale_usd, 0.0);
    }

    #[tokio::test]
    async fn activity_failure_zeroes_everything() {
        let price = FakePrice::new(3_000.0);
        let agg = StatsAggregator::new(Arc::new(BrokenActivity), price.clone());

        let report = agg.compute_report(&addr(), true).await;
        assert_eq!(report.stats, TransactionStats::zeroed());
        assert_eq!(report.price_usd, 0.0);
        assert_eq!(report.as_of_block, None);
        assert_eq!(report.rows[0].eth, "0.0000 ETH");
        assert_eq!(report.rows[2].usd, "$0.00");
    }

    #[tokio::test]
    async fn each_call_fetches_one_price_for_its_mode() {
        let price = FakePrice::new(1_000.0);
        let agg = StatsAggregator::new(Arc::new(FixedActivity), price.clone())
            .with_clock(|| 1_700_000_000);

        agg.compute_stats(&addr(), false).await;
        agg.compute_stats(&addr(), true).await;

        assert_eq!(
            price.calls(),
            vec![
                PriceMode::Historical {
                    timestamp: 1_700_000_000
                },
                PriceMode::Current,
            ]
        );
    }

    #[tokio::test]
    async fn identical_inputs_give_identical_results() {
        let agg = StatsAggregator::new(Arc::new(FixedActivity), FakePrice::new(1_234.5678))
            .with_clock(|| 1_700_000_000);

        let first = agg.compute_report(&addr(), false).await;
        let second = agg.compute_report(&addr(), false).await;
        assert_eq!(first.stats, second.stats);
        assert_eq!(first.stats.nft_sale_usd.to_bits(), second.stats.nft_sale_usd.to_bits());
        assert_eq!(first.rows, second.rows);
    }
}
