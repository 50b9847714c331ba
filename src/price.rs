use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::fetch_stats::FETCH_STATS;
use crate::models::PriceMode;

const VS_CURRENCY: &str = "usd";

/// Fiat price for the native asset. Implementations report failures as `0.0`.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn price_usd(&self, mode: PriceMode) -> f64;
}

#[derive(thiserror::Error, Debug)]
pub enum PriceError {
    #[error("price request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid price URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    #[error("price response missing {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    market_data: Option<MarketData>,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    current_price: Option<UsdQuote>,
}

/// Only the `usd` entry is read; other currencies may be null or absent.
#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: Option<f64>,
}

/// Price oracle backed by the CoinGecko public API.
#[derive(Debug, Clone)]
pub struct CoingeckoOracle {
    client: Client,
    base: Url,
    asset_id: String,
}

impl CoingeckoOracle {
    pub fn new(base: Url, asset_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base,
            asset_id: asset_id.into(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, PriceError> {
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    pub fn current_price_url(&self) -> Result<Url, PriceError> {
        let mut url = self.endpoint("simple/price")?;
        url.query_pairs_mut()
            .append_pair("ids", &self.asset_id)
            .append_pair("vs_currencies", VS_CURRENCY);
        Ok(url)
    }

    pub fn history_url(&self, timestamp: i64) -> Result<Url, PriceError> {
        let date = history_date(timestamp)?;
        let mut url = self.endpoint(&format!("coins/{}/history", self.asset_id))?;
        url.query_pairs_mut().append_pair("date", &date);
        Ok(url)
    }

    pub async fn try_price_usd(&self, mode: PriceMode) -> Result<f64, PriceError> {
        match mode {
            PriceMode::Current => {
                let url = self.current_price_url()?;
                let body: HashMap<String, UsdQuote> = self
                    .client
                    .get(url)
                    .header("accept", "application/json")
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                body.get(&self.asset_id)
                    .and_then(|quote| quote.usd)
                    .ok_or(PriceError::MissingField("<asset>.usd"))
            }
            PriceMode::Historical { timestamp } => {
                let url = self.history_url(timestamp)?;
                let body: HistoryResponse = self
                    .client
                    .get(url)
                    .header("accept", "application/json")
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                body.market_data
                    .and_then(|m| m.current_price)
                    .and_then(|quote| quote.usd)
                    .ok_or(PriceError::MissingField("market_data.current_price.usd"))
            }
        }
    }
}

#[async_trait]
impl PriceSource for CoingeckoOracle {
    async fn price_usd(&self, mode: PriceMode) -> f64 {
        FETCH_STATS.inc_price_requests();
        match self.try_price_usd(mode).await {
            Ok(price) => price,
            Err(err) => {
                FETCH_STATS.inc_price_failures();
                tracing::warn!("failed to fetch {} price ({:?}): {}", self.asset_id, mode, err);
                0.0
            }
        }
    }
}

/// `DD/MM/YYYY` calendar date (UTC) of a unix timestamp in seconds.
pub fn history_date(timestamp: i64) -> Result<String, PriceError> {
    let at = DateTime::from_timestamp(timestamp, 0).ok_or(PriceError::InvalidTimestamp(timestamp))?;
    Ok(at.format("%d/%m/%Y").to_string())
}
