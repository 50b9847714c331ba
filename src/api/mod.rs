use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::parse_flag;
use crate::fetch_stats::{FetchSnapshot, FETCH_STATS};
use crate::format::price_mode_label;
use crate::models::{PriceMode, StatRow, StatsReport, WalletAddress};
use crate::price::PriceSource;
use crate::stats::StatsAggregator;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: StatsAggregator,
    pub price: Arc<dyn PriceSource>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default, deserialize_with = "query_flag")]
    pub current: bool,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    #[serde(default, deserialize_with = "query_flag")]
    pub current: bool,
    pub timestamp: Option<i64>,
}

/// A bare `?current` counts as set.
fn query_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(true);
    }
    parse_flag(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid flag: {}", raw)))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub address: String,
    pub mode: PriceMode,
    pub mode_label: &'static str,
    pub price_usd: f64,
    pub as_of_block: Option<u64>,
    pub total_gas_fees_wei: String,
    pub total_nft_purchases_wei: String,
    pub total_nft_sales_wei: String,
    pub gas_fee_usd: f64,
    pub nft_purchase_usd: f64,
    pub nft_sale_usd: f64,
    pub rows: Vec<StatRow>,
}

impl From<StatsReport> for StatsResponse {
    fn from(report: StatsReport) -> Self {
        let stats = report.stats;
        Self {
            address: report.address.to_string(),
            mode: report.mode,
            mode_label: price_mode_label(report.mode.is_current()),
            price_usd: report.price_usd,
            as_of_block: report.as_of_block,
            total_gas_fees_wei: stats.total_gas_fees.to_string(),
            total_nft_purchases_wei: stats.total_nft_purchases.to_string(),
            total_nft_sales_wei: stats.total_nft_sales.to_string(),
            gas_fee_usd: stats.gas_fee_usd,
            nft_purchase_usd: stats.nft_purchase_usd,
            nft_sale_usd: stats.nft_sale_usd,
            rows: report.rows,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub price_usd: f64,
    pub mode: PriceMode,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn wallet_stats(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Json<StatsResponse> {
    let address = WalletAddress::new(address);
    let report = state
        .aggregator
        .compute_report(&address, query.current)
        .await;
    Json(report.into())
}

async fn price(State(state): State<AppState>, Query(query): Query<PriceQuery>) -> Json<PriceResponse> {
    let mode = if query.current {
        PriceMode::Current
    } else {
        PriceMode::Historical {
            timestamp: query.timestamp.unwrap_or_else(|| Utc::now().timestamp()),
        }
    };
    let price_usd = state.price.price_usd(mode).await;
    Json(PriceResponse { price_usd, mode })
}

async fn fetch_stats() -> Json<FetchSnapshot> {
    Json(FETCH_STATS.snapshot())
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/price", get(price))
        .route("/fetches", get(fetch_stats))
        .route("/stats/:address", get(wallet_stats))
        .with_state(state)
}

pub async fn run_http_server(addr: &str, state: AppState) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
