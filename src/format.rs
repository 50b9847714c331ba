use ethers_core::types::U256;
use ethers_core::utils::format_ether;

use crate::models::{StatRow, TransactionStats};

/// Converts a wei amount to whole ether as a float.
pub fn wei_to_ether(wei: U256) -> f64 {
    format_ether(wei).parse::<f64>().unwrap_or_default()
}

pub fn format_eth(wei: U256, is_positive: bool) -> String {
    let sign = if is_positive { "+" } else { "" };
    format!("{}{:.4} ETH", sign, wei_to_ether(wei))
}

/// en-US currency style: `$1,234.56`.
pub fn format_usd(amount: f64) -> String {
    if amount.is_nan() {
        return "$NaN".to_string();
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("${}∞", sign);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, frac)
}

pub fn price_mode_label(use_current_price: bool) -> &'static str {
    if use_current_price {
        "In USD now"
    } else {
        "In USD at time"
    }
}

pub fn stat_rows(stats: &TransactionStats) -> Vec<StatRow> {
    vec![
        row("Gas Fees Spent", stats.total_gas_fees, stats.gas_fee_usd, false),
        row(
            "NFT Purchases",
            stats.total_nft_purchases,
            stats.nft_purchase_usd,
            false,
        ),
        row(
            "NFT Sales Earnings",
            stats.total_nft_sales,
            stats.nft_sale_usd,
            true,
        ),
    ]
}

fn row(label: &'static str, wei: U256, usd: f64, is_positive: bool) -> StatRow {
    StatRow {
        label,
        eth: format_eth(wei, is_positive),
        usd: format_usd(usd),
        is_positive,
    }
}
