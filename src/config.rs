use std::env;

use url::Url;

pub const DEFAULT_ETH_RPC_URL: &str = "https://mainnet.base.org";
pub const DEFAULT_PRICE_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_PRICE_ASSET_ID: &str = "ethereum";

#[derive(Debug, Clone)]
pub struct Config {
    pub eth_rpc_url: String,
    pub price_api_base_url: Url,
    pub price_asset_id: String,
    pub http_bind_addr: String,
    pub use_chain_activity: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid URL in {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("invalid boolean in {var}: {value}")]
    InvalidBool { var: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let eth_rpc_url =
            lookup("ETH_RPC_URL").unwrap_or_else(|| DEFAULT_ETH_RPC_URL.to_string());
        parse_url("ETH_RPC_URL", &eth_rpc_url)?;

        let price_api_base_url = parse_url(
            "PRICE_API_BASE_URL",
            &lookup("PRICE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PRICE_API_BASE_URL.to_string()),
        )?;
        let price_asset_id = lookup("PRICE_ASSET_ID")
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PRICE_ASSET_ID.to_string());
        let http_bind_addr =
            lookup("HTTP_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let use_chain_activity = match lookup("USE_CHAIN_ACTIVITY") {
            Some(raw) => parse_bool("USE_CHAIN_ACTIVITY", &raw)?,
            None => true,
        };

        Ok(Self {
            eth_rpc_url,
            price_api_base_url,
            price_asset_id,
            http_bind_addr,
            use_chain_activity,
        })
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl {
        var,
        value: raw.to_string(),
    })
}

/// Accepts `1/0`, `true/false`, `yes/no` and `on/off`, case-insensitively.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    parse_flag(raw).ok_or_else(|| ConfigError::InvalidBool {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.eth_rpc_url, DEFAULT_ETH_RPC_URL);
        assert_eq!(config.price_api_base_url.as_str(), "https://api.coingecko.com/api/v3");
        assert_eq!(config.price_asset_id, "ethereum");
        assert_eq!(config.http_bind_addr, "127.0.0.1:8080");
        assert!(config.use_chain_activity);
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("PRICE_API_BASE_URL", "http://127.0.0.1:9000/api/v3"),
            ("PRICE_ASSET_ID", " Ethereum "),
            ("USE_CHAIN_ACTIVITY", "false"),
        ])
        .unwrap();
        assert_eq!(config.price_api_base_url.port(), Some(9000));
        assert_eq!(config.price_asset_id, "ethereum");
        assert!(!config.use_chain_activity);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("ETH_RPC_URL", "not a url")]),
            Err(ConfigError::InvalidUrl { var: "ETH_RPC_URL", .. })
        ));
        assert!(matches!(
            config_from(&[("USE_CHAIN_ACTIVITY", "maybe")]),
            Err(ConfigError::InvalidBool { .. })
        ));
    }
}
