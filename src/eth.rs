use anyhow::{Context, Result};
use ethers_providers::{Http, Middleware, Provider};
use url::Url;

#[derive(Clone)]
pub struct EthClient {
    provider: Provider<Http>,
}

impl EthClient {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .context("failed to build reqwest client")?;
        let url = Url::parse(rpc_url).context("invalid ETH_RPC_URL")?;
        let transport = Http::new_with_client(url, client);
        let provider = Provider::new(transport);
        Ok(Self { provider })
    }

    pub async fn block_number(&self) -> Result<u64> {
        let latest = self
            .provider
            .get_block_number()
            .await
            .context("failed to fetch latest block number")?;
        Ok(latest.as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_rpc_url() {
        assert!(EthClient::new("not a url").is_err());
        assert!(EthClient::new("http://127.0.0.1:8545").is_ok());
    }
}
