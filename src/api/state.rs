use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client as ReqwestClient;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;

use crate::config::Config;
use crate::services::dexscreener::DexScreenerClient;
use crate::services::per_second_limiter;
use crate::services::price::PriceFeed;
use crate::services::wallet::WalletService;

/// Upstream clients shared by every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub dexscreener: DexScreenerClient,
    pub prices: PriceFeed,
    pub wallets: WalletService,
    pub rpc_client: Arc<RpcClient>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let dexscreener = DexScreenerClient::new(
            http.clone(),
            config.dexscreener_url.clone(),
            per_second_limiter(config.dex_rate_limit),
        );
        let prices = PriceFeed::new(http, config.jupiter_price_url.clone(), dexscreener.clone());

        let rpc_client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            config.http_timeout,
            CommitmentConfig::confirmed(),
        ));
        let wallets = WalletService::new(
            rpc_client.clone(),
            per_second_limiter(config.rpc_rate_limit),
            prices.clone(),
        );

        Ok(Self {
            dexscreener,
            prices,
            wallets,
            rpc_client,
        })
    }
}
