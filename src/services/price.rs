use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;

use super::dexscreener::DexScreenerClient;
use crate::types::models::{TokenPair, SOLANA_CHAIN_ID, SOL_MINT};

/// SOL/USD with Jupiter as the primary source and DexScreener as the fallback.
#[derive(Clone)]
pub struct PriceFeed {
    http: Client,
    jupiter_url: String,
    dexscreener: DexScreenerClient,
}

impl PriceFeed {
    pub fn new(http: Client, jupiter_url: impl Into<String>, dexscreener: DexScreenerClient) -> Self {
        Self {
            http,
            jupiter_url: jupiter_url.into(),
            dexscreener,
        }
    }

    pub async fn jupiter_price(&self, mint_address: &str) -> Result<f64> {
        let response = self
            .http
            .get(&self.jupiter_url)
            .query(&[("ids", mint_address)])
            .header("Accept", "application/json")
            .send()
            .await
            .context("Jupiter price request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Jupiter API error: {}", response.status()));
        }

        let json: Value = response.json().await?;
        tracing::debug!("Jupiter API response: {:?}", json);
        parse_jupiter_price(&json, mint_address)
    }

    pub async fn sol_usd(&self) -> Result<f64> {
        match self.jupiter_price(SOL_MINT).await {
            Ok(price) if price > 0.0 => Ok(price),
            Ok(_) => {
                tracing::warn!("Jupiter returned a zero SOL price, falling back to DexScreener");
                self.dexscreener_sol_usd().await
            }
            Err(jupiter_error) => {
                tracing::warn!("Jupiter SOL price failed: {:#}, falling back to DexScreener", jupiter_error);
                self.dexscreener_sol_usd().await.map_err(|dex_error| {
                    anyhow::anyhow!(
                        "Both Jupiter and DexScreener failed. Jupiter: {:#}, DexScreener: {:#}",
                        jupiter_error,
                        dex_error
                    )
                })
            }
        }
    }

    async fn dexscreener_sol_usd(&self) -> Result<f64> {
        let pairs = self.dexscreener.search_pairs("SOL/USDC").await?;
        sol_usdc_price(&pairs).ok_or_else(|| anyhow::anyhow!("No SOL/USDC pair on DexScreener"))
    }
}

/// Jupiter v2 reports `data.<mint>.price` as a string; accept a number too.
fn parse_jupiter_price(json: &Value, mint_address: &str) -> Result<f64> {
    let price = &json["data"][mint_address]["price"];
    match price {
        Value::String(s) => s
            .parse::<f64>()
            .with_context(|| format!("Failed to parse price '{}'", s)),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| anyhow::anyhow!("Failed to parse price")),
        _ => Err(anyhow::anyhow!("Failed to parse price")),
    }
}

pub fn sol_usdc_price(pairs: &[TokenPair]) -> Option<f64> {
    pairs
        .iter()
        .find(|p| {
            p.chain_id == SOLANA_CHAIN_ID
                && p.base_token.symbol == "SOL"
                && p.quote_token.symbol == "USDC"
        })
        .and_then(TokenPair::price_usd_value)
}
