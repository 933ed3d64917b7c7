use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::aggregate::Gathered;
use super::Limiter;
use crate::types::models::{TokenBoost, TokenPair};

/// DexScreener accepts up to 30 comma-separated token addresses; stay under it.
pub const MAX_TOKENS_PER_LOOKUP: usize = 20;

#[derive(Debug, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pairs: Option<Vec<Value>>,
}

#[derive(Clone)]
pub struct DexScreenerClient {
    http: Client,
    base_url: String,
    rate_limiter: Arc<Limiter>,
}

impl DexScreenerClient {
    pub fn new(http: Client, base_url: impl Into<String>, rate_limiter: Arc<Limiter>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            rate_limiter,
        }
    }

    pub async fn search_pairs(&self, query: &str) -> Result<Vec<TokenPair>> {
        let url = format!("{}/latest/dex/search", self.base_url);
        let body = self.get_json(self.http.get(&url).query(&[("q", query)]), &url).await?;
        let pairs = parse_pairs(body).with_context(|| format!("search '{}'", query))?;
        tracing::debug!("DexScreener search '{}' returned {} pairs", query, pairs.len());
        Ok(pairs)
    }

    pub async fn top_boosted_tokens(&self) -> Result<Vec<TokenBoost>> {
        let url = format!("{}/token-boosts/top/v1", self.base_url);
        let body = self.get_json(self.http.get(&url), &url).await?;

        // The endpoint answers with a bare array; anything else means no boosts.
        let boosts = match body {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<TokenBoost>(item).ok())
                .collect(),
            _ => Vec::new(),
        };
        Ok(boosts)
    }

    pub async fn pairs_for_tokens(&self, addresses: &[String]) -> Result<Vec<TokenPair>> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }
        let joined = addresses
            .iter()
            .take(MAX_TOKENS_PER_LOOKUP)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/latest/dex/tokens/{}", self.base_url, joined);
        let body = self.get_json(self.http.get(&url), &url).await?;
        parse_pairs(body)
    }

    /// Runs one search per query concurrently. Failed searches are counted, not propagated.
    pub async fn search_many(&self, queries: &[&str]) -> Gathered<TokenPair> {
        let searches = queries.iter().map(|q| self.search_pairs(q));
        let results = join_all(searches).await;
        Gathered::from_results(results, "DexScreener search")
    }

    async fn get_json(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("DexScreener API error: {} ({})", response.status(), url));
        }

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("invalid JSON from {}", url))?;
        Ok(body)
    }
}

/// Decodes the `pairs` array, skipping entries that do not look like a pair.
fn parse_pairs(body: Value) -> Result<Vec<TokenPair>> {
    let response: PairsResponse =
        serde_json::from_value(body).context("unexpected DexScreener response shape")?;

    let raw = response.pairs.unwrap_or_default();
    let total = raw.len();
    let pairs: Vec<TokenPair> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<TokenPair>(value) {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::debug!("Skipping malformed pair: {}", e);
                None
            }
        })
        .collect();

    if pairs.len() < total {
        tracing::debug!("Kept {} of {} pairs", pairs.len(), total);
    }
    Ok(pairs)
}
