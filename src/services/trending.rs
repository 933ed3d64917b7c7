use anyhow::Result;

use super::aggregate::{
    is_on_chain, merge_unique, rank_movers, sort_by_volume_desc, Direction, Gathered, PairThresholds,
};
use super::dexscreener::{DexScreenerClient, MAX_TOKENS_PER_LOOKUP};
use crate::types::models::{Timeframe, TokenPair, TrendingData, SOLANA_CHAIN_ID};

pub const BROAD_QUERIES: &[&str] = &["meme", "ai", "dog", "cat"];
pub const MOVERS_LIMIT: usize = 20;
pub const ALL_LIMIT: usize = 40;

const BROAD_THRESHOLDS: PairThresholds = PairThresholds {
    min_liquidity_usd: 1_000.0,
    min_volume_h24: 1_000.0,
};
const BOOSTED_MIN_LIQUIDITY_USD: f64 = 500.0;

/// Gainers, losers and the merged pool for `timeframe`, built from boosted tokens
/// and a broad keyword search.
pub async fn trending(dex: &DexScreenerClient, timeframe: Timeframe) -> Result<TrendingData> {
    let (boosted, broad) = futures::join!(boosted_pairs(dex), broad_pairs(dex));

    let mut sources = broad;
    let broad_pairs = std::mem::take(&mut sources.items);
    sources.attempted += boosted.attempted;
    sources.failed += boosted.failed;

    if sources.all_failed() {
        return Err(anyhow::anyhow!(
            "all {} trending sources failed",
            sources.attempted
        ));
    }

    let all = merge_unique(boosted.items.into_iter().chain(broad_pairs));
    tracing::info!(
        "Trending {}: {} unique pairs ({} of {} sources failed)",
        timeframe,
        all.len(),
        sources.failed,
        sources.attempted
    );

    Ok(build_trending(all, timeframe))
}

pub fn build_trending(mut all: Vec<TokenPair>, timeframe: Timeframe) -> TrendingData {
    let gainers = rank_movers(&all, timeframe, Direction::Gainers, MOVERS_LIMIT);
    let losers = rank_movers(&all, timeframe, Direction::Losers, MOVERS_LIMIT);
    all.truncate(ALL_LIMIT);
    TrendingData { gainers, losers, all }
}

/// Pairs of the top boosted Solana tokens, highest volume first.
async fn boosted_pairs(dex: &DexScreenerClient) -> Gathered<TokenPair> {
    let mut gathered = Gathered::default();

    let boosts = dex.top_boosted_tokens().await;
    let addresses: Vec<String> = match &boosts {
        Ok(boosts) => {
            let mut addresses: Vec<String> = Vec::new();
            for boost in boosts.iter().filter(|b| b.chain_id == SOLANA_CHAIN_ID) {
                if !addresses.contains(&boost.token_address) {
                    addresses.push(boost.token_address.clone());
                }
            }
            addresses.truncate(MAX_TOKENS_PER_LOOKUP);
            addresses
        }
        Err(_) => Vec::new(),
    };
    gathered.record(boosts.map(|_| Vec::new()), "DexScreener boosts");

    if addresses.is_empty() {
        return gathered;
    }

    let lookup = dex.pairs_for_tokens(&addresses).await.map(|pairs| {
        let mut pairs: Vec<TokenPair> = pairs
            .into_iter()
            .filter(|p| {
                is_on_chain(p, SOLANA_CHAIN_ID)
                    && PairThresholds::liquidity(BOOSTED_MIN_LIQUIDITY_USD).passes(p)
            })
            .collect();
        sort_by_volume_desc(&mut pairs);
        pairs
    });
    gathered.record(lookup, "DexScreener token lookup");
    gathered
}

/// Liquid Solana pairs from generic keyword searches, deduplicated.
async fn broad_pairs(dex: &DexScreenerClient) -> Gathered<TokenPair> {
    let mut gathered = dex.search_many(BROAD_QUERIES).await;
    let found = std::mem::take(&mut gathered.items);
    gathered.items = merge_unique(
        found
            .into_iter()
            .filter(|p| is_on_chain(p, SOLANA_CHAIN_ID) && BROAD_THRESHOLDS.passes(p)),
    );
    gathered
}
