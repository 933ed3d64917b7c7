use anyhow::Result;

use super::aggregate::is_on_chain;
use super::dexscreener::DexScreenerClient;
use super::price::PriceFeed;
use crate::types::models::{MarketSnapshot, TokenPair, SOLANA_CHAIN_ID, SOL_MINT};

pub const TOP_PAIRS_LIMIT: usize = 10;
const MARKET_QUERY: &str = "WSOL";

pub async fn market(dex: &DexScreenerClient, prices: &PriceFeed) -> Result<MarketSnapshot> {
    let (jupiter, search) = futures::join!(prices.jupiter_price(SOL_MINT), dex.search_pairs(MARKET_QUERY));

    if let (Err(price_error), Err(search_error)) = (&jupiter, &search) {
        return Err(anyhow::anyhow!(
            "price: {:#}; search: {:#}",
            price_error,
            search_error
        ));
    }

    let jupiter_price = jupiter.unwrap_or_else(|e| {
        tracing::warn!("Jupiter SOL price failed: {:#}", e);
        0.0
    });
    let pairs = search.unwrap_or_else(|e| {
        tracing::warn!("DexScreener market search failed: {:#}", e);
        Vec::new()
    });

    Ok(build_snapshot(jupiter_price, pairs))
}

/// Top Solana pairs plus the SOL quote. A SOL-based pair supplies the 24h change,
/// and the price too when the oracle had none. Pairs quoted in SOL are skipped:
/// their price and change describe the other token.
pub fn build_snapshot(oracle_price: f64, pairs: Vec<TokenPair>) -> MarketSnapshot {
    let top_pairs: Vec<TokenPair> = pairs
        .into_iter()
        .filter(|p| is_on_chain(p, SOLANA_CHAIN_ID))
        .take(TOP_PAIRS_LIMIT)
        .collect();

    let sol_pair = top_pairs
        .iter()
        .find(|p| p.base_token.symbol == "SOL" || p.base_token.address == SOL_MINT);

    let mut sol_price = oracle_price;
    let mut sol_change_24h = 0.0;
    if let Some(pair) = sol_pair {
        if sol_price == 0.0 {
            sol_price = pair.price_usd_value().unwrap_or(0.0);
        }
        sol_change_24h = pair.price_change.h24.unwrap_or(0.0);
    }

    MarketSnapshot {
        sol_price,
        sol_change_24h,
        top_pairs,
    }
}
