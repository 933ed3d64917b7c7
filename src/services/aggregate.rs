use std::collections::HashSet;

use crate::types::models::{Timeframe, TokenPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Gainers,
    Losers,
}

/// Minimum liquidity and 24h volume, both exclusive. Missing values count as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairThresholds {
    pub min_liquidity_usd: f64,
    pub min_volume_h24: f64,
}

impl PairThresholds {
    pub fn liquidity(min_liquidity_usd: f64) -> Self {
        Self {
            min_liquidity_usd,
            min_volume_h24: f64::NEG_INFINITY,
        }
    }

    pub fn passes(&self, pair: &TokenPair) -> bool {
        pair.liquidity_usd() > self.min_liquidity_usd && pair.volume_h24() > self.min_volume_h24
    }
}

pub fn is_on_chain(pair: &TokenPair, chain: &str) -> bool {
    pair.chain_id == chain
}

/// Keeps the first occurrence of every pair address, preserving order.
pub fn merge_unique<I>(pairs: I) -> Vec<TokenPair>
where
    I: IntoIterator<Item = TokenPair>,
{
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|p| seen.insert(p.pair_address.clone()))
        .collect()
}

pub fn sort_by_volume_desc(pairs: &mut [TokenPair]) {
    pairs.sort_by(|a, b| b.volume_h24().total_cmp(&a.volume_h24()));
}

/// Pairs moving in `direction` over `timeframe`, strongest first.
///
/// Gainers need a strictly positive change and come out non-increasing;
/// losers need a strictly negative change and come out non-decreasing.
pub fn rank_movers(
    pairs: &[TokenPair],
    timeframe: Timeframe,
    direction: Direction,
    limit: usize,
) -> Vec<TokenPair> {
    let mut movers: Vec<TokenPair> = pairs
        .iter()
        .filter(|p| match direction {
            Direction::Gainers => p.change(timeframe) > 0.0,
            Direction::Losers => p.change(timeframe) < 0.0,
        })
        .cloned()
        .collect();

    match direction {
        Direction::Gainers => {
            movers.sort_by(|a, b| b.change(timeframe).total_cmp(&a.change(timeframe)))
        }
        Direction::Losers => {
            movers.sort_by(|a, b| a.change(timeframe).total_cmp(&b.change(timeframe)))
        }
    }
    movers.truncate(limit);
    movers
}

/// Pairs created within `max_age_secs` of `now_ms`, newest first.
pub fn recent_launches<I>(pairs: I, now_ms: i64, max_age_secs: u64, limit: usize) -> Vec<TokenPair>
where
    I: IntoIterator<Item = TokenPair>,
{
    let max_age_ms = i64::try_from(max_age_secs.saturating_mul(1000)).unwrap_or(i64::MAX);

    let fresh = pairs.into_iter().filter(|p| match p.pair_created_at {
        Some(created) => now_ms.saturating_sub(created) <= max_age_ms,
        None => false,
    });

    let mut launches = merge_unique(fresh);
    launches.sort_by(|a, b| b.pair_created_at.cmp(&a.pair_created_at));
    launches.truncate(limit);
    launches
}

/// Outcome of a fan-out over several independent upstream sources.
#[derive(Debug)]
pub struct Gathered<T> {
    pub items: Vec<T>,
    pub attempted: usize,
    pub failed: usize,
}

impl<T> Default for Gathered<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            attempted: 0,
            failed: 0,
        }
    }
}

impl<T> Gathered<T> {
    /// Collects per-source results; failures are logged and contribute nothing.
    pub fn from_results<I>(results: I, label: &str) -> Self
    where
        I: IntoIterator<Item = anyhow::Result<Vec<T>>>,
    {
        let mut gathered = Self::default();
        for result in results {
            gathered.record(result, label);
        }
        gathered
    }

    pub fn record(&mut self, result: anyhow::Result<Vec<T>>, label: &str) {
        self.attempted += 1;
        match result {
            Ok(items) => self.items.extend(items),
            Err(e) => {
                self.failed += 1;
                tracing::warn!("{} source failed: {:#}", label, e);
            }
        }
    }

    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}
