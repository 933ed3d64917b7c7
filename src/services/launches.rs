use anyhow::Result;

use super::aggregate::{is_on_chain, recent_launches};
use super::dexscreener::DexScreenerClient;
use crate::types::models::{TokenPair, SOLANA_CHAIN_ID};

pub const LAUNCH_QUERIES: &[&str] = &["pump", "sol", "meme", "ai", "based"];
pub const DEFAULT_MAX_AGE_SECS: u64 = 86_400;
pub const LAUNCHES_LIMIT: usize = 50;

/// Solana pairs created within `max_age_secs`, newest first.
pub async fn launches(dex: &DexScreenerClient, max_age_secs: u64) -> Result<Vec<TokenPair>> {
    let gathered = dex.search_many(LAUNCH_QUERIES).await;
    if gathered.all_failed() {
        return Err(anyhow::anyhow!("all {} launch searches failed", gathered.attempted));
    }

    let now_ms = chrono::Utc::now().timestamp_millis();
    let launches = recent_launches(
        gathered
            .items
            .into_iter()
            .filter(|p| is_on_chain(p, SOLANA_CHAIN_ID)),
        now_ms,
        max_age_secs,
        LAUNCHES_LIMIT,
    );

    tracing::info!(
        "Found {} launches younger than {}s ({} of {} searches failed)",
        launches.len(),
        max_age_secs,
        gathered.failed,
        gathered.attempted
    );
    Ok(launches)
}
