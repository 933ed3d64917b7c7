use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

const DEFAULT_DEXSCREENER_URL: &str = "https://api.dexscreener.com";
const DEFAULT_JUPITER_PRICE_URL: &str = "https://api.jup.ag/price/v2";
const DEFAULT_SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub dexscreener_url: String,
    pub jupiter_price_url: String,
    pub rpc_url: String,
    pub http_timeout: Duration,
    pub rpc_rate_limit: NonZeroU32,
    pub dex_rate_limit: NonZeroU32,
    /// `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            dexscreener_url: DEFAULT_DEXSCREENER_URL.to_string(),
            jupiter_price_url: DEFAULT_JUPITER_PRICE_URL.to_string(),
            rpc_url: DEFAULT_SOLANA_RPC_URL.to_string(),
            http_timeout: Duration::from_secs(15),
            rpc_rate_limit: nonzero_ext::nonzero!(5u32),
            dex_rate_limit: nonzero_ext::nonzero!(5u32),
            cors_origin: None,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(v) => v
                .parse::<SocketAddr>()
                .with_context(|| format!("BIND_ADDR is not a socket address: {}", v))?,
            None => defaults.bind_addr,
        };

        let rpc_url = match (get("SOLANA_RPC_URL"), get("HELIUS_API_KEY")) {
            (Some(url), _) => url,
            (None, Some(api_key)) => format!("https://rpc.helius.xyz/?api-key={}", api_key),
            (None, None) => defaults.rpc_url,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse::<u64>()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {}", v))?,
            ),
            None => defaults.http_timeout,
        };

        Ok(Self {
            bind_addr,
            dexscreener_url: get("DEXSCREENER_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.dexscreener_url),
            jupiter_price_url: get("JUPITER_PRICE_URL").unwrap_or(defaults.jupiter_price_url),
            rpc_url,
            http_timeout,
            rpc_rate_limit: parse_rate(get("RPC_RATE_LIMIT"), "RPC_RATE_LIMIT", defaults.rpc_rate_limit)?,
            dex_rate_limit: parse_rate(get("DEX_RATE_LIMIT"), "DEX_RATE_LIMIT", defaults.dex_rate_limit)?,
            cors_origin: get("CORS_ORIGIN").filter(|o| o != "*"),
        })
    }
}

fn parse_rate(value: Option<String>, key: &str, default: NonZeroU32) -> Result<NonZeroU32> {
    match value {
        Some(v) => v
            .parse::<NonZeroU32>()
            .with_context(|| format!("{} must be a positive integer, got {}", key, v)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.dexscreener_url, DEFAULT_DEXSCREENER_URL);
        assert_eq!(config.rpc_url, DEFAULT_SOLANA_RPC_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.rpc_rate_limit.get(), 5);
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn helius_key_builds_rpc_url() {
        let config = Config::from_lookup(lookup(&[("HELIUS_API_KEY", "k123")])).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.helius.xyz/?api-key=k123");

        let config = Config::from_lookup(lookup(&[
            ("HELIUS_API_KEY", "k123"),
            ("SOLANA_RPC_URL", "http://localhost:8899"),
        ]))
        .unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8899");
    }

    #[test]
    fn overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DEXSCREENER_URL", "http://localhost:1234/"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("DEX_RATE_LIMIT", "20"),
            ("CORS_ORIGIN", "http://localhost:3000"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.dexscreener_url, "http://localhost:1234");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.dex_rate_limit.get(), 20);
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn wildcard_cors_means_any_origin() {
        let config = Config::from_lookup(lookup(&[("CORS_ORIGIN", "*")])).unwrap();
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "nope")])).is_err());
        assert!(Config::from_lookup(lookup(&[("RPC_RATE_LIMIT", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "soon")])).is_err());
    }
}
