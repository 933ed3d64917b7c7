use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SOLANA_CHAIN_ID: &str = "solana";
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TokenRef {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PriceChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h6: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h24: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d7: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Volume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h6: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Liquidity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<f64>,
}

/// A trading pair as DexScreener reports it. The field names on the wire are
/// passed through unchanged so the dashboard can consume the upstream shape.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub pair_address: String,
    #[serde(default)]
    pub base_token: TokenRef,
    #[serde(default)]
    pub quote_token: TokenRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_native: Option<String>,
    #[serde(default)]
    pub price_change: PriceChange,
    #[serde(default)]
    pub volume: Volume,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<Liquidity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_created_at: Option<i64>,
    #[serde(default)]
    pub dex_id: String,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TokenPair {
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity
            .as_ref()
            .and_then(|l| l.usd)
            .unwrap_or(0.0)
    }

    pub fn volume_h24(&self) -> f64 {
        self.volume.h24.unwrap_or(0.0)
    }

    /// Percent change over the given window, 0 when upstream omitted it.
    pub fn change(&self, timeframe: Timeframe) -> f64 {
        let value = match timeframe {
            Timeframe::H1 => self.price_change.h1,
            Timeframe::H6 => self.price_change.h6,
            Timeframe::H24 => self.price_change.h24,
            Timeframe::D7 => self.price_change.d7,
        };
        value.unwrap_or(0.0)
    }

    pub fn price_usd_value(&self) -> Option<f64> {
        self.price_usd.as_deref()?.parse::<f64>().ok()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBoost {
    #[serde(default)]
    pub chain_id: String,
    pub token_address: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    H1,
    H6,
    #[default]
    H24,
    D7,
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h1" => Ok(Timeframe::H1),
            "h6" => Ok(Timeframe::H6),
            "h24" => Ok(Timeframe::H24),
            "d7" => Ok(Timeframe::D7),
            other => Err(format!(
                "Invalid timeframe '{}', expected one of h1, h6, h24, d7",
                other
            )),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::H1 => "h1",
            Timeframe::H6 => "h6",
            Timeframe::H24 => "h24",
            Timeframe::D7 => "d7",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendingData {
    pub gainers: Vec<TokenPair>,
    pub losers: Vec<TokenPair>,
    pub all: Vec<TokenPair>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub sol_price: f64,
    #[serde(rename = "solChange24h")]
    pub sol_change_24h: f64,
    pub top_pairs: Vec<TokenPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletToken {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    pub amount: f64,
    pub decimals: u8,
    pub usd_value: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Failed,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletTransaction {
    pub signature: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub timestamp: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
    pub address: String,
    pub sol_balance: f64,
    pub sol_usd_value: f64,
    pub tokens: Vec<WalletToken>,
    pub transactions: Vec<WalletTransaction>,
}

/// Envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            error: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn degraded(data: T, error: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
