use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;
use crate::services::launches::DEFAULT_MAX_AGE_SECS;
use crate::services::wallet::validate_address;
use crate::services::{launches, market, trending};
use crate::types::models::{ApiResponse, MarketSnapshot, Timeframe, TokenPair, TrendingData, WalletData};

#[derive(Deserialize)]
pub struct TrendingParams {
    pub timeframe: Option<String>,
}

#[derive(Deserialize)]
pub struct LaunchParams {
    #[serde(rename = "maxAge")]
    pub max_age: Option<String>,
}

#[derive(Deserialize)]
pub struct WalletParams {
    pub address: Option<String>,
}

pub async fn get_trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<ApiResponse<TrendingData>>, ApiError> {
    let timeframe = match params.timeframe.as_deref() {
        None | Some("") => Timeframe::default(),
        Some(raw) => raw.parse::<Timeframe>().map_err(ApiError::Validation)?,
    };

    match trending::trending(&state.dexscreener, timeframe).await {
        Ok(data) => Ok(Json(ApiResponse::ok(data))),
        Err(e) => {
            tracing::error!("Failed to fetch trending pairs: {:#}", e);
            Ok(Json(ApiResponse::degraded(
                TrendingData::default(),
                "Failed to fetch trending pairs",
            )))
        }
    }
}

pub async fn get_launches(
    State(state): State<AppState>,
    Query(params): Query<LaunchParams>,
) -> Result<Json<ApiResponse<Vec<TokenPair>>>, ApiError> {
    let max_age = match params.max_age.as_deref() {
        None | Some("") => DEFAULT_MAX_AGE_SECS,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ApiError::Validation(format!("Invalid maxAge '{}'", raw)))?,
    };

    match launches::launches(&state.dexscreener, max_age).await {
        Ok(pairs) => Ok(Json(ApiResponse::ok(pairs))),
        Err(e) => {
            tracing::error!("Failed to fetch launches: {:#}", e);
            Ok(Json(ApiResponse::degraded(Vec::new(), "Failed to fetch launches")))
        }
    }
}

pub async fn get_market(State(state): State<AppState>) -> Json<ApiResponse<MarketSnapshot>> {
    match market::market(&state.dexscreener, &state.prices).await {
        Ok(snapshot) => Json(ApiResponse::ok(snapshot)),
        Err(e) => {
            tracing::error!("Market data unavailable: {:#}", e);
            Json(ApiResponse::degraded(
                MarketSnapshot::default(),
                "Market data temporarily unavailable",
            ))
        }
    }
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Query(params): Query<WalletParams>,
) -> Result<Json<ApiResponse<Option<WalletData>>>, ApiError> {
    let address = params.address.unwrap_or_default();
    let owner = validate_address(&address)
        .map_err(|e| ApiError::Validation(e.message().to_string()))?;

    match state.wallets.lookup(&owner).await {
        Ok(wallet) => Ok(Json(ApiResponse::ok(Some(wallet)))),
        Err(e) => {
            tracing::error!("Wallet lookup failed: {:#}", e);
            Ok(Json(ApiResponse::degraded(None, "Wallet lookup failed")))
        }
    }
}

pub async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::ok("ok"))
}
