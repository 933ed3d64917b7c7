use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{get_launches, get_market, get_trending, get_wallet, health};
use super::state::AppState;

pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/trending", get(get_trending))
        .route("/api/launches", get(get_launches))
        .route("/api/market", get(get_market))
        .route("/api/wallet", get(get_wallet))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Read-only API: GET from the configured origin, or from anywhere when unset.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    match origin {
        Some(origin) => {
            let value = HeaderValue::from_str(origin)
                .with_context(|| format!("CORS_ORIGIN is not a valid header value: {}", origin))?;
            Ok(layer.allow_origin(value))
        }
        None => Ok(layer.allow_origin(Any)),
    }
}
