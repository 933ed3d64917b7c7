#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use solpulse::api::routes::{cors_layer, create_router};
use solpulse::api::state::AppState;
use solpulse::config::Config;

/// Nothing listens here; requests fail with connection refused.
pub const DEAD_UPSTREAM: &str = "http://127.0.0.1:1";

#[derive(Clone, Default)]
pub struct Fixtures {
    /// DexScreener search responses keyed by query.
    pub searches: HashMap<String, Value>,
    pub boosts: Value,
    pub token_pairs: Value,
    pub jupiter: Value,
    /// JSON-RPC results keyed by method.
    pub rpc: HashMap<String, Value>,
    /// DexScreener sources answering 500: `search:<query>`, `tokens`, `boosts`.
    pub failing: HashSet<String>,
}

impl Fixtures {
    pub fn failing(mut self, sources: &[&str]) -> Self {
        self.failing.extend(sources.iter().map(|s| s.to_string()));
        self
    }
}

fn server_error() -> (StatusCode, Json<Value>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "upstream exploded" })))
}

#[derive(Clone)]
struct Upstream {
    fixtures: Arc<Fixtures>,
    hits: Arc<AtomicUsize>,
}

pub struct FakeUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl FakeUpstream {
    pub async fn spawn(fixtures: Fixtures) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let upstream = Upstream {
            fixtures: Arc::new(fixtures),
            hits: hits.clone(),
        };

        let router = Router::new()
            .route("/latest/dex/search", get(search))
            .route("/latest/dex/tokens/:addresses", get(tokens))
            .route("/token-boosts/top/v1", get(boosts))
            .route("/jupiter", get(jupiter))
            .route("/rpc", post(rpc))
            .with_state(upstream);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, hits }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> Config {
        Config {
            dexscreener_url: self.base_url(),
            jupiter_price_url: format!("{}/jupiter", self.base_url()),
            rpc_url: format!("{}/rpc", self.base_url()),
            ..test_config()
        }
    }
}

pub fn test_config() -> Config {
    Config {
        dexscreener_url: DEAD_UPSTREAM.to_string(),
        jupiter_price_url: format!("{}/jupiter", DEAD_UPSTREAM),
        rpc_url: format!("{}/rpc", DEAD_UPSTREAM),
        http_timeout: Duration::from_secs(5),
        rpc_rate_limit: nonzero_ext::nonzero!(1000u32),
        dex_rate_limit: nonzero_ext::nonzero!(1000u32),
        ..Config::default()
    }
}

pub fn app(config: &Config) -> Router {
    let state = AppState::from_config(config).unwrap();
    create_router(state, cors_layer(None).unwrap())
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub fn pair(address: &str, h24: f64, liquidity: f64, volume: f64) -> Value {
    json!({
        "chainId": "solana",
        "dexId": "raydium",
        "url": format!("https://dexscreener.com/solana/{}", address),
        "pairAddress": address,
        "baseToken": { "address": format!("{}-mint", address), "name": address, "symbol": address.to_uppercase() },
        "quoteToken": { "address": "So11111111111111111111111111111111111111112", "name": "Wrapped SOL", "symbol": "SOL" },
        "priceNative": "0.0001",
        "priceUsd": "0.02",
        "priceChange": { "m5": 0.0, "h1": h24 / 4.0, "h6": h24 / 2.0, "h24": h24 },
        "volume": { "m5": 1.0, "h1": 10.0, "h6": 100.0, "h24": volume },
        "liquidity": { "usd": liquidity, "base": 1.0, "quote": 1.0 },
        "fdv": 1000000.0,
        "marketCap": 900000.0
    })
}

pub fn with_chain(mut pair: Value, chain: &str) -> Value {
    pair["chainId"] = json!(chain);
    pair
}

pub fn created_at(mut pair: Value, ms: i64) -> Value {
    pair["pairCreatedAt"] = json!(ms);
    pair
}

pub fn pairs_body(pairs: Vec<Value>) -> Value {
    json!({ "schemaVersion": "1.0.0", "pairs": pairs })
}

pub fn addresses(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|p| p["pairAddress"].as_str().unwrap().to_string())
        .collect()
}

async fn search(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    let query = params.get("q").cloned().unwrap_or_default();
    if upstream.fixtures.failing.contains(&format!("search:{}", query)) {
        return server_error();
    }
    let body = upstream
        .fixtures
        .searches
        .get(&query)
        .cloned()
        .unwrap_or_else(|| pairs_body(vec![]));
    (StatusCode::OK, Json(body))
}

async fn tokens(
    State(upstream): State<Upstream>,
    Path(_addresses): Path<String>,
) -> (StatusCode, Json<Value>) {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    if upstream.fixtures.failing.contains("tokens") {
        return server_error();
    }
    (StatusCode::OK, Json(upstream.fixtures.token_pairs.clone()))
}

async fn boosts(State(upstream): State<Upstream>) -> (StatusCode, Json<Value>) {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    if upstream.fixtures.failing.contains("boosts") {
        return server_error();
    }
    (StatusCode::OK, Json(upstream.fixtures.boosts.clone()))
}

async fn jupiter(State(upstream): State<Upstream>) -> (StatusCode, Json<Value>) {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    if upstream.fixtures.jupiter.is_null() {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "down" })));
    }
    (StatusCode::OK, Json(upstream.fixtures.jupiter.clone()))
}

async fn rpc(State(upstream): State<Upstream>, Json(request): Json<Value>) -> Json<Value> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();

    if method == "getVersion" {
        return Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": { "solana-core": "1.17.28", "feature-set": 3580551090u32 }
        }));
    }

    match upstream.fixtures.rpc.get(method) {
        Some(result) => Json(json!({ "jsonrpc": "2.0", "id": id, "result": result })),
        None => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("Method not found: {}", method) }
        })),
    }
}
