use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that reach the client as a non-200 status. Upstream failures never do;
/// handlers turn those into degraded 200 responses.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    data: Option<serde_json::Value>,
    error: String,
    code: u16,
    timestamp: i64,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        };
        tracing::debug!("Rejecting request: {}", self);

        let body = Json(ErrorResponse {
            data: None,
            error: self.to_string(),
            code: status.as_u16(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        });

        (status, body).into_response()
    }
}
