use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use listings_core::QueryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid query parameters: {0}")]
    InvalidParameters(String),
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
