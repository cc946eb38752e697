use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDateTime, Utc};
use listings_core::{search, Listing, ListingQuery, RESULT_LIMIT};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;

pub const SERVICE_NAME: &str = "Alpine Seller Search API";

#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    pub success: bool,
    pub count: usize,
    pub listings: Vec<Listing>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
    pub timestamp: NaiveDateTime,
}

/// `GET /api/listings`
pub async fn listings_handler(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<ListingsResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidParameters(rejection.body_text()))?;
    debug!(?query, "listings requested");

    let result = search(&state.client, &state.config, &query).await?;
    Ok(Json(ListingsResponse {
        success: true,
        count: result.count,
        listings: result.listings,
    }))
}

/// `GET /api/health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: format!("{SERVICE_NAME} is running"),
        timestamp: Utc::now().naive_utc(),
    })
}

/// `GET /`: static description of the API and the configured coverage.
pub async fn index_handler(State(state): State<AppState>) -> Json<Value> {
    let regions = state.config.sources.regions();
    let coverage = regions
        .iter()
        .map(|(region, _)| region.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let areas: Map<String, Value> = regions
        .into_iter()
        .map(|(region, names)| (region, json!(names)))
        .collect();

    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "coverage": format!("All configured Craigslist areas ({coverage})"),
        "areas": areas,
        "endpoints": {
            "/api/listings": format!("Get up to {RESULT_LIMIT} car listings from all configured areas"),
            "/api/health": "Health check",
        },
        "params": {
            "minPrice": "Minimum price filter",
            "maxPrice": "Maximum price filter",
            "make": "Car make filter (toyota, honda, etc)",
            "maxMileage": "Maximum mileage filter",
            "yearFrom": "Minimum year filter",
        },
    }))
}
