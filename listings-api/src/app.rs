use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use listings_core::{AppConfig, FetchConfig};
use reqwest::{redirect, Client, ClientBuilder};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{health_handler, index_handler, listings_handler};

/// Shared state handed to every handler. Nothing in here is mutated.
#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(client: Client, config: AppConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

pub fn build_client(fetch: &FetchConfig) -> reqwest::Result<Client> {
    ClientBuilder::new()
        .redirect(redirect::Policy::limited(5))
        .user_agent(fetch.user_agent.as_str())
        .timeout(fetch.request_timeout())
        .build()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/listings", get(listings_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
