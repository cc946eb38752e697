use reqwest::Client;
use tracing::info;

use crate::aggregate::aggregate;
use crate::config::AppConfig;
use crate::error::QueryError;
use crate::query::{ListingQuery, SearchResult};

/// Runs the whole pipeline for one request: fan out to every configured
/// source with the query's price bounds, merge and dedup, then filter, sort
/// and truncate. Only an invalid query is an error; unreachable sources just
/// shrink the result.
pub async fn search(
    client: &Client,
    config: &AppConfig,
    query: &ListingQuery,
) -> Result<SearchResult, QueryError> {
    query.validate()?;

    let endpoints = config.sources.endpoints(query.price_bounds());
    let aggregate = aggregate(client, &endpoints, &config.fetch).await;
    let failed_sources = aggregate.failures.len();
    let result = query.apply(aggregate.listings);

    info!(
        failed_sources,
        matched = result.count,
        returned = result.listings.len(),
        "query applied"
    );
    Ok(result)
}
