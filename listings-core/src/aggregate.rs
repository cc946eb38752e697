use std::collections::HashSet;

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::fetch::fetch_source;
use crate::listing::Listing;
use crate::sources::SourceEndpoint;

#[derive(Debug)]
pub struct SourceFailure {
    pub area: String,
    pub url: String,
    pub error: FetchError,
}

/// Merged result of one fan-out over all sources.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Deduplicated listings in source order.
    pub listings: Vec<Listing>,
    pub failures: Vec<SourceFailure>,
    /// Listings received before deduplication.
    pub fetched: usize,
}

/// Fetches every endpoint concurrently. Outcomes are kept in endpoint order
/// regardless of completion order, and a failing source never fails the
/// whole aggregation.
pub async fn aggregate(client: &Client, endpoints: &[SourceEndpoint], config: &FetchConfig) -> Aggregate {
    info!(sources = endpoints.len(), "fetching sources");

    let outcomes: Vec<(SourceEndpoint, Result<Vec<Listing>, FetchError>)> =
        stream::iter(endpoints.iter().cloned())
            .map(|endpoint| async move {
                let limit = config.source_timeout();
                let result =
                    match tokio::time::timeout(limit, fetch_source(client, &endpoint, config)).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::Timeout(limit)),
                    };
                (endpoint, result)
            })
            .buffered(config.concurrency())
            .collect()
            .await;

    merge(outcomes)
}

/// Concatenates successful sources in the given order, records failures and
/// drops repeated links.
pub fn merge(outcomes: Vec<(SourceEndpoint, Result<Vec<Listing>, FetchError>)>) -> Aggregate {
    let mut merged = Vec::new();
    let mut failures = Vec::new();

    for (endpoint, result) in outcomes {
        match result {
            Ok(listings) => {
                info!(area = %endpoint.area, count = listings.len(), "fetched listings");
                merged.extend(listings);
            }
            Err(error) => {
                warn!(feed = %endpoint.url, error = %error, "failed to fetch feed");
                failures.push(SourceFailure {
                    area: endpoint.area,
                    url: endpoint.url,
                    error,
                });
            }
        }
    }

    let fetched = merged.len();
    let listings = dedup_by_link(merged);
    info!(fetched, unique = listings.len(), failed = failures.len(), "sources merged");

    Aggregate {
        listings,
        failures,
        fetched,
    }
}

/// Keeps the first listing seen for each link.
pub fn dedup_by_link(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashSet<String> = HashSet::new();
    listings
        .into_iter()
        .filter(|listing| seen.insert(listing.link.clone()))
        .collect()
}
